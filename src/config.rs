//! Runtime configuration
//!
//! Everything is read from the environment (optionally through a `.env` file), tests build the
//! configuration by hand

use crate::password::generate;
use crate::storage::StorageConfig;
use crate::utils::env_var_non_empty;
use crate::utils::env_var_or_else;

/// Credentials for the account created on an empty storage
#[derive(Clone, Debug)]
pub struct InitialUser {
    /// Username of the initial account
    pub username: String,

    /// Plain password of the initial account
    pub password: String,
}

/// App configuration
pub struct Config {
    /// Where documents and users live
    pub storage: StorageConfig,

    /// Secret to sign bearer tokens with
    pub jwt_secret: String,

    /// Account to create when no user exists yet
    pub initial_user: InitialUser,
}

impl Config {
    /// Detect the configuration from the environment
    ///
    /// Missing secrets are generated and logged, so a fresh install is usable right away
    pub fn from_env() -> Self {
        let jwt_secret = env_var_or_else("JWT_SECRET", || {
            let jwt_secret = generate();
            tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
            jwt_secret
        });

        let username = env_var_non_empty("INITIAL_USERNAME").unwrap_or_else(|| {
            let username = String::from("admin");
            tracing::info!("`INITIAL_USERNAME` not set, using: {username}");
            username
        });

        let password = env_var_or_else("INITIAL_PASSWORD", || {
            let password = generate();
            tracing::info!("`INITIAL_PASSWORD` not set, generating new password: {password}");
            password
        });

        Self {
            storage: StorageConfig::DetectConfig,
            jwt_secret,
            initial_user: InitialUser { username, password },
        }
    }
}
