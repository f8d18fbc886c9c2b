#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::router;
use crate::config::Config;
use crate::storage::Storage;
use crate::users::ensure_initial_user;
use crate::utils::env_var_non_empty;
use crate::utils::env_var_or_else;

mod api;
mod config;
mod entities;
mod forms;
mod graceful_shutdown;
mod password;
mod storage;
#[cfg(test)]
mod tests;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "wellbeing=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app(Config::from_env()).await?;

    let address = setup_address()?;
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Storage connection
/// - Initial user setup
pub async fn setup_app(config: Config) -> Result<Router> {
    let storage = storage::setup(config.storage).await?;

    ensure_initial_user(&storage, &config.initial_user).await?;

    Ok(create_router(storage, JwtKeys::new(config.jwt_secret.as_bytes())))
}

/// Create the router with all entity routes
fn create_router<S: Storage>(storage: S, jwt_keys: JwtKeys) -> Router {
    router::<S>()
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(jwt_keys))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // a bare `PORT` wins over the port in `ADDRESS`
    if let Some(port) = env_var_non_empty("PORT") {
        address.set_port(port.parse::<u16>()?);
    }

    Ok(address)
}
