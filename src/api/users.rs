//! User API management

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::password::hash;
use crate::password::verify;
use crate::storage::CreateUserValues;
use crate::storage::Error as StorageError;
use crate::storage::Storage;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;

/// The user response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The user ID
    pub id: Uuid,

    /// The username
    pub username: String,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Username and password, used to log in and to register
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    /// Username of the user
    username: String,
    /// Password of the user
    password: String,
}

/// Get a token for a user "session"
///
/// The token can then be used to access the rest of the routes by using it in the
/// `Authorization` header
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "admin", "password": "verysecret" }' \
///     http://localhost:5000/users/token
/// ```
///
/// Response
/// ```json
/// { "data": { "token_type": "Bearer", "expires_in": 3600, "access_token": "some token" } }
/// ```
pub async fn token<S: Storage>(
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    Form(form): Form<CredentialsForm>,
) -> Result<Success<Token>, Error> {
    let user = storage
        .find_single_user_by_username(&form.username)
        .await
        .map_err(Error::internal_server_error)?;

    match user {
        Some(user) if verify(&user.hashed_password, &form.password) => {
            tracing::debug!(user_id = %user.id, "Issued token");

            Ok(Success::ok(generate_token(&jwt_keys, &user)?))
        }
        _ => Err(Error::bad_request("Invalid user")),
    }
}

/// Register a new user
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "sam", "password": "sleepwell" }' \
///     http://localhost:5000/users
/// ```
///
/// Response:
/// ```json
/// { "data": { "id": "<uuid>", "username": "sam" } }
/// ```
pub async fn register<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CredentialsForm>,
) -> Result<Success<UserResponse>, Error> {
    let username = form.username.trim();

    if username.is_empty() {
        return Err(Error::bad_request("Username can not be empty"));
    }

    if form.password.is_empty() {
        return Err(Error::bad_request("Password can not be empty"));
    }

    let hashed_password = hash(&form.password).map_err(Error::internal_server_error)?;

    let values = CreateUserValues {
        username,
        hashed_password: &hashed_password,
    };

    let user = storage.create_user(&values).await.map_err(|err| match err {
        StorageError::UsernameTaken(_) => Error::bad_request("Username already taken"),
        err => Error::internal_server_error(err),
    })?;

    tracing::info!(user_id = %user.id, "Registered user `{}`", user.username);

    Ok(Success::created(UserResponse::from_user(&user)))
}

/// Get the current user
pub async fn me<S: Storage>(current_user: CurrentUser<S>) -> Success<UserResponse> {
    Success::ok(UserResponse::from_user(&current_user))
}
