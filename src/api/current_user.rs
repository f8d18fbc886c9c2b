//! Current user service
//!
//! Get the current user from the request based on the Authorization header. Handlers take the
//! current user as an argument, there is no ambient "logged in user".

use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::storage::Storage;
use crate::users::User;

use super::Error;

/// How long a token stays valid, in seconds
const TOKEN_LIFETIME: i64 = 3600;

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The JWT claims to identify a user
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The user ID
    sub: Uuid,

    /// When does the token expire, as unix timestamp
    exp: i64,
}

/// Token information served to the user
#[derive(Debug, Serialize)]
pub struct Token {
    /// Type of the token: Bearer
    #[allow(clippy::struct_field_names)]
    token_type: String,

    /// In how many seconds does the token expire
    expires_in: i64,

    /// The access token to provide to follow up requests in the Authorization header
    #[allow(clippy::struct_field_names)]
    access_token: String,
}

/// Generate a token for the outside world for a given user
pub fn generate_token(jwt_keys: &JwtKeys, user: &User) -> Result<Token, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let claims = Claims {
        sub: user.id,
        exp: chrono::Utc::now().timestamp() + TOKEN_LIFETIME,
    };

    let access_token = encode(&Header::default(), &claims, &jwt_keys.encoding)
        .map_err(Error::internal_server_error)?;

    Ok(Token {
        token_type: "Bearer".to_string(),
        expires_in: TOKEN_LIFETIME,
        access_token,
    })
}

/// Current user service
///
/// Rejects the request when no valid token is provided
pub struct CurrentUser<S> {
    /// The actual user
    user: Arc<User>,

    /// The storage the user was found in
    storage: PhantomData<fn() -> S>,
}

impl<S> Clone for CurrentUser<S> {
    fn clone(&self) -> Self {
        Self {
            user: Arc::clone(&self.user),
            storage: PhantomData,
        }
    }
}

impl<S> Deref for CurrentUser<S> {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<B, S> FromRequestParts<B> for CurrentUser<S>
where
    B: Send + Sync,
    S: Storage,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Missing API token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let Extension(storage) = parts
            .extract::<Extension<S>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get the storage"))?;

        let token_data =
            decode::<Claims>(bearer.token(), &jwt_keys.decoding, &Validation::default())
                .map_err(|err| Error::unauthorized(format!("Invalid token: {err}")))?;

        let user = storage
            .find_single_user_by_id(&token_data.claims.sub)
            .await
            .map_err(Error::internal_server_error)?
            .ok_or_else(|| Error::unauthorized("Could not find user"))?;

        Ok(CurrentUser {
            user: Arc::new(user),
            storage: PhantomData,
        })
    }
}
