//! All endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use request::RawForm;
pub use response::Error;
pub use response::Submitted;
pub use response::Success;

use crate::entities::Blog;
use crate::entities::Clinic;
use crate::entities::Comment;
use crate::entities::Consent;
use crate::entities::Entity;
use crate::entities::Mood;
use crate::entities::Profile;
use crate::entities::Sleep;
use crate::storage::Storage;

mod comments;
mod current_user;
mod entities;
mod request;
mod response;
mod users;

/// Get the Axum router for all routes
pub fn router<S: Storage>() -> Router {
    let users = Router::new()
        .route("/", post(users::register::<S>))
        .route("/token", post(users::token::<S>))
        .route("/me", get(users::me::<S>));

    Router::new()
        .nest("/users", users)
        .merge(entity_routes::<S, Mood>())
        .merge(entity_routes::<S, Sleep>())
        .merge(entity_routes::<S, Blog>())
        .merge(entity_routes::<S, Comment>())
        .merge(entity_routes::<S, Clinic>())
        .merge(entity_routes::<S, Profile>())
        .merge(entity_routes::<S, Consent>())
        .fallback(not_found)
}

/// Routes of a single entity kind
///
/// For moods these are:
/// - `/mood/new`: form, create
/// - `/mood/edit/{id}`: pre-filled form, update
/// - `/mood/{id}`: single mood with its comments
/// - `/mood/list` and `/moods`: all moods
/// - `/mood/delete/{id}`: delete, then all moods
/// - `/mood/{id}/comment/new`: comment form, comment
fn entity_routes<S: Storage, E: Entity>() -> Router {
    let kind = E::KIND;

    let mut router = Router::new()
        .route(
            &format!("/{kind}/edit/{{id}}"),
            get(entities::edit_form::<S, E>).post(entities::update::<S, E>),
        )
        .route(
            &format!("/{kind}/delete/{{id}}"),
            get(entities::delete::<S, E>),
        )
        .route(&format!("/{kind}/list"), get(entities::list::<S, E>))
        .route(&format!("/{}", kind.plural()), get(entities::list::<S, E>))
        .route(&format!("/{kind}/{{id}}"), get(entities::single::<S, E>));

    if !E::NESTED {
        router = router.route(
            &format!("/{kind}/new"),
            get(entities::new_form::<S, E>).post(entities::create::<S, E>),
        );
    }

    if E::COMMENTABLE {
        router = router.route(
            &format!("/{kind}/{{id}}/comment/new"),
            get(comments::new_form::<S, E>).post(comments::create::<S, E>),
        );
    }

    router
}

async fn not_found() -> Error {
    Error::not_found("Not found")
}
