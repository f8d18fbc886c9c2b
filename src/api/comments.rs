//! Comments on moods and blogs
//!
//! Only creating happens here, underneath the parent. Comments are viewed, edited and deleted
//! through the routes every entity kind has.

use axum::Extension;
use uuid::Uuid;

use crate::entities::Comment;
use crate::entities::Entity;
use crate::entities::ParentRef;
use crate::forms::FormPage;
use crate::forms::RawFields;
use crate::storage::CreateDocumentValues;
use crate::storage::Storage;

use super::CurrentUser;
use super::Error;
use super::PathParameters;
use super::RawForm;
use super::Submitted;
use super::Success;
use super::entities::fetch_document;
use super::entities::rejected;
use super::entities::to_record;
use super::entities::validate;

/// Blank comment form for an existing parent
pub async fn new_form<S: Storage, P: Entity>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(parent_id): PathParameters<Uuid>,
) -> Result<Success<FormPage>, Error> {
    let parent = fetch_document::<S, P>(&storage, &parent_id).await?;

    Ok(Success::ok(Comment::SCHEMA.describe(
        Comment::KIND.as_str(),
        P::KIND.comment_path(&parent.id),
        &RawFields::new(),
        None,
    )))
}

/// Place a comment, the user is sent back to the parent
pub async fn create<S: Storage, P: Entity>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(parent_id): PathParameters<Uuid>,
    RawForm(raw): RawForm,
) -> Result<Submitted, Error> {
    let parent = fetch_document::<S, P>(&storage, &parent_id).await?;

    let values = match validate::<Comment>(&raw)? {
        Ok(values) => values,
        Err(errors) => {
            return Ok(rejected::<Comment>(
                P::KIND.comment_path(&parent.id),
                &raw,
                &errors,
            ));
        }
    };

    let create_values = CreateDocumentValues {
        kind: Comment::KIND,
        author: &current_user,
        parent: Some(ParentRef {
            kind: P::KIND,
            id: parent.id,
        }),
        fields: &values,
    };

    let document = storage
        .create_document(&create_values)
        .await
        .map_err(Error::internal_server_error)?;

    let comment = to_record::<Comment>(document)?;

    tracing::info!(
        parent_kind = %P::KIND,
        parent_id = %parent.id,
        id = %comment.id,
        "Commented"
    );

    Ok(Submitted::Saved(comment.location()))
}
