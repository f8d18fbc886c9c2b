//! Create, view, list, edit and delete entities of any kind
//!
//! Reading is open to every logged in user, changing and deleting is reserved for the author

use axum::Extension;
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::Comment;
use crate::entities::Entity;
use crate::entities::Kind;
use crate::entities::Record;
use crate::entities::check_values;
use crate::forms::FieldErrors;
use crate::forms::FormPage;
use crate::forms::RawFields;
use crate::forms::Values;
use crate::forms::only_submitted;
use crate::forms::to_raw_fields;
use crate::storage::CreateDocumentValues;
use crate::storage::Document;
use crate::storage::Storage;
use crate::storage::UpdateDocumentValues;
use crate::users::User;

use super::CurrentUser;
use super::Error;
use super::PathParameters;
use super::RawForm;
use super::Submitted;
use super::Success;

/// A single entity, with its comments when it can have them
#[derive(Debug, Serialize)]
pub struct EntityResponse<E: Entity> {
    #[serde(flatten)]
    record: Record<E>,

    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<Record<Comment>>>,
}

/// Blank form for a new entity
pub async fn new_form<S: Storage, E: Entity>(_current_user: CurrentUser<S>) -> Success<FormPage> {
    Success::ok(E::SCHEMA.describe(
        E::KIND.as_str(),
        E::KIND.new_path(),
        &RawFields::new(),
        None,
    ))
}

/// Create an entity, authored by the current user
pub async fn create<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    RawForm(raw): RawForm,
) -> Result<Submitted, Error> {
    let values = match validate::<E>(&raw)? {
        Ok(values) => values,
        Err(errors) => return Ok(rejected::<E>(E::KIND.new_path(), &raw, &errors)),
    };

    let create_values = CreateDocumentValues {
        kind: E::KIND,
        author: &current_user,
        parent: None,
        fields: &values,
    };

    let document = storage
        .create_document(&create_values)
        .await
        .map_err(Error::internal_server_error)?;

    let record = to_record::<E>(document)?;

    tracing::info!(kind = %E::KIND, id = %record.id, author = %record.author, "Created");

    Ok(Submitted::Saved(record.location()))
}

/// Form pre-filled with the current values of an entity
pub async fn edit_form<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(id): PathParameters<Uuid>,
) -> Result<Success<FormPage>, Error> {
    let document = fetch_document::<S, E>(&storage, &id).await?;

    ensure_author::<E>(&current_user, &document, "edit").map_err(Error::forbidden)?;

    Ok(Success::ok(E::SCHEMA.describe(
        E::KIND.as_str(),
        E::KIND.edit_path(&id),
        &to_raw_fields(&document.fields),
        None,
    )))
}

/// Update an entity, only its author may
///
/// Only submitted fields change. The author and ID never do, the modify date is refreshed
pub async fn update<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(id): PathParameters<Uuid>,
    RawForm(raw): RawForm,
) -> Result<Submitted, Error> {
    let document = fetch_document::<S, E>(&storage, &id).await?;

    ensure_author::<E>(&current_user, &document, "edit").map_err(Error::forbidden)?;

    let values = match validate::<E>(&raw)? {
        Ok(values) => only_submitted(values, &raw),
        Err(errors) => return Ok(rejected::<E>(E::KIND.edit_path(&id), &raw, &errors)),
    };

    let document = storage
        .update_document(&document, &UpdateDocumentValues { fields: &values })
        .await
        .map_err(Error::internal_server_error)?;

    let record = to_record::<E>(document)?;

    tracing::info!(kind = %E::KIND, id = %record.id, "Updated");

    Ok(Submitted::Saved(record.location()))
}

/// A single entity, with its comments
pub async fn single<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
    PathParameters(id): PathParameters<Uuid>,
) -> Result<Success<EntityResponse<E>>, Error> {
    let document = fetch_document::<S, E>(&storage, &id).await?;
    let record = to_record::<E>(document)?;

    let comments = if E::COMMENTABLE {
        let documents = storage
            .find_all_documents_by_parent(Kind::Comment, &record.id)
            .await
            .map_err(Error::internal_server_error)?;

        let comments = Record::<Comment>::from_document_multiple(documents)
            .map_err(Error::internal_server_error)?;

        Some(comments)
    } else {
        None
    };

    Ok(Success::ok(EntityResponse { record, comments }))
}

/// All entities of a kind, no matter who wrote them
pub async fn list<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    _current_user: CurrentUser<S>,
) -> Result<Success<Vec<Record<E>>>, Error> {
    list_records::<S, E>(&storage).await.map(Success::ok)
}

/// Delete an entity, only its author may
///
/// Either way the remaining entities are served, with a notice of what happened
pub async fn delete<S: Storage, E: Entity>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser<S>,
    PathParameters(id): PathParameters<Uuid>,
) -> Result<Success<Vec<Record<E>>>, Error> {
    let document = fetch_document::<S, E>(&storage, &id).await?;

    let (status_code, notice) = match ensure_author::<E>(&current_user, &document, "delete") {
        Ok(()) => {
            storage
                .delete_document(&document)
                .await
                .map_err(Error::internal_server_error)?;

            tracing::info!(kind = %E::KIND, id = %document.id, "Deleted");

            (StatusCode::OK, format!("The {} was deleted.", E::KIND))
        }
        Err(denied) => (StatusCode::FORBIDDEN, denied),
    };

    let records = list_records::<S, E>(&storage).await?;

    Ok(Success::ok(records)
        .with_notice(notice)
        .with_status(status_code))
}

/// Fetch a document of the kind of the entity
pub(super) async fn fetch_document<S: Storage, E: Entity>(
    storage: &S,
    id: &Uuid,
) -> Result<Document, Error> {
    storage
        .find_single_document_by_id(E::KIND, id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(
            || Err(Error::not_found(format!("{} not found", E::KIND.label()))),
            Ok,
        )
}

/// Validate a submission against the form of the entity
///
/// The outer error is for schemas that do not fit their entity, the inner one for the user
pub(super) fn validate<E: Entity>(raw: &RawFields) -> Result<Result<Values, FieldErrors>, Error> {
    match E::SCHEMA.validate(raw) {
        Ok(values) => {
            check_values::<E>(&values).map_err(Error::internal_server_error)?;

            Ok(Ok(values))
        }
        Err(errors) => Ok(Err(errors)),
    }
}

/// The form again, with the submitted values and their errors
pub(super) fn rejected<E: Entity>(
    action: String,
    raw: &RawFields,
    errors: &FieldErrors,
) -> Submitted {
    tracing::debug!(
        kind = %E::KIND,
        fields = ?errors.fields().collect::<Vec<_>>(),
        "Rejected submission"
    );

    Submitted::Rejected(E::SCHEMA.describe(E::KIND.as_str(), action, raw, Some(errors)))
}

pub(super) fn to_record<E: Entity>(document: Document) -> Result<Record<E>, Error> {
    Record::from_document(document).map_err(Error::internal_server_error)
}

/// Only the author may change a document
///
/// Returns the message for the user when someone else tries
fn ensure_author<E: Entity>(user: &User, document: &Document, action: &str) -> Result<(), String> {
    if document.author == user.id {
        return Ok(());
    }

    tracing::warn!(
        kind = %E::KIND,
        id = %document.id,
        user_id = %user.id,
        "Denied {action} by someone other than the author"
    );

    Err(format!("You can't {action} a {} you don't own.", E::KIND))
}

async fn list_records<S: Storage, E: Entity>(storage: &S) -> Result<Vec<Record<E>>, Error> {
    let documents = storage
        .find_all_documents(E::KIND)
        .await
        .map_err(Error::internal_server_error)?;

    Record::from_document_multiple(documents).map_err(Error::internal_server_error)
}
