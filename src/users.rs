use anyhow::Result;
use chrono::naive::NaiveDateTime;
use uuid::Uuid;

use crate::config::InitialUser;
use crate::password::hash;
use crate::storage::CreateUserValues;
use crate::storage::Storage;

/// A registered user, the author of documents
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub hashed_password: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Create the initial account when the storage has no users yet
pub async fn ensure_initial_user<S: Storage>(
    storage: &S,
    initial_user: &InitialUser,
) -> Result<()> {
    if storage.find_any_single_user().await?.is_some() {
        return Ok(());
    }

    let hashed_password = hash(&initial_user.password)
        .map_err(|err| anyhow::anyhow!("Could not hash initial password: {err}"))?;

    let values = CreateUserValues {
        username: &initial_user.username,
        hashed_password: &hashed_password,
    };

    let user = storage.create_user(&values).await?;

    tracing::info!(user_id = %user.id, "Created initial user `{}`", user.username);

    Ok(())
}
