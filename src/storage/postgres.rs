//! Postgres storage
//!
//! Documents live in a single `documents` table, their fields in a JSONB column

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use uuid::Uuid;

use crate::entities::Kind;
use crate::entities::ParentRef;
use crate::forms::Values;
use crate::users::User;

use super::CreateDocumentValues;
use super::CreateUserValues;
use super::Document;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateDocumentValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

const DOCUMENT_COLUMNS: &str =
    "id, kind, author, parent_kind, parent_id, fields, created_at, modify_date, deleted_at";

const USER_COLUMNS: &str = "id, username, hashed_password, created_at, updated_at, deleted_at";

/// `SQLx` version of user
#[derive(sqlx::FromRow)]
struct SqlxUser {
    id: Uuid,
    username: String,
    hashed_password: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

impl From<SqlxUser> for User {
    fn from(user: SqlxUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            hashed_password: user.hashed_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
            deleted_at: user.deleted_at,
        }
    }
}

/// `SQLx` version of document
#[derive(sqlx::FromRow)]
struct SqlxDocument {
    id: Uuid,
    kind: String,
    author: Uuid,
    parent_kind: Option<String>,
    parent_id: Option<Uuid>,
    fields: Json<Values>,
    created_at: NaiveDateTime,
    modify_date: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

impl SqlxDocument {
    /// Create document from `SQLx` version
    fn into_document(self) -> Result<Document> {
        let kind = self.kind.parse::<Kind>().map_err(corrupt)?;

        let parent = match (self.parent_kind, self.parent_id) {
            (Some(parent_kind), Some(id)) => Some(ParentRef {
                kind: parent_kind.parse::<Kind>().map_err(corrupt)?,
                id,
            }),
            _ => None,
        };

        Ok(Document {
            id: self.id,
            kind,
            author: self.author,
            parent,
            fields: self.fields.0,
            created_at: self.created_at,
            modify_date: self.modify_date,
            deleted_at: self.deleted_at,
        })
    }

    /// Create multiple documents from `SQLx` version
    fn into_document_multiple(documents: Vec<Self>) -> Result<Vec<Document>> {
        documents.into_iter().map(Self::into_document).collect()
    }
}

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> anyhow::Result<Self> {
        let database_connection_string =
            std::env::var("DATABASE_URL").context("`DATABASE_URL` is not set")?;

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .context("Could not connect to the database")?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> anyhow::Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .context("Migrations could not run")?;

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL LIMIT 1"
        ))
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL AND username = $1 LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, SqlxUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL AND id = $1 LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(user.map(User::from))
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, SqlxUser>(&format!(
            "INSERT INTO users (id, username, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(values.username)
        .bind(values.hashed_password)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(|err| {
            let is_taken = err
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation());

            if is_taken {
                Error::UsernameTaken(values.username.to_string())
            } else {
                connection_error(err)
            }
        })?;

        Ok(user.into())
    }

    async fn find_all_documents(&self, kind: Kind) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, SqlxDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE deleted_at IS NULL AND kind = $1
            ORDER BY position"
        ))
        .bind(kind.as_str())
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        SqlxDocument::into_document_multiple(documents)
    }

    async fn find_all_documents_by_parent(
        &self,
        kind: Kind,
        parent_id: &Uuid,
    ) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, SqlxDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE deleted_at IS NULL AND kind = $1 AND parent_id = $2
            ORDER BY position"
        ))
        .bind(kind.as_str())
        .bind(parent_id)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        SqlxDocument::into_document_multiple(documents)
    }

    async fn find_single_document_by_id(
        &self,
        kind: Kind,
        id: &Uuid,
    ) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, SqlxDocument>(&format!(
            "SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE deleted_at IS NULL AND kind = $1 AND id = $2
            LIMIT 1"
        ))
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        document.map(SqlxDocument::into_document).transpose()
    }

    async fn create_document(&self, values: &CreateDocumentValues<'_>) -> Result<Document> {
        let document = sqlx::query_as::<_, SqlxDocument>(&format!(
            "INSERT INTO documents (id, kind, author, parent_kind, parent_id, fields)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(values.kind.as_str())
        .bind(values.author.id)
        .bind(values.parent.map(|parent| parent.kind.as_str()))
        .bind(values.parent.map(|parent| parent.id))
        .bind(Json(values.fields))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        document.into_document()
    }

    async fn update_document(
        &self,
        document: &Document,
        values: &UpdateDocumentValues<'_>,
    ) -> Result<Document> {
        // `||` merges top-level keys, fields not in the patch are kept
        let updated_document = sqlx::query_as::<_, SqlxDocument>(&format!(
            "UPDATE documents
            SET fields = fields || $1, modify_date = CURRENT_TIMESTAMP
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(Json(values.fields))
        .bind(document.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        updated_document
            .ok_or(Error::MissingDocument(document.id))?
            .into_document()
    }

    async fn delete_document(&self, document: &Document) -> Result<()> {
        let result = sqlx::query(
            "UPDATE documents
            SET deleted_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(document.id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::MissingDocument(document.id));
        }

        Ok(())
    }
}

/// Convert any error into a connection error
fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}

fn corrupt<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Corrupt(err.to_string())
}
