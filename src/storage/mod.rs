//! All things related to the storage of users and documents
//!
//! Every entity kind lives in its own collection of documents. A document carries the author and
//! timestamps next to a free-form JSON object with the validated form fields.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::Kind;
use crate::entities::ParentRef;
use crate::forms::Values;
use crate::users::User;

#[cfg(not(feature = "postgres"))]
pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

#[cfg(not(feature = "postgres"))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Storage configuration
pub enum Config {
    /// Detect configuration from environment
    DetectConfig,

    /// Use existing connection
    #[cfg(feature = "postgres")]
    #[cfg_attr(not(test), allow(dead_code))]
    ExistingConnection(sqlx::PgPool),
}

pub use Config as StorageConfig;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup(config: Config) -> anyhow::Result<Memory> {
    let Config::DetectConfig = config;

    tracing::info!("Using in-memory storage, documents are lost on shutdown");

    Ok(Memory::new())
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup(config: Config) -> anyhow::Result<Postgres> {
    match config {
        Config::DetectConfig => Postgres::new().await,
        Config::ExistingConnection(pool) => Postgres::new_with_pool(pool).await,
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// Another user already has the username
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// The document to change does not exist (anymore)
    #[error("Document not found: {0}")]
    MissingDocument(Uuid),

    /// A stored document could not be read back
    #[error("Corrupt document: {0}")]
    Corrupt(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// A stored entity
#[derive(Clone, Debug)]
pub struct Document {
    pub id: Uuid,
    pub kind: Kind,
    pub author: Uuid,
    pub parent: Option<ParentRef>,
    pub fields: Values,
    pub created_at: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The username
    pub username: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Document
pub struct CreateDocumentValues<'a> {
    /// Collection to store the document in
    pub kind: Kind,

    /// The user creating the document, can never change afterwards
    pub author: &'a User,

    /// The document this one belongs to
    pub parent: Option<ParentRef>,

    /// Validated form fields
    pub fields: &'a Values,
}

/// Values to update a Document
pub struct UpdateDocumentValues<'a> {
    /// Fields to overwrite, fields not mentioned keep their value
    pub fields: &'a Values,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find any single user
    ///
    /// Respects the soft-delete
    async fn find_any_single_user(&self) -> Result<Option<User>>;

    /// Finds a single user by its username
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Finds a single user by its ID
    ///
    /// Respects the soft-delete
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User>;

    /// Find all documents of a kind, in insertion order
    ///
    /// Respects the soft-delete
    async fn find_all_documents(&self, kind: Kind) -> Result<Vec<Document>>;

    /// Find all documents of a kind that belong to a parent, in insertion order
    ///
    /// Respects the soft-delete
    async fn find_all_documents_by_parent(
        &self,
        kind: Kind,
        parent_id: &Uuid,
    ) -> Result<Vec<Document>>;

    /// Find a single document of a kind by its ID
    ///
    /// Respects the soft-delete
    async fn find_single_document_by_id(&self, kind: Kind, id: &Uuid)
    -> Result<Option<Document>>;

    /// Create a document, the modify date is set to now
    async fn create_document(&self, values: &CreateDocumentValues<'_>) -> Result<Document>;

    /// Patch the fields of a document, the modify date is set to now
    async fn update_document(
        &self,
        document: &Document,
        values: &UpdateDocumentValues<'_>,
    ) -> Result<Document>;

    /// Soft-delete a document
    async fn delete_document(&self, document: &Document) -> Result<()>;
}
