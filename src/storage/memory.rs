//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entities::Kind;
use crate::users::User;

use super::CreateDocumentValues;
use super::CreateUserValues;
use super::Document;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateDocumentValues;

/// All documents, in insertion order, with lookup indexes
#[derive(Debug, Default)]
struct Documents {
    /// Every document ever created, deleted ones included
    entries: Vec<Document>,

    /// Document ID to position in `entries`
    positions: HashMap<Uuid, usize>,

    /// Parent ID to the IDs of its children, in insertion order
    children: HashMap<Uuid, Vec<Uuid>>,
}

impl Documents {
    fn get(&self, id: &Uuid) -> Option<&Document> {
        self.positions
            .get(id)
            .and_then(|position| self.entries.get(*position))
            .filter(|document| document.deleted_at.is_none())
    }

    fn get_mut(&mut self, id: &Uuid) -> Option<&mut Document> {
        self.positions
            .get(id)
            .and_then(|position| self.entries.get_mut(*position))
            .filter(|document| document.deleted_at.is_none())
    }

    fn insert(&mut self, document: Document) {
        if let Some(parent) = &document.parent {
            self.children.entry(parent.id).or_default().push(document.id);
        }

        self.positions.insert(document.id, self.entries.len());
        self.entries.push(document);
    }
}

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All documents in storage
    documents: Arc<Mutex<Documents>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            documents: Arc::new(Mutex::new(Documents::default())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_any_single_user(&self) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.username == username && user.deleted_at.is_none())
            .cloned())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .get(id)
            .filter(|user| user.deleted_at.is_none())
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues<'_>) -> Result<User> {
        let mut users = self.users.lock().await;

        if users
            .values()
            .any(|user| user.username == values.username && user.deleted_at.is_none())
        {
            return Err(Error::UsernameTaken(values.username.to_string()));
        }

        let now = Utc::now().naive_utc();

        let user = User {
            id: Uuid::new_v4(),
            username: values.username.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_all_documents(&self, kind: Kind) -> Result<Vec<Document>> {
        Ok(self
            .documents
            .lock()
            .await
            .entries
            .iter()
            .filter(|document| document.kind == kind && document.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn find_all_documents_by_parent(
        &self,
        kind: Kind,
        parent_id: &Uuid,
    ) -> Result<Vec<Document>> {
        let documents = self.documents.lock().await;

        Ok(documents
            .children
            .get(parent_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| documents.get(id))
                    .filter(|document| document.kind == kind)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_single_document_by_id(
        &self,
        kind: Kind,
        id: &Uuid,
    ) -> Result<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .await
            .get(id)
            .filter(|document| document.kind == kind)
            .cloned())
    }

    async fn create_document(&self, values: &CreateDocumentValues<'_>) -> Result<Document> {
        let now = Utc::now().naive_utc();

        let document = Document {
            id: Uuid::new_v4(),
            kind: values.kind,
            author: values.author.id,
            parent: values.parent,
            fields: values.fields.clone(),
            created_at: now,
            modify_date: now,
            deleted_at: None,
        };

        self.documents.lock().await.insert(document.clone());

        Ok(document)
    }

    async fn update_document(
        &self,
        document: &Document,
        values: &UpdateDocumentValues<'_>,
    ) -> Result<Document> {
        let mut documents = self.documents.lock().await;

        let stored = documents
            .get_mut(&document.id)
            .ok_or(Error::MissingDocument(document.id))?;

        for (name, value) in values.fields {
            stored.fields.insert(name.clone(), value.clone());
        }
        stored.modify_date = Utc::now().naive_utc();

        Ok(stored.clone())
    }

    async fn delete_document(&self, document: &Document) -> Result<()> {
        let mut documents = self.documents.lock().await;

        let stored = documents
            .get_mut(&document.id)
            .ok_or(Error::MissingDocument(document.id))?;

        stored.deleted_at = Some(Utc::now().naive_utc());

        Ok(())
    }
}
