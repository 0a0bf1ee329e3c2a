//! Per-browser session state.
//!
//! Owned by a single [`Controller`](crate::Controller), which is the only
//! writer. Nothing here is persisted.

use docdesk_store::{Credential, Document};

/// Credential, active collection and the last-fetched document list.
#[derive(Debug, Default)]
pub struct Session {
    credential: Option<Credential>,
    email: Option<String>,
    collection: Option<String>,
    documents: Vec<Document>,
}

impl Session {
    /// Store the credential from a successful sign-in.
    pub fn sign_in(&mut self, email: &str, credential: Credential) {
        self.credential = Some(credential);
        self.email = Some(email.to_owned());
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Email the session signed in with.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn active_collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Switch collections. The cached list belongs to the old collection, so
    /// it is dropped.
    pub fn set_collection(&mut self, collection: &str) {
        if self.collection.as_deref() != Some(collection) {
            self.documents.clear();
        }
        self.collection = Some(collection.to_owned());
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    /// Look a document up in the cached list by full path.
    pub fn find_document(&self, path: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.name == path)
    }

    /// Forget everything, as on logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
