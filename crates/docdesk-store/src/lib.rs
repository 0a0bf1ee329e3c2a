//! Remote document gateway for `docdesk`.
//!
//! This crate defines the [`DocumentGateway`] trait: one sign-in call against
//! the identity service plus list/create/patch/delete against the document
//! store. It knows nothing about forms, schemas or the panel UI; the codec in
//! `docdesk-core` turns form strings into [`FieldSet`]s before they reach this
//! layer.
//!
//! Two implementations are provided:
//!
//! - [`RestGateway`]: Identity Toolkit + Firestore REST v1 over `reqwest`
//! - [`MemoryGateway`]: in-process, for tests and offline development
//!
//! No implementation retries. Each call is a single attempt and its failure is
//! surfaced to the caller unchanged.

mod error;
mod memory;
mod rest;
mod types;

pub use error::GatewayError;
pub use memory::{CallCounts, MemoryGateway};
pub use rest::{GatewayConfig, RestGateway, DEFAULT_FIRESTORE_URL, DEFAULT_IDENTITY_URL};
pub use types::{Credential, Document, FieldSet, FieldValue, TypedValue};

/// A pluggable remote document store.
///
/// Document paths are full resource names as returned by the store, e.g.
/// `projects/demo/databases/(default)/documents/students/abc123`.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentGateway: Send + Sync + 'static {
    /// Exchange an email/password pair for a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Auth`] carrying the identity service's message
    /// verbatim when it rejects the sign-in.
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<Credential, GatewayError>;

    /// List every document in a collection, in the order the store returns
    /// them. An empty collection is `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Read`] if the store rejects the request.
    async fn list_documents(
        &self,
        credential: &Credential,
        collection: &str,
    ) -> Result<Vec<Document>, GatewayError>;

    /// Create a document, optionally with a client-chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Write`] if the store rejects the write.
    async fn create_document(
        &self,
        credential: &Credential,
        collection: &str,
        document_id: Option<&str>,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError>;

    /// Replace the named fields of a document.
    ///
    /// Every key in `fields` is listed in the update mask; fields not in the
    /// set are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Write`] if `fields` is empty (nothing is sent)
    /// or the store rejects the write.
    async fn update_document(
        &self,
        credential: &Credential,
        path: &str,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError>;

    /// Delete a document by full resource path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Write`] if the store does not acknowledge it.
    async fn delete_document(&self, credential: &Credential, path: &str)
    -> Result<(), GatewayError>;
}
