//! In-memory document gateway for testing.
//!
//! Mirrors the store's semantics closely enough for controller tests: listed
//! order is path order, patch replaces only the fields it is given, delete of
//! a missing document is acknowledged. Every call is counted so tests can
//! assert exactly which network operations an action caused.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::GatewayError;
use crate::rest::EMPTY_UPDATE;
use crate::types::{Credential, Document, FieldSet, FieldValue};
use crate::DocumentGateway;

/// Number of calls made per gateway operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub authenticate: usize,
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl CallCounts {
    /// Calls that reached the document store (sign-in excluded).
    pub fn data_calls(&self) -> usize {
        self.list + self.create + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<String, String>,
    issued: HashSet<String>,
    documents: BTreeMap<String, Document>,
    calls: CallCounts,
    next_id: u64,
}

/// An in-memory [`DocumentGateway`].
///
/// # Examples
///
/// ```
/// # use docdesk_store::{DocumentGateway, MemoryGateway};
/// # #[tokio::main]
/// # async fn main() {
/// let gw = MemoryGateway::new("demo");
/// gw.add_account("admin@example.com", "hunter22").await;
/// let cred = gw.authenticate("admin@example.com", "hunter22").await.unwrap();
/// let docs = gw.list_documents(&cred, "students").await.unwrap();
/// assert!(docs.is_empty());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryGateway {
    documents_root: String,
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryGateway {
    /// Create an empty gateway for `project_id`.
    pub fn new(project_id: &str) -> Self {
        Self {
            documents_root: format!("projects/{project_id}/databases/(default)/documents"),
            state: Arc::new(RwLock::new(MemoryState::default())),
        }
    }

    /// Resource path prefix for this gateway's documents.
    pub fn documents_root(&self) -> &str {
        &self.documents_root
    }

    /// Register an account that [`authenticate`](DocumentGateway::authenticate)
    /// will accept.
    pub async fn add_account(&self, email: &str, password: &str) {
        let mut state = self.state.write().await;
        state.accounts.insert(email.to_owned(), password.to_owned());
    }

    /// Seed a document without counting a call. Returns its full path.
    pub async fn insert_document(&self, collection: &str, id: &str, fields: &FieldSet) -> String {
        let path = format!("{}/{collection}/{id}", self.documents_root);
        let mut state = self.state.write().await;
        state.documents.insert(path.clone(), to_document(&path, fields));
        path
    }

    /// Fetch a stored document by path without counting a call.
    pub async fn document(&self, path: &str) -> Option<Document> {
        self.state.read().await.documents.get(path).cloned()
    }

    /// Calls made so far.
    pub async fn calls(&self) -> CallCounts {
        self.state.read().await.calls
    }

    fn check_credential(
        state: &MemoryState,
        credential: &Credential,
        reject: fn(String) -> GatewayError,
    ) -> Result<(), GatewayError> {
        if state.issued.contains(credential.bearer()) {
            Ok(())
        } else {
            Err(reject(
                "Request had invalid authentication credentials.".to_owned(),
            ))
        }
    }
}

fn to_document(path: &str, fields: &FieldSet) -> Document {
    Document {
        name: path.to_owned(),
        fields: fields
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::from(v.clone())))
            .collect(),
        create_time: None,
        update_time: None,
    }
}

#[async_trait::async_trait]
impl DocumentGateway for MemoryGateway {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Credential, GatewayError> {
        let mut state = self.state.write().await;
        state.calls.authenticate += 1;

        let accepted = state.accounts.get(email).is_some_and(|p| p == password);
        if !accepted {
            return Err(GatewayError::Auth("INVALID_LOGIN_CREDENTIALS".to_owned()));
        }

        state.next_id += 1;
        let token = format!("memory-token-{}", state.next_id);
        state.issued.insert(token.clone());
        Ok(Credential::new(token))
    }

    async fn list_documents(
        &self,
        credential: &Credential,
        collection: &str,
    ) -> Result<Vec<Document>, GatewayError> {
        let mut state = self.state.write().await;
        state.calls.list += 1;
        Self::check_credential(&state, credential, GatewayError::Read)?;

        let prefix = format!("{}/{collection}/", self.documents_root);
        let docs = state
            .documents
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| !k[prefix.len()..].contains('/'))
            .map(|(_, doc)| doc.clone())
            .collect();
        Ok(docs)
    }

    async fn create_document(
        &self,
        credential: &Credential,
        collection: &str,
        document_id: Option<&str>,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        let mut state = self.state.write().await;
        state.calls.create += 1;
        Self::check_credential(&state, credential, GatewayError::Write)?;

        let id = match document_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_owned(),
            None => {
                state.next_id += 1;
                format!("auto{:016}", state.next_id)
            }
        };
        let path = format!("{}/{collection}/{id}", self.documents_root);
        if state.documents.contains_key(&path) {
            return Err(GatewayError::Write(format!("Document already exists: {path}")));
        }

        let doc = to_document(&path, fields);
        state.documents.insert(path, doc.clone());
        Ok(doc)
    }

    async fn update_document(
        &self,
        credential: &Credential,
        path: &str,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        if fields.is_empty() {
            return Err(GatewayError::Write(EMPTY_UPDATE.to_owned()));
        }
        let mut state = self.state.write().await;
        state.calls.update += 1;
        Self::check_credential(&state, credential, GatewayError::Write)?;

        let doc = state
            .documents
            .entry(path.to_owned())
            .or_insert_with(|| to_document(path, &FieldSet::new()));
        for (name, value) in fields {
            doc.fields.insert(name.clone(), FieldValue::from(value.clone()));
        }
        Ok(doc.clone())
    }

    async fn delete_document(
        &self,
        credential: &Credential,
        path: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.write().await;
        state.calls.delete += 1;
        Self::check_credential(&state, credential, GatewayError::Write)?;

        state.documents.remove(path);
        Ok(())
    }
}
