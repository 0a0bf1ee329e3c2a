//! Identity Toolkit + Firestore REST v1 gateway.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::GatewayError;
use crate::types::{
    ApiErrorBody, Credential, Document, FieldSet, ListResponse, SignInRequest, SignInResponse,
    WriteBody,
};
use crate::DocumentGateway;

/// Public Identity Toolkit endpoint.
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
/// Public Firestore endpoint.
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";
/// Message for an update that names no fields.
pub(crate) const EMPTY_UPDATE: &str = "No fields to update";

/// Configuration for [`RestGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Web API key, sent as `key` on the sign-in call.
    pub api_key: String,
    /// Project id used to build document paths.
    pub project_id: String,
    /// Identity service base URL. Default: [`DEFAULT_IDENTITY_URL`].
    pub identity_url: String,
    /// Document store base URL. Default: [`DEFAULT_FIRESTORE_URL`].
    pub firestore_url: String,
    /// Database id. Default: `(default)`.
    pub database: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            identity_url: DEFAULT_IDENTITY_URL.to_owned(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_owned(),
            database: DEFAULT_DATABASE.to_owned(),
            timeout: None,
        }
    }
}

/// Gateway talking to the hosted identity service and document store.
#[derive(Debug, Clone)]
pub struct RestGateway {
    api_key: String,
    identity_url: String,
    firestore_url: String,
    documents_root: String,
    client: reqwest::Client,
}

impl RestGateway {
    /// Build a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Config` if the API key or project id is empty,
    /// or `GatewayError::Network` if the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if config.api_key.is_empty() {
            return Err(GatewayError::Config("missing API key".to_owned()));
        }
        if config.project_id.is_empty() {
            return Err(GatewayError::Config("missing project id".to_owned()));
        }

        let mut builder = reqwest::Client::builder().user_agent("docdesk/0.1.0");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GatewayError::Network)?;

        let documents_root = format!(
            "projects/{}/databases/{}/documents",
            config.project_id, config.database
        );

        Ok(Self {
            api_key: config.api_key,
            identity_url: config.identity_url.trim_end_matches('/').to_owned(),
            firestore_url: config.firestore_url.trim_end_matches('/').to_owned(),
            documents_root,
            client,
        })
    }

    /// Resource path prefix for this project's documents.
    pub fn documents_root(&self) -> &str {
        &self.documents_root
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.firestore_url,
            self.documents_root,
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.firestore_url, path.trim_start_matches('/'))
    }
}

#[async_trait::async_trait]
impl DocumentGateway for RestGateway {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Credential, GatewayError> {
        let url = format!("{}/v1/accounts:signInWithPassword", self.identity_url);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let body: SignInResponse =
            parse_json(resp, GatewayError::Auth, "Authentication failed").await?;
        debug!("identity service issued credential");
        Ok(Credential::new(body.id_token))
    }

    async fn list_documents(
        &self,
        credential: &Credential,
        collection: &str,
    ) -> Result<Vec<Document>, GatewayError> {
        let resp = self
            .client
            .get(self.collection_url(collection))
            .bearer_auth(credential.bearer())
            .send()
            .await?;

        let body: ListResponse =
            parse_json(resp, GatewayError::Read, "Failed to load documents").await?;
        debug!(collection, count = body.documents.len(), "listed documents");
        Ok(body.documents)
    }

    async fn create_document(
        &self,
        credential: &Credential,
        collection: &str,
        document_id: Option<&str>,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        let mut req = self
            .client
            .post(self.collection_url(collection))
            .bearer_auth(credential.bearer());
        if let Some(id) = document_id.filter(|id| !id.is_empty()) {
            req = req.query(&[("documentId", id)]);
        }

        let resp = req.json(&WriteBody::from_fields(fields)).send().await?;
        let doc: Document =
            parse_json(resp, GatewayError::Write, "Failed to create document").await?;
        debug!(collection, path = %doc.name, "created document");
        Ok(doc)
    }

    async fn update_document(
        &self,
        credential: &Credential,
        path: &str,
        fields: &FieldSet,
    ) -> Result<Document, GatewayError> {
        // Without a mask the store replaces the whole document.
        if fields.is_empty() {
            return Err(GatewayError::Write(EMPTY_UPDATE.to_owned()));
        }
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", name.as_str()))
            .collect();

        let resp = self
            .client
            .patch(self.document_url(path))
            .query(&mask)
            .bearer_auth(credential.bearer())
            .json(&WriteBody::from_fields(fields))
            .send()
            .await?;

        let doc: Document =
            parse_json(resp, GatewayError::Write, "Failed to update document").await?;
        debug!(path, masked = mask.len(), "updated document");
        Ok(doc)
    }

    async fn delete_document(
        &self,
        credential: &Credential,
        path: &str,
    ) -> Result<(), GatewayError> {
        let resp = self
            .client
            .delete(self.document_url(path))
            .bearer_auth(credential.bearer())
            .send()
            .await?;

        if !resp.status().is_success() {
            let msg = error_message(resp)
                .await
                .unwrap_or_else(|| "Failed to delete document".to_owned());
            return Err(GatewayError::Write(msg));
        }
        debug!(path, "deleted document");
        Ok(())
    }
}

/// Parse a success body, or map a non-success status through `reject` using
/// the service's message (or `fallback` when the body has none).
async fn parse_json<T: DeserializeOwned>(
    resp: Response,
    reject: fn(String) -> GatewayError,
    fallback: &str,
) -> Result<T, GatewayError> {
    if !resp.status().is_success() {
        let msg = error_message(resp)
            .await
            .unwrap_or_else(|| fallback.to_owned());
        return Err(reject(msg));
    }

    let text = resp.text().await?;
    if text.trim().is_empty() {
        return serde_json::from_str("{}").map_err(GatewayError::Json);
    }
    serde_json::from_str(&text).map_err(GatewayError::Json)
}

async fn error_message(resp: Response) -> Option<String> {
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
}
