//! REST backend client.
//!
//! The engine talks to its backend through the `Backend` trait so the
//! store, session, and wire codec can be tested with an in-process fake.
//! `RestBackend` is the real implementation over reqwest.

mod wire;

pub use wire::{
    annotations_from_wire, annotations_to_wire, from_wire, to_wire, BulkDeleteRequest,
    DocumentPayload, DocumentUpdate, WireAnnotation,
};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnnotateError;
use crate::models::{DocumentSummary, Project};

/// Configuration for the REST client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (default: http://localhost:8000/api)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Backend operations the annotation engine depends on.
///
/// Mirrors the consumed REST contract one method per endpoint. Session
/// and tests depend on this trait, never on `RestBackend` directly.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /documents/{id}`
    async fn get_document(&self, id: &str) -> Result<DocumentPayload, AnnotateError>;

    /// `PUT /documents/{id}`
    async fn put_document(
        &self,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<DocumentPayload, AnnotateError>;

    /// `GET /projects/{id}`
    async fn get_project(&self, id: &str) -> Result<Project, AnnotateError>;

    /// `GET /documents/project/{id}`
    async fn list_project_documents(
        &self,
        project_id: &str,
    ) -> Result<Vec<DocumentSummary>, AnnotateError>;

    /// `DELETE /documents/bulk-delete`
    async fn bulk_delete(&self, document_ids: &[String]) -> Result<(), AnnotateError>;

    /// `GET /projects/{id}/export` — serialized JSON blob for download.
    async fn export_project(&self, project_id: &str) -> Result<Vec<u8>, AnnotateError>;
}

/// REST implementation of `Backend`.
pub struct RestBackend {
    config: ClientConfig,
    client: Client,
}

impl RestBackend {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    /// Get the config.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Map a non-success status to an API error with the response body as
    /// the message.
    async fn check(response: Response) -> Result<Response, AnnotateError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AnnotateError::Api {
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn get_document(&self, id: &str) -> Result<DocumentPayload, AnnotateError> {
        let url = self.url(&format!("/documents/{id}"));
        debug!(document_id = id, "fetching document");
        let response = Self::check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn put_document(
        &self,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<DocumentPayload, AnnotateError> {
        let url = self.url(&format!("/documents/{id}"));
        debug!(
            document_id = id,
            annotations = update.annotations.len(),
            "saving document"
        );
        let response = Self::check(self.client.put(&url).json(update).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_project(&self, id: &str) -> Result<Project, AnnotateError> {
        let url = self.url(&format!("/projects/{id}"));
        let response = Self::check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn list_project_documents(
        &self,
        project_id: &str,
    ) -> Result<Vec<DocumentSummary>, AnnotateError> {
        // limit=-1 requests the full list; the sibling navigator needs
        // every document, not one page.
        let url = self.url(&format!("/documents/project/{project_id}"));
        let response = Self::check(
            self.client
                .get(&url)
                .query(&[("skip", "0"), ("limit", "-1")])
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn bulk_delete(&self, document_ids: &[String]) -> Result<(), AnnotateError> {
        let url = self.url("/documents/bulk-delete");
        let body = BulkDeleteRequest {
            document_ids: document_ids.to_vec(),
        };
        Self::check(self.client.delete(&url).json(&body).send().await?).await?;
        Ok(())
    }

    async fn export_project(&self, project_id: &str) -> Result<Vec<u8>, AnnotateError> {
        let url = self.url(&format!("/projects/{project_id}/export"));
        let response = Self::check(self.client.get(&url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
