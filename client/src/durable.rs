//! The durable-persistence interface and its HTTP adapter.
//!
//! DESIGN
//! ======
//! The relay knows nothing about persistence; durability is an external
//! service reached over HTTP, scoped to an authenticated identity and a
//! room. The client only needs three operations, expressed as the
//! [`NoteStore`] trait so the reconciliation layer can be exercised against
//! mocks. Every failure class — transport fault, timeout, application-level
//! rejection — maps to the same rollback path in the session.

use std::time::Duration;

use async_trait::async_trait;

use wire::{NotePatch, NoteRecord};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("store rejected request: status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("durable call timed out")]
    Timeout,
    #[error("store response missing `{0}`")]
    MissingField(&'static str),
}

// =============================================================================
// INTERFACE
// =============================================================================

/// External durable storage for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a new note (carrying its temporary id) and return the
    /// durable id the store issued for it.
    async fn create_note(&self, room_id: &str, note: &NoteRecord) -> Result<String, StoreError>;

    /// Persist a sparse field update to an existing note.
    async fn update_note(&self, note_id: &str, fields: &NotePatch) -> Result<(), StoreError>;

    /// Remove a note.
    async fn delete_note(&self, note_id: &str) -> Result<(), StoreError>;
}

// =============================================================================
// HTTP ADAPTER
// =============================================================================

/// `NoteStore` over the external persistence service's REST surface.
pub struct HttpNoteStore {
    http: reqwest::Client,
    base_url: String,
    identity_token: Option<String>,
}

impl HttpNoteStore {
    /// Build an adapter for the service at `base_url`. The identity token
    /// is opaque here — the store performs its own verification.
    pub fn new(base_url: impl Into<String>, identity_token: Option<String>) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| StoreError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url, identity_token })
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.identity_token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn check(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(StoreError::Rejected { status, body });
        }
        Ok(body)
    }
}

#[async_trait]
impl NoteStore for HttpNoteStore {
    async fn create_note(&self, room_id: &str, note: &NoteRecord) -> Result<String, StoreError> {
        let url = format!("{}/rooms/{room_id}/notes", self.base_url);
        let response = self
            .request(reqwest::Method::POST, url)
            .json(note)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let body = Self::check(response).await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| StoreError::Request(e.to_string()))?;
        value
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or(StoreError::MissingField("id"))
    }

    async fn update_note(&self, note_id: &str, fields: &NotePatch) -> Result<(), StoreError> {
        let url = format!("{}/notes/{note_id}", self.base_url);
        let response = self
            .request(reqwest::Method::PATCH, url)
            .json(fields)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_note(&self, note_id: &str) -> Result<(), StoreError> {
        let url = format!("{}/notes/{note_id}", self.base_url);
        let response = self
            .request(reqwest::Method::DELETE, url)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let store = HttpNoteStore::new("http://localhost:9000/", None).expect("client builds");
        assert_eq!(store.base_url, "http://localhost:9000");
    }

    #[test]
    fn errors_render_their_context() {
        let err = StoreError::Rejected { status: 403, body: "forbidden".into() };
        assert!(err.to_string().contains("403"));
        assert!(StoreError::Timeout.to_string().contains("timed out"));
        assert!(StoreError::MissingField("id").to_string().contains("id"));
    }
}
