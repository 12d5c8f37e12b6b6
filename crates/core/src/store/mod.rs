//! Outbound access to the remote document store.
//!
//! All three verbs live behind one trait so error normalization (and any
//! future retry policy) has exactly one home.

pub mod config;
pub mod error;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{Document, DocumentId};
use crate::upload::PendingFile;

pub use config::{DeleteFilterPlacement, StoreConfig};
pub use error::StoreError;
pub use http::HttpDocumentStore;

/// Opaque payload the store returns after accepting an ingest batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub payload: Value,
}

impl IngestReceipt {
    /// Build a receipt from a raw response body. An empty body becomes
    /// `null`; a body that is not JSON is kept as a string.
    pub fn from_body(body: &str) -> Self {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        Self { payload }
    }
}

/// The remote store's contract. Implementations never retry and never
/// recover locally: they normalize failures into [`StoreError`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the documents overview, in the order the store returns it.
    async fn list_overview(&self) -> Result<Vec<Document>, StoreError>;

    /// Upload all files as a single batch. Success means the batch as a
    /// whole was accepted.
    async fn ingest(&self, files: &[PendingFile]) -> Result<IngestReceipt, StoreError>;

    /// Delete the document matching `id`. Deleting an id that is already
    /// gone reports whatever the store reports.
    async fn delete_by_document_id(&self, id: &DocumentId) -> Result<(), StoreError>;
}
