//! Core of the ingest admin: keeps a local catalog of the documents held by
//! a remote ingestion service in step with listing, batch uploads and
//! per-document deletes.

pub mod catalog;
pub mod dashboard;
pub mod document;
pub mod events;
pub mod filter;
pub mod store;
pub mod upload;

pub use catalog::{DocumentCatalog, RefreshOutcome, RemoveOutcome};
pub use dashboard::{DashboardController, ViewState};
pub use document::{Document, DocumentId, ValidationError};
pub use events::{DashboardEvent, EventBus, Notification, NotificationLevel};
pub use filter::Filter;
pub use store::{DocumentStore, HttpDocumentStore, IngestReceipt, StoreConfig, StoreError};
pub use upload::{PendingFile, UploadError, UploadSession};
