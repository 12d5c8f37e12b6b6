//! Coordinates the catalog and the upload batch into what a dashboard
//! shows: a load state, the (filtered) document list, the upload modal and
//! a notification line.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::catalog::{DocumentCatalog, RefreshOutcome, RemoveOutcome};
use crate::document::{Document, DocumentId};
use crate::events::{DashboardEvent, EventBus, Notification};
use crate::store::{DocumentStore, IngestReceipt, StoreError};
use crate::upload::{UploadError, UploadSession};

pub const LOAD_FAILED: &str = "Failed to load documents. Please try again later.";
pub const UPLOAD_SUCCEEDED: &str = "Files uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Failed to upload files. Please try again.";
pub const DELETE_SUCCEEDED: &str = "Document deleted successfully";
pub const NO_MATCHES: &str = "No documents found matching your search.";
pub const NO_DOCUMENTS: &str = "No documents available.";

/// Load state of the document list. Only an explicit refresh moves it back
/// to `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug)]
struct ViewModel {
    view: ViewState,
    search: String,
    upload_open: bool,
    notification: Option<Notification>,
}

pub struct DashboardController {
    catalog: DocumentCatalog,
    upload: UploadSession,
    events: EventBus,
    model: Mutex<ViewModel>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn DocumentStore>, events: EventBus) -> Self {
        Self {
            catalog: DocumentCatalog::new(Arc::clone(&store)),
            upload: UploadSession::new(store),
            events,
            model: Mutex::new(ViewModel {
                view: ViewState::Loading,
                search: String::new(),
                upload_open: false,
                notification: None,
            }),
        }
    }

    fn model(&self) -> MutexGuard<'_, ViewModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // The catalog stays private: every refresh goes through `refresh`, so
    // a superseded refresh always has a newer one left to settle the view.

    /// Current catalog snapshot, unfiltered.
    pub fn documents(&self) -> Arc<Vec<Document>> {
        self.catalog.snapshot()
    }

    pub fn document_count(&self) -> usize {
        self.catalog.len()
    }

    /// Number of catalog snapshots applied so far.
    pub fn generation(&self) -> u64 {
        self.catalog.generation()
    }

    pub fn upload(&self) -> &UploadSession {
        &self.upload
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn view_state(&self) -> ViewState {
        self.model().view.clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.model().notification.clone()
    }

    pub fn dismiss_notification(&self) {
        self.model().notification = None;
    }

    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            tracing::warn!(message = %notification.message, "notifying error");
        } else {
            tracing::info!(message = %notification.message, "notifying");
        }
        self.model().notification = Some(notification.clone());
        self.events.publish(DashboardEvent::Notification(notification));
    }

    /// First load.
    pub async fn mount(&self) -> Result<RefreshOutcome, StoreError> {
        self.refresh().await
    }

    /// Reload the catalog. A failed reload keeps the documents already
    /// shown and moves the view to `Error`.
    pub async fn refresh(&self) -> Result<RefreshOutcome, StoreError> {
        self.model().view = ViewState::Loading;
        match self.catalog.refresh().await {
            Ok(RefreshOutcome::Applied { generation, count }) => {
                self.model().view = ViewState::Ready;
                self.events
                    .publish(DashboardEvent::CatalogRefreshed { generation, count });
                Ok(RefreshOutcome::Applied { generation, count })
            }
            // The newer refresh settles the view.
            Ok(RefreshOutcome::Superseded) => Ok(RefreshOutcome::Superseded),
            Err(e) => {
                self.model().view = ViewState::Error(LOAD_FAILED.to_string());
                self.notify(Notification::error(format!("{LOAD_FAILED} ({})", e.user_message())));
                Err(e)
            }
        }
    }

    /// Set the search term and return the matching documents.
    pub fn search(&self, text: &str) -> Vec<Document> {
        self.model().search = text.to_string();
        self.catalog.filter(text)
    }

    pub fn search_term(&self) -> String {
        self.model().search.clone()
    }

    /// Documents matching the current search term in the latest snapshot.
    pub fn visible_documents(&self) -> Vec<Document> {
        let term = self.search_term();
        self.catalog.filter(&term)
    }

    /// What to show in place of an empty list.
    pub fn empty_message(&self) -> &'static str {
        if self.search_term().is_empty() {
            NO_DOCUMENTS
        } else {
            NO_MATCHES
        }
    }

    /// Delete a document. On failure the error is shown and the catalog is
    /// reloaded at once so the list matches the store again.
    pub async fn delete(&self, id: &DocumentId) -> Result<RemoveOutcome, StoreError> {
        match self.catalog.remove(id).await {
            Ok(RemoveOutcome::Removed) => {
                self.notify(Notification::success(DELETE_SUCCEEDED));
                Ok(RemoveOutcome::Removed)
            }
            Ok(RemoveOutcome::NotPresent) => Ok(RemoveOutcome::NotPresent),
            Err(e) => {
                self.notify(Notification::error(format!(
                    "Failed to delete document: {}",
                    e.user_message()
                )));
                if let Err(reconcile) = self.refresh().await {
                    tracing::warn!(document_id = %id, error = %reconcile, "reconciling refresh failed");
                }
                Err(e)
            }
        }
    }

    pub fn is_upload_open(&self) -> bool {
        self.model().upload_open
    }

    pub fn open_upload(&self) {
        self.model().upload_open = true;
    }

    /// Close the upload modal, refreshing once. Closing a modal that is not
    /// open does nothing, so a repeated close never fetches twice.
    pub async fn close_upload(&self) -> Result<Option<RefreshOutcome>, StoreError> {
        let was_open = std::mem::replace(&mut self.model().upload_open, false);
        if !was_open {
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    /// Submit the pending batch. On success the modal closes and the
    /// catalog is refreshed exactly once; on failure the modal and the
    /// pending files are left as they were.
    pub async fn submit_upload(&self) -> Result<IngestReceipt, UploadError> {
        match self.upload.submit().await {
            Ok(receipt) => {
                self.notify(Notification::success(UPLOAD_SUCCEEDED));
                let refreshed = if self.is_upload_open() {
                    self.close_upload().await.map(|_| ())
                } else {
                    self.refresh().await.map(|_| ())
                };
                if let Err(e) = refreshed {
                    tracing::warn!(error = %e, "refresh after upload failed");
                }
                Ok(receipt)
            }
            Err(e) => {
                let message = match &e {
                    UploadError::AlreadyInProgress => e.to_string(),
                    UploadError::EmptyBatch => format!("{UPLOAD_FAILED} ({e})"),
                    UploadError::Store(store) => {
                        format!("{UPLOAD_FAILED} ({})", store.user_message())
                    }
                };
                self.notify(Notification::error(message));
                Err(e)
            }
        }
    }
}
