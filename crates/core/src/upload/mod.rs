//! The batch of files picked for upload and the submit that sends it.

pub mod pending;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use uuid::Uuid;

use crate::document::validate::validate_index;
use crate::store::{DocumentStore, IngestReceipt, StoreError};

pub use pending::PendingFile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("an upload is already in progress")]
    AlreadyInProgress,
    #[error("no files selected")]
    EmptyBatch,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pending files plus the single in-flight submit.
pub struct UploadSession {
    store: Arc<dyn DocumentStore>,
    files: Mutex<Vec<PendingFile>>,
    uploading: AtomicBool,
}

/// Holds the in-progress flag for the life of one submit, including when
/// the submit future is dropped mid-flight.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl UploadSession {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            files: Mutex::new(Vec::new()),
            uploading: AtomicBool::new(false),
        }
    }

    fn files(&self) -> MutexGuard<'_, Vec<PendingFile>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append files in order. Duplicate names are kept.
    pub fn add_files(&self, new_files: impl IntoIterator<Item = PendingFile>) {
        let mut files = self.files();
        files.extend(new_files);
        tracing::debug!(pending = files.len(), "files added to upload batch");
    }

    /// Remove the file at `index`. Out-of-range indexes are ignored.
    pub fn remove_file(&self, index: usize) -> Option<PendingFile> {
        let mut files = self.files();
        match validate_index(index, files.len()) {
            Ok(()) => Some(files.remove(index)),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring remove of missing pending file");
                None
            }
        }
    }

    pub fn clear(&self) {
        self.files().clear();
    }

    /// Current batch, in selection order.
    pub fn pending(&self) -> Vec<PendingFile> {
        self.files().clone()
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Send the whole batch in one request.
    ///
    /// On success the submitted files leave the batch; files added while
    /// the request was in flight stay. On failure the batch is untouched so
    /// it can be retried as is.
    pub async fn submit(&self) -> Result<IngestReceipt, UploadError> {
        let _in_flight = InFlight::acquire(&self.uploading).ok_or(UploadError::AlreadyInProgress)?;

        let batch = self.pending();
        if batch.is_empty() {
            return Err(UploadError::EmptyBatch);
        }

        tracing::info!(files = batch.len(), "submitting upload batch");
        match self.store.ingest(&batch).await {
            Ok(receipt) => {
                let submitted: HashSet<Uuid> = batch.iter().map(PendingFile::id).collect();
                self.files().retain(|f| !submitted.contains(&f.id()));
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(files = batch.len(), error = %e, "upload batch failed");
                Err(e.into())
            }
        }
    }
}
