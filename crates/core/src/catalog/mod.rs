//! Local view of every document held by the remote store.
//!
//! The snapshot is swapped whole: readers holding an `Arc` keep seeing the
//! snapshot they took, never a half-applied one.
//!
//! Refreshes are ticketed. Only the most recently started refresh may
//! replace the snapshot; an older one that resolves later (or earlier) is
//! discarded. Optimistic deletes leave a tombstone so that a refresh issued
//! before the delete landed cannot bring the document back.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::document::{Document, DocumentId};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot was replaced.
    Applied { generation: u64, count: usize },
    /// A newer refresh started before this one finished; its result was
    /// dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The id was not in the snapshot. Nothing was sent.
    NotPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tombstone {
    /// Remote delete still in flight.
    Pending,
    /// Remote delete succeeded while refresh ticket `after_ticket` was the
    /// newest. Refreshes up to and including that ticket may predate it.
    Confirmed { after_ticket: u64 },
}

impl Tombstone {
    fn hides_from(self, ticket: u64) -> bool {
        match self {
            Tombstone::Pending => true,
            Tombstone::Confirmed { after_ticket } => ticket <= after_ticket,
        }
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    snapshot: Arc<Vec<Document>>,
    /// Applied snapshot replacements.
    generation: u64,
    /// Refresh tickets handed out.
    started: u64,
    tombstones: HashMap<DocumentId, Tombstone>,
}

pub struct DocumentCatalog {
    store: Arc<dyn DocumentStore>,
    state: Mutex<CatalogState>,
}

impl DocumentCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            state: Mutex::new(CatalogState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current snapshot. Cheap; shares the underlying list.
    pub fn snapshot(&self) -> Arc<Vec<Document>> {
        Arc::clone(&self.state().snapshot)
    }

    /// Number of snapshot replacements applied so far.
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    pub fn len(&self) -> usize {
        self.state().snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().snapshot.is_empty()
    }

    pub fn find(&self, id: &DocumentId) -> Option<Document> {
        self.state().snapshot.iter().find(|d| &d.id == id).cloned()
    }

    /// Replace the snapshot with the store's current overview.
    ///
    /// On failure the old snapshot stays in place. A failure of a refresh
    /// that has already been superseded is logged and reported as
    /// [`RefreshOutcome::Superseded`], since the newer refresh decides what
    /// the catalog shows.
    pub async fn refresh(&self) -> Result<RefreshOutcome, StoreError> {
        let ticket = {
            let mut state = self.state();
            state.started += 1;
            state.started
        };
        tracing::debug!(ticket, "refreshing catalog");

        let result = self.store.list_overview().await;

        let mut state = self.state();
        if ticket != state.started {
            tracing::debug!(ticket, latest = state.started, "discarding superseded refresh");
            if let Err(e) = &result {
                tracing::warn!(ticket, error = %e, "superseded refresh failed");
            }
            return Ok(RefreshOutcome::Superseded);
        }

        let documents = result?;
        let mut seen = HashSet::with_capacity(documents.len());
        let documents: Vec<Document> = documents
            .into_iter()
            .filter(|d| {
                // Ids are unique within a snapshot; the first entry wins.
                if !seen.insert(d.id.clone()) {
                    tracing::warn!(ticket, document_id = %d.id, "dropping duplicate overview entry");
                    return false;
                }
                !state
                    .tombstones
                    .get(&d.id)
                    .is_some_and(|t| t.hides_from(ticket))
            })
            .collect();
        state.tombstones.retain(|_, t| t.hides_from(ticket));

        state.snapshot = Arc::new(documents);
        state.generation += 1;
        let outcome = RefreshOutcome::Applied {
            generation: state.generation,
            count: state.snapshot.len(),
        };
        tracing::info!(ticket, generation = state.generation, count = state.snapshot.len(), "catalog refreshed");
        Ok(outcome)
    }

    /// Drop `id` from the snapshot, then delete it remotely.
    ///
    /// The local removal is not rolled back if the remote delete fails;
    /// callers reconcile with a refresh.
    pub async fn remove(&self, id: &DocumentId) -> Result<RemoveOutcome, StoreError> {
        {
            let mut state = self.state();
            if !state.snapshot.iter().any(|d| &d.id == id) {
                tracing::debug!(document_id = %id, "remove of absent document ignored");
                return Ok(RemoveOutcome::NotPresent);
            }
            let remaining: Vec<Document> = state
                .snapshot
                .iter()
                .filter(|d| &d.id != id)
                .cloned()
                .collect();
            state.snapshot = Arc::new(remaining);
            state.tombstones.insert(id.clone(), Tombstone::Pending);
        }

        let result = self.store.delete_by_document_id(id).await;

        let mut state = self.state();
        match result {
            Ok(()) => {
                let after_ticket = state.started;
                state
                    .tombstones
                    .insert(id.clone(), Tombstone::Confirmed { after_ticket });
                Ok(RemoveOutcome::Removed)
            }
            Err(e) => {
                state.tombstones.remove(id);
                tracing::warn!(document_id = %id, error = %e, "remote delete failed; local removal kept");
                Err(e)
            }
        }
    }

    /// Documents whose title contains `text`, ignoring case, in snapshot
    /// order. An empty `text` returns the whole snapshot.
    pub fn filter(&self, text: &str) -> Vec<Document> {
        let needle = text.to_lowercase();
        self.snapshot()
            .iter()
            .filter(|d| d.title_matches(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_tombstone_hides_from_every_refresh() {
        assert!(Tombstone::Pending.hides_from(1));
        assert!(Tombstone::Pending.hides_from(u64::MAX));
    }

    #[test]
    fn confirmed_tombstone_hides_only_older_refreshes() {
        let t = Tombstone::Confirmed { after_ticket: 3 };
        assert!(t.hides_from(2));
        assert!(t.hides_from(3));
        assert!(!t.hides_from(4));
    }
}
