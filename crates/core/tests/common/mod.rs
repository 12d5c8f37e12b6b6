//! Shared test infrastructure: an in-memory document store whose remote
//! state, failures and response timing are scripted by the test.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use ingest_admin_core::{Document, DocumentId, DocumentStore, IngestReceipt, PendingFile, StoreError};
use serde_json::json;
use tokio::sync::oneshot;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("ingest_admin_core=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn doc(id: &str, title: &str) -> Document {
    Document::new(
        DocumentId::parse(id).unwrap(),
        title,
        Utc.with_ymd_and_hms(2024, 9, 20, 18, 30, 17).unwrap(),
    )
}

pub fn id(raw: &str) -> DocumentId {
    DocumentId::parse(raw).unwrap()
}

pub fn file(name: &str) -> PendingFile {
    PendingFile::new(name, format!("contents of {name}").into_bytes()).unwrap()
}

pub fn ids(documents: &[Document]) -> Vec<String> {
    documents.iter().map(|d| d.id.to_string()).collect()
}

#[derive(Default)]
struct Script {
    /// What the store currently holds.
    documents: Vec<Document>,
    list_gates: VecDeque<oneshot::Receiver<()>>,
    delete_gates: VecDeque<oneshot::Receiver<()>>,
    ingest_gates: VecDeque<oneshot::Receiver<()>>,
    list_failures: VecDeque<StoreError>,
    delete_failures: VecDeque<StoreError>,
    ingest_failures: VecDeque<StoreError>,
    list_calls: usize,
    delete_calls: Vec<String>,
    ingest_batches: Vec<Vec<String>>,
}

/// In-memory [`DocumentStore`].
///
/// `list_overview` captures the remote state when called, then waits on
/// the next list gate if one is queued, so tests can control the order in
/// which overlapping calls resolve.
#[derive(Clone, Default)]
pub struct ScriptedStore {
    script: Arc<Mutex<Script>>,
}

impl ScriptedStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let store = Self::default();
        store.set_documents(documents);
        store
    }

    pub fn as_dyn(&self) -> Arc<dyn DocumentStore> {
        Arc::new(self.clone())
    }

    pub fn set_documents(&self, documents: Vec<Document>) {
        self.script.lock().unwrap().documents = documents;
    }

    pub fn documents(&self) -> Vec<Document> {
        self.script.lock().unwrap().documents.clone()
    }

    /// Hold the next list call until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().list_gates.push_back(rx);
        tx
    }

    pub fn hold_next_delete(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().delete_gates.push_back(rx);
        tx
    }

    pub fn hold_next_ingest(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().ingest_gates.push_back(rx);
        tx
    }

    pub fn fail_next_list(&self, err: StoreError) {
        self.script.lock().unwrap().list_failures.push_back(err);
    }

    pub fn fail_next_delete(&self, err: StoreError) {
        self.script.lock().unwrap().delete_failures.push_back(err);
    }

    pub fn fail_next_ingest(&self, err: StoreError) {
        self.script.lock().unwrap().ingest_failures.push_back(err);
    }

    pub fn list_calls(&self) -> usize {
        self.script.lock().unwrap().list_calls
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().delete_calls.clone()
    }

    pub fn ingest_batches(&self) -> Vec<Vec<String>> {
        self.script.lock().unwrap().ingest_batches.clone()
    }
}

async fn wait(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn list_overview(&self) -> Result<Vec<Document>, StoreError> {
        let (gate, outcome) = {
            let mut script = self.script.lock().unwrap();
            script.list_calls += 1;
            let outcome = match script.list_failures.pop_front() {
                Some(err) => Err(err),
                None => Ok(script.documents.clone()),
            };
            (script.list_gates.pop_front(), outcome)
        };
        wait(gate).await;
        outcome
    }

    async fn ingest(&self, files: &[PendingFile]) -> Result<IngestReceipt, StoreError> {
        let gate = {
            let mut script = self.script.lock().unwrap();
            script
                .ingest_batches
                .push(files.iter().map(|f| f.name().to_string()).collect());
            script.ingest_gates.pop_front()
        };
        wait(gate).await;

        let mut script = self.script.lock().unwrap();
        if let Some(err) = script.ingest_failures.pop_front() {
            return Err(err);
        }
        let start = script.documents.len();
        for (n, f) in files.iter().enumerate() {
            let new_id = format!("ingested-{}", start + n);
            script.documents.push(doc(&new_id, f.name()));
        }
        Ok(IngestReceipt {
            payload: json!({"results": {"processed": files.len()}}),
        })
    }

    async fn delete_by_document_id(&self, id: &DocumentId) -> Result<(), StoreError> {
        let gate = {
            let mut script = self.script.lock().unwrap();
            script.delete_calls.push(id.to_string());
            script.delete_gates.pop_front()
        };
        wait(gate).await;

        let mut script = self.script.lock().unwrap();
        if let Some(err) = script.delete_failures.pop_front() {
            return Err(err);
        }
        let before = script.documents.len();
        script.documents.retain(|d| &d.id != id);
        if script.documents.len() == before {
            return Err(StoreError::remote(404, "document not found"));
        }
        Ok(())
    }
}
