use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use uuid::Uuid;

use super::config::{DeleteFilterPlacement, StoreConfig};
use super::error::StoreError;
use super::{DocumentStore, IngestReceipt};
use crate::document::{Document, DocumentId, DocumentsOverview, ValidationError};
use crate::filter::types::DeleteRequest;
use crate::filter::Filter;
use crate::upload::PendingFile;

const REQUEST_ID_HEADER: &str = "x-request-id";
const FILES_FIELD: &str = "files";

/// [`DocumentStore`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    config: StoreConfig,
}

impl HttpDocumentStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(StoreError::transport)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Tag the request with a fresh id and send it. Transport failures are
    /// logged here; status handling is left to the caller.
    async fn send(&self, verb: &'static str, request: RequestBuilder) -> Result<Response, StoreError> {
        let request_id = Uuid::new_v4();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%request_id, verb, error = %e, "document store unreachable");
                StoreError::transport(e)
            })?;
        tracing::debug!(%request_id, verb, status = response.status().as_u16(), "document store responded");
        Ok(response)
    }
}

/// Read the body of a response, turning non-2xx statuses into
/// [`StoreError::Remote`] with the body verbatim.
async fn success_body(verb: &'static str, response: Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        tracing::warn!(verb, status = status.as_u16(), body = %body, "document store rejected request");
        Err(StoreError::remote(status.as_u16(), body))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_overview(&self) -> Result<Vec<Document>, StoreError> {
        let url = self.config.endpoint("documents_overview");
        let response = self.send("list", self.client.get(&url)).await?;
        let body = success_body("list", response).await?;
        let overview: DocumentsOverview =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode {
                cause: e.to_string(),
            })?;
        tracing::info!(count = overview.results.len(), "fetched documents overview");
        Ok(overview.results)
    }

    async fn ingest(&self, files: &[PendingFile]) -> Result<IngestReceipt, StoreError> {
        let url = self.config.endpoint("ingest_files");
        let form = files.iter().fold(Form::new(), |form, file| {
            form.part(
                FILES_FIELD,
                Part::bytes(file.payload().to_vec()).file_name(file.name().to_string()),
            )
        });
        let response = self
            .send("ingest", self.client.post(&url).multipart(form))
            .await?;
        let body = success_body("ingest", response).await?;
        tracing::info!(files = files.len(), "ingest batch accepted");
        Ok(IngestReceipt::from_body(&body))
    }

    async fn delete_by_document_id(&self, id: &DocumentId) -> Result<(), StoreError> {
        if id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyDocumentId.into());
        }
        let url = self.config.endpoint("delete");
        let filters = Filter::document_id(id);
        let request = match self.config.delete_placement {
            DeleteFilterPlacement::Query => self
                .client
                .delete(&url)
                .query(&[("filters", filters.to_json())]),
            DeleteFilterPlacement::Body => self.client.delete(&url).json(&DeleteRequest { filters }),
        };
        let response = self.send("delete", request).await?;
        success_body("delete", response).await?;
        tracing::info!(document_id = %id, "document deleted");
        Ok(())
    }
}
