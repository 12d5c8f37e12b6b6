use std::fmt;
use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::document::validate::{validate_file_name, ValidationError};

/// A file picked for upload but not yet sent.
///
/// The payload is shared, so cloning a pending file (e.g. to hand a batch to
/// the store while keeping it for a retry) does not copy the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    id: Uuid,
    name: String,
    payload: Arc<[u8]>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_file_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            payload: Arc::from(payload.into()),
        })
    }

    /// Read a file from disk, named after its final path component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let payload = tokio::fs::read(path).await?;
        Self::new(name, payload)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    }

    /// Identity of this selection. Two picks of the same file are distinct.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

impl fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.payload.len())
            .finish()
    }
}
