use thiserror::Error;

use crate::document::ValidationError;

/// Normalized failure of a remote store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No response: DNS, connection, or timeout failure.
    #[error("transport error: {cause}")]
    Transport { cause: String },

    /// A response arrived with a non-success status. `body` is verbatim.
    #[error("remote store returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// A success response whose payload could not be read.
    #[error("could not decode remote response: {cause}")]
    Decode { cause: String },

    /// Rejected locally before any request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub fn transport(cause: impl ToString) -> Self {
        StoreError::Transport {
            cause: cause.to_string(),
        }
    }

    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        StoreError::Remote {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable text for a notification. Remote rejections surface the
    /// store's own body when it has one.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Remote { status, body } if body.trim().is_empty() => {
                format!("Request failed with status {status}")
            }
            StoreError::Remote { body, .. } => body.clone(),
            StoreError::Transport { cause } => format!("Could not reach the document store: {cause}"),
            StoreError::Decode { cause } => format!("Unexpected response from the document store: {cause}"),
            StoreError::Invalid(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode {
                cause: err.to_string(),
            }
        } else {
            StoreError::transport(err)
        }
    }
}
