//! Document identifiers.
//!
//! The remote store hands out opaque ids (UUID-shaped in practice, but
//! nothing here relies on that). The only local rule is that an id is never
//! empty, since an empty id would build a delete filter matching nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validate::ValidationError;

/// Decoding goes through [`DocumentId::parse`], so ids read off the wire are
/// trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Parse a raw id, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDocumentId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id = DocumentId::parse("  9fbe403b-c11c-5aae-8ade-ef22980c3ad1 \n").unwrap();
        assert_eq!(id.as_str(), "9fbe403b-c11c-5aae-8ade-ef22980c3ad1");
        assert_eq!(id.to_string(), "9fbe403b-c11c-5aae-8ade-ef22980c3ad1");
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            DocumentId::parse(""),
            Err(ValidationError::EmptyDocumentId)
        ));
        assert!(matches!(
            DocumentId::parse("   "),
            Err(ValidationError::EmptyDocumentId)
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::parse("doc-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"doc-1\"");
        let back: DocumentId = serde_json::from_str("\"doc-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_applies_parse_rules() {
        let padded: DocumentId = serde_json::from_str("\" doc-1 \"").unwrap();
        assert_eq!(padded.as_str(), "doc-1");
        assert!(serde_json::from_str::<DocumentId>("\"\"").is_err());
        assert!(serde_json::from_str::<DocumentId>("\"  \"").is_err());
    }
}
