/// Local validation failures.
///
/// None of these ever reach the remote store: they are caught before a
/// request is built. `IndexOutOfRange` is only logged, since removing a
/// pending file that is already gone is a silent no-op.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document id cannot be empty")]
    EmptyDocumentId,
    #[error("file name cannot be empty")]
    EmptyFileName,
    #[error("index {index} is out of range for {len} pending files")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Validate a display name for a pending upload.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFileName);
    }
    Ok(())
}

/// Check that `index` addresses an element of a sequence of length `len`.
pub fn validate_index(index: usize, len: usize) -> Result<(), ValidationError> {
    if index >= len {
        return Err(ValidationError::IndexOutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_rules() {
        assert!(validate_file_name("report.pdf").is_ok());
        assert_eq!(validate_file_name(""), Err(ValidationError::EmptyFileName));
        assert_eq!(validate_file_name("  "), Err(ValidationError::EmptyFileName));
    }

    #[test]
    fn index_rules() {
        assert!(validate_index(0, 1).is_ok());
        assert_eq!(
            validate_index(3, 3),
            Err(ValidationError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(validate_index(0, 0).is_err());
    }
}
