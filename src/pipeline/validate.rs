//! Upload validation: the cheapest stage runs first.
//!
//! Rejecting a wrong-typed or oversized file here costs nothing; letting
//! it through costs an extraction call and an opaque downstream failure.

use crate::config::ProcessingConfig;
use crate::document::DocumentFile;
use crate::error::ProcessError;
use tracing::debug;

/// Check the upload is of the accepted document type, non-empty, and at
/// or under the configured size ceiling.
///
/// # Errors
/// [`ProcessError::InvalidFormat`] on any violation. The three checks
/// share one classification because the caller's remedy is the same:
/// upload a different file.
pub fn validate_file(file: &DocumentFile, config: &ProcessingConfig) -> Result<(), ProcessError> {
    if file.content_type != config.accepted_content_type {
        debug!(
            content_type = %file.content_type,
            expected = %config.accepted_content_type,
            "rejecting upload: wrong content type"
        );
        return Err(ProcessError::InvalidFormat);
    }
    if file.size() == 0 {
        debug!(file_name = %file.name, "rejecting upload: empty file");
        return Err(ProcessError::InvalidFormat);
    }
    if file.size() > config.max_file_size_bytes {
        debug!(
            size = file.size(),
            ceiling = config.max_file_size_bytes,
            "rejecting upload: over size ceiling"
        );
        return Err(ProcessError::InvalidFormat);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProcessingConfig {
        ProcessingConfig::default()
    }

    fn file(content_type: &str, bytes: usize) -> DocumentFile {
        DocumentFile::new("indenture.pdf", content_type, vec![0u8; bytes])
    }

    #[test]
    fn accepts_small_pdf() {
        assert!(validate_file(&file("application/pdf", 1024), &config()).is_ok());
    }

    #[test]
    fn rejects_wrong_content_type() {
        let err = validate_file(&file("text/plain", 1024), &config());
        assert!(matches!(err, Err(ProcessError::InvalidFormat)));
    }

    #[test]
    fn rejects_zero_byte_file_of_correct_type() {
        let err = validate_file(&file("application/pdf", 0), &config());
        assert!(matches!(err, Err(ProcessError::InvalidFormat)));
    }

    #[test]
    fn accepts_file_exactly_at_ceiling() {
        let cfg = ProcessingConfig::builder()
            .max_file_size_bytes(2048)
            .build()
            .unwrap();
        assert!(validate_file(&file("application/pdf", 2048), &cfg).is_ok());
    }

    #[test]
    fn rejects_file_over_ceiling() {
        let cfg = ProcessingConfig::builder()
            .max_file_size_bytes(2048)
            .build()
            .unwrap();
        let err = validate_file(&file("application/pdf", 2049), &cfg);
        assert!(matches!(err, Err(ProcessError::InvalidFormat)));
    }
}
