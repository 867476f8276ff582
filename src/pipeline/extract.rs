//! Extraction adapter: one primary attempt, one chunked fallback.
//!
//! ## Fallback strategy
//!
//! The primary whole-document call handles most text-bearing PDFs in one
//! pass. When it throws, or returns something whose runtime type is not
//! text, we make exactly one more attempt: a chunked extraction
//! requesting fixed-size chunks, joined with a blank line. Large or
//! oddly-structured documents that overflow the single-pass path usually
//! succeed chunked. There is no third tier — if chunked extraction also
//! fails, the document is effectively unreadable (scanned, corrupted, or
//! unsupported) and retrying would not change that, so the adapter raises
//! a terminal error that embeds the fallback's own failure detail.

use crate::document::DocumentFile;
use crate::error::ProcessError;
use crate::services::{ExtractedContent, TextExtractor};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Separator between joined fallback chunks.
const CHUNK_SEPARATOR: &str = "\n\n";

/// Extract raw text from the uploaded document.
///
/// `on_progress` is invoked with a message and a coarse percentage as the
/// adapter moves between strategies, so the host sees which attempt is in
/// flight rather than a 0→100 jump.
///
/// # Errors
/// [`ProcessError::ExtractionFailed`] when both strategies fail; the
/// message carries the fallback's failure detail.
pub async fn extract_text<F>(
    extractor: &Arc<dyn TextExtractor>,
    file: &DocumentFile,
    chunk_size: usize,
    mut on_progress: F,
) -> Result<String, ProcessError>
where
    F: FnMut(&str, u8),
{
    on_progress("Attempting direct text extraction...", 20);
    match extractor.extract(file).await {
        Ok(ExtractedContent::Text(text)) => {
            debug!(chars = text.len(), "primary extraction succeeded");
            on_progress("Text extracted successfully", 80);
            return Ok(text);
        }
        Ok(other) => {
            warn!(
                "primary extraction returned a non-text result ({}), trying chunked fallback",
                content_kind(&other)
            );
        }
        Err(e) => {
            warn!(error = %e, "primary extraction failed, trying chunked fallback");
        }
    }

    on_progress("Trying chunked extraction method...", 40);
    match extractor.extract_chunked(file, chunk_size).await {
        Ok(content) => {
            let text = coerce_to_text(content);
            debug!(chars = text.len(), "chunked fallback extraction succeeded");
            on_progress("Text extracted successfully", 80);
            Ok(text)
        }
        Err(e) => {
            warn!(error = %e, "chunked fallback extraction failed");
            Err(ProcessError::ExtractionFailed {
                detail: e.to_string(),
            })
        }
    }
}

/// Join a chunk sequence with blank lines; coerce anything else to text.
fn coerce_to_text(content: ExtractedContent) -> String {
    match content {
        ExtractedContent::Text(text) => text,
        ExtractedContent::Chunks(chunks) => chunks.join(CHUNK_SEPARATOR),
        ExtractedContent::Other(Value::String(s)) => s,
        ExtractedContent::Other(value) => value.to_string(),
    }
}

fn content_kind(content: &ExtractedContent) -> &'static str {
    match content {
        ExtractedContent::Text(_) => "text",
        ExtractedContent::Chunks(_) => "chunks",
        ExtractedContent::Other(_) => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted extractor: fixed responses plus call counters.
    struct Scripted {
        primary: Result<ExtractedContent, ServiceError>,
        fallback: Result<ExtractedContent, ServiceError>,
        primary_calls: AtomicUsize,
        fallback_calls: AtomicUsize,
    }

    impl Scripted {
        fn new(
            primary: Result<ExtractedContent, ServiceError>,
            fallback: Result<ExtractedContent, ServiceError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                primary,
                fallback,
                primary_calls: AtomicUsize::new(0),
                fallback_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextExtractor for Scripted {
        async fn extract(&self, _file: &DocumentFile) -> Result<ExtractedContent, ServiceError> {
            self.primary_calls.fetch_add(1, Ordering::SeqCst);
            self.primary.clone()
        }

        async fn extract_chunked(
            &self,
            _file: &DocumentFile,
            _chunk_size: usize,
        ) -> Result<ExtractedContent, ServiceError> {
            self.fallback_calls.fetch_add(1, Ordering::SeqCst);
            self.fallback.clone()
        }
    }

    fn file() -> DocumentFile {
        DocumentFile::new("a.pdf", "application/pdf", vec![1])
    }

    #[tokio::test]
    async fn primary_text_skips_fallback() {
        let ext = Scripted::new(
            Ok(ExtractedContent::Text("whole document".into())),
            Err(ServiceError::from("must not be called")),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let text = extract_text(&dyn_ext, &file(), 2000, |_, _| {}).await.unwrap();
        assert_eq!(text, "whole document");
        assert_eq!(ext.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ext.fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_error_triggers_fallback_exactly_once() {
        let ext = Scripted::new(
            Err(ServiceError::from("primary exploded")),
            Ok(ExtractedContent::Chunks(vec!["one".into(), "two".into()])),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let text = extract_text(&dyn_ext, &file(), 2000, |_, _| {}).await.unwrap();
        assert_eq!(text, "one\n\ntwo");
        assert_eq!(ext.fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn primary_non_text_result_triggers_fallback() {
        let ext = Scripted::new(
            Ok(ExtractedContent::Other(json!({"pages": 3}))),
            Ok(ExtractedContent::Text("from fallback".into())),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let text = extract_text(&dyn_ext, &file(), 2000, |_, _| {}).await.unwrap();
        assert_eq!(text, "from fallback");
    }

    #[tokio::test]
    async fn fallback_non_sequence_is_coerced_to_text() {
        let ext = Scripted::new(
            Err(ServiceError::from("boom")),
            Ok(ExtractedContent::Other(json!("already a string"))),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let text = extract_text(&dyn_ext, &file(), 2000, |_, _| {}).await.unwrap();
        assert_eq!(text, "already a string");
    }

    #[tokio::test]
    async fn fallback_path_reports_both_strategies() {
        let ext = Scripted::new(
            Err(ServiceError::from("primary exploded")),
            Ok(ExtractedContent::Text("from fallback".into())),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let mut reports = Vec::new();
        extract_text(&dyn_ext, &file(), 2000, |message, progress| {
            reports.push((message.to_string(), progress));
        })
        .await
        .unwrap();
        assert_eq!(
            reports,
            vec![
                ("Attempting direct text extraction...".to_string(), 20),
                ("Trying chunked extraction method...".to_string(), 40),
                ("Text extracted successfully".to_string(), 80),
            ]
        );
    }

    #[tokio::test]
    async fn double_failure_embeds_fallback_detail() {
        let ext = Scripted::new(
            Err(ServiceError::from("primary exploded")),
            Err(ServiceError::from("chunked endpoint returned 503")),
        );
        let dyn_ext: Arc<dyn TextExtractor> = ext.clone();
        let err = extract_text(&dyn_ext, &file(), 2000, |_, _| {}).await.unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("chunked endpoint returned 503"),
            "message should carry the fallback detail, got: {msg}"
        );
        assert!(msg.contains("scanned, corrupted, or in an unsupported format"));
        assert_eq!(ext.primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ext.fallback_calls.load(Ordering::SeqCst), 1);
    }
}
