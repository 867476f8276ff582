//! Configuration for a document processing run.
//!
//! Every knob lives in [`ProcessingConfig`], built via its
//! [`ProcessingConfigBuilder`]. Keeping everything in one struct makes it
//! trivial to share a config across runs, log it, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest.

use crate::error::ProcessError;
use crate::progress::ProcessingObserver;
use std::fmt;
use std::sync::Arc;

/// Configuration for [`crate::process::DocumentProcessor`].
///
/// Built via [`ProcessingConfig::builder()`] or
/// [`ProcessingConfig::default()`].
///
/// # Example
/// ```rust
/// use bondlens::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .model("gpt-4o-mini")
///     .step_delay_ms(0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Content type accepted at validation. Default: `application/pdf`.
    pub accepted_content_type: String,

    /// Upload size ceiling in bytes. Default: 10 MiB.
    ///
    /// Indentures run long but rarely past a few megabytes of text-bearing
    /// PDF; anything larger is almost always a scan, which the extraction
    /// service cannot read anyway.
    pub max_file_size_bytes: u64,

    /// Minimum plausible extraction length in characters (after trimming).
    /// Default: 100.
    ///
    /// A real indenture produces tens of thousands of characters. Output
    /// below this floor means the document is effectively unreadable
    /// (scanned images, encrypted streams) and analysing it would only
    /// produce hallucinated summaries.
    pub min_extracted_chars: usize,

    /// Target chunk size for the fallback chunked extraction call.
    /// Default: 2000 characters.
    pub chunk_size: usize,

    /// How much normalised document text the analysis prompt may carry.
    /// Default: 8000 characters, with a truncation marker when exceeded.
    pub analysis_excerpt_chars: usize,

    /// How much document text the structured-summary prompt may carry
    /// (the full analysis text is always included). Default: 4000.
    pub summary_excerpt_chars: usize,

    /// Model identifier passed to the text-generation service.
    /// Default: `gpt-4o-mini`.
    pub model: String,

    /// Maximum tokens the analysis call may generate. Default: 2000.
    pub max_output_tokens: usize,

    /// Pause between step transitions, purely to pace UI feedback.
    /// Default: 0 (disabled). Carries no correctness meaning; interactive
    /// hosts set ~300 ms so progress updates are visible.
    pub step_delay_ms: u64,

    /// Observer receiving a full aggregate snapshot after every state
    /// change. Default: none.
    pub observer: Option<Arc<dyn ProcessingObserver>>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            accepted_content_type: "application/pdf".to_string(),
            max_file_size_bytes: 10 * 1024 * 1024,
            min_extracted_chars: 100,
            chunk_size: 2000,
            analysis_excerpt_chars: 8000,
            summary_excerpt_chars: 4000,
            model: "gpt-4o-mini".to_string(),
            max_output_tokens: 2000,
            step_delay_ms: 0,
            observer: None,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("accepted_content_type", &self.accepted_content_type)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("min_extracted_chars", &self.min_extracted_chars)
            .field("chunk_size", &self.chunk_size)
            .field("analysis_excerpt_chars", &self.analysis_excerpt_chars)
            .field("summary_excerpt_chars", &self.summary_excerpt_chars)
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("step_delay_ms", &self.step_delay_ms)
            .field(
                "observer",
                &self.observer.as_ref().map(|_| "<dyn ProcessingObserver>"),
            )
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn accepted_content_type(mut self, mime: impl Into<String>) -> Self {
        self.config.accepted_content_type = mime.into();
        self
    }

    pub fn max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    pub fn min_extracted_chars(mut self, chars: usize) -> Self {
        self.config.min_extracted_chars = chars;
        self
    }

    pub fn chunk_size(mut self, chars: usize) -> Self {
        self.config.chunk_size = chars.max(1);
        self
    }

    pub fn analysis_excerpt_chars(mut self, chars: usize) -> Self {
        self.config.analysis_excerpt_chars = chars;
        self
    }

    pub fn summary_excerpt_chars(mut self, chars: usize) -> Self {
        self.config.summary_excerpt_chars = chars;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn step_delay_ms(mut self, ms: u64) -> Self {
        self.config.step_delay_ms = ms;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ProcessingObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, ProcessError> {
        let c = &self.config;
        if c.max_file_size_bytes == 0 {
            return Err(ProcessError::InvalidConfig(
                "max_file_size_bytes must be ≥ 1".into(),
            ));
        }
        if c.analysis_excerpt_chars == 0 || c.summary_excerpt_chars == 0 {
            return Err(ProcessError::InvalidConfig(
                "prompt excerpt limits must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(ProcessError::InvalidConfig("model must be non-empty".into()));
        }
        Ok(self.config)
    }
}
