//! Error types for the bondlens library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`ProcessError`] — **Terminal**: a pipeline run cannot continue
//!   (invalid upload, both extraction strategies failed, the AI returned
//!   garbage). Returned as `Err(ProcessError)` from
//!   [`crate::process::DocumentProcessor::process_document`]. Nothing at
//!   this layer is retried automatically; the caller owns any user-facing
//!   retry action.
//!
//! * [`ServiceError`] — a failure reported by an external collaborator
//!   (extraction service, text/structured generation, record store). The
//!   pipeline classifies these into the matching `ProcessError` variant,
//!   embedding the collaborator's detail in the human-readable message.
//!
//! Every `ProcessError` message doubles as the UI-facing text attached to
//! the failing step and to the aggregate, so the wording stays concrete
//! and actionable.

use thiserror::Error;

/// All terminal errors returned by a pipeline run.
#[derive(Debug, Error)]
pub enum ProcessError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The uploaded file failed validation: wrong content type, empty,
    /// or over the size ceiling.
    #[error("Invalid PDF file format")]
    InvalidFormat,

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Both the primary and the chunked fallback extraction failed.
    /// `detail` carries the fallback's failure reason.
    #[error(
        "Failed to extract text from PDF: {detail}. \
         The document may be scanned, corrupted, or in an unsupported format."
    )]
    ExtractionFailed { detail: String },

    /// Extraction succeeded but produced too little text to analyse.
    #[error(
        "Insufficient text extracted from document. \
         Please ensure the PDF contains readable text."
    )]
    InsufficientText { chars: usize },

    // ── Generation errors ─────────────────────────────────────────────────
    /// The analysis text-generation call failed or returned an empty result.
    #[error("AI analysis failed: {detail}. Please try again.")]
    AnalysisFailed { detail: String },

    /// The structured-summary generation call failed.
    #[error("Summary generation failed: {detail}. Please try again.")]
    SummaryGenerationFailed { detail: String },

    /// The structured response was not an object at all — no per-field
    /// defaulting is possible, so the run aborts.
    #[error("Invalid summary data structure")]
    InvalidSummaryData,

    // ── Storage errors ────────────────────────────────────────────────────
    /// The record store rejected a create/list operation.
    #[error("Failed to persist processing record: {detail}")]
    Storage { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// An opaque failure reported by an external collaborator.
///
/// Collaborators (extraction, generation, identity, storage) are traits
/// implemented by the host; their concrete error types are unknowable
/// here, so the boundary carries a message only. The pipeline wraps it
/// into the matching [`ProcessError`] variant.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ServiceError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
