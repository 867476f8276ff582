//! # bondlens
//!
//! Analyse bond indenture documents into structured summaries using LLMs.
//!
//! ## Why this crate?
//!
//! A bond indenture is a long, dense legal contract; the facts an analyst
//! needs first — seniority ranking, security, principal, rate, maturity,
//! covenants — are scattered across hundreds of pages. This crate drives
//! an uploaded indenture through a fixed pipeline and produces a
//! fully-populated [`BondIndentureSummary`], pushing a progress snapshot
//! to an observer after every state change so a host UI can show the run
//! as it happens.
//!
//! The backend is external by design: text extraction, text generation,
//! structured generation, identity, and storage are all traits the host
//! implements (see [`services`] and [`store`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (bytes already in memory)
//!  │
//!  ├─ 1. Validation     type / non-empty / ≤ 10 MiB
//!  ├─ 2. Extraction     primary call, one chunked fallback
//!  ├─ 3. Preprocessing  deterministic, idempotent text cleanup
//!  ├─ 4. AI analysis    free-text analysis over a bounded excerpt
//!  ├─ 5. Summary        schema-constrained structured generation
//!  └─ 6. Normalisation  untrusted response → BondIndentureSummary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bondlens::{DocumentFile, DocumentProcessor, ProcessingConfig};
//! use bondlens::services::{StructuredGenerator, TextExtractor, TextGenerator};
//! use std::sync::Arc;
//!
//! # async fn run(
//! #     extractor: Arc<dyn TextExtractor>,
//! #     generator: Arc<dyn TextGenerator>,
//! #     structured: Arc<dyn StructuredGenerator>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let processor = DocumentProcessor::new(
//!     extractor,
//!     generator,
//!     structured,
//!     ProcessingConfig::default(),
//! );
//! let file = DocumentFile::new(
//!     "indenture.pdf",
//!     "application/pdf",
//!     std::fs::read("indenture.pdf")?,
//! );
//! let output = processor.process_document(&file).await?;
//! println!("{} ranks: {}", output.summary.issuer, output.summary.seniority.bond_ranking);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error model
//!
//! Every failure is terminal for the run: the failing step and the
//! aggregate carry a human-readable message, a final snapshot is emitted,
//! and the [`ProcessError`] is returned. The only built-in recovery is
//! the extraction adapter's single chunked fallback and the summary
//! normaliser's per-field sentinel defaulting.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod prompts;
pub mod services;
pub mod store;
pub mod summary;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use document::{
    DocumentFile, DocumentProcessing, DocumentStatus, ProcessingStep, StepId, StepStatus,
};
pub use error::{ProcessError, ServiceError};
pub use process::{DocumentProcessor, ProcessingOutput};
pub use progress::{NoopObserver, Observer, ProcessingObserver};
pub use store::{DocumentRecord, RecordStore, SummaryRecord};
pub use summary::{BondIndentureSummary, SeniorityProfile, NOT_SPECIFIED};
