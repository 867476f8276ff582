//! The pipeline orchestrator.
//!
//! [`DocumentProcessor`] drives the six stages in a fixed order as one
//! linear sequence of suspending calls — no parallel stage execution, no
//! worker pool, no cancellation. Each run owns its
//! [`DocumentProcessing`] aggregate exclusively, so several processors
//! (or several calls on one processor) can run concurrently without any
//! locking.
//!
//! After every state change a snapshot of the aggregate is pushed to the
//! configured observer, synchronously and fire-and-forget. On the first
//! failing stage the currently-processing step is marked `Error` with the
//! failure's message, the aggregate goes terminal, a final snapshot is
//! emitted, and the error is returned to the caller — nothing is retried
//! at this layer beyond the extraction adapter's single built-in
//! fallback.

use crate::config::ProcessingConfig;
use crate::document::{DocumentFile, DocumentProcessing, DocumentStatus, StepId, StepStatus};
use crate::error::ProcessError;
use crate::pipeline::{extract, generate, preprocess, validate};
use crate::prompts;
use crate::services::{StructuredGenerator, TextExtractor, TextGenerator};
use crate::summary::{normalize_summary, BondIndentureSummary};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use uuid::Uuid;

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct ProcessingOutput {
    /// Opaque unique token identifying this run, `doc_<uuid>`.
    pub document_id: String,
    /// Final aggregate state: `Completed`, all six steps completed,
    /// `summary` holding the serialized summary JSON.
    pub processing: DocumentProcessing,
    pub summary: BondIndentureSummary,
}

/// Drives one uploaded document through the analysis pipeline.
///
/// # Example
/// ```rust,no_run
/// use bondlens::{DocumentFile, DocumentProcessor, ProcessingConfig};
/// use bondlens::services::{StructuredGenerator, TextExtractor, TextGenerator};
/// use std::sync::Arc;
///
/// # async fn run(
/// #     extractor: Arc<dyn TextExtractor>,
/// #     generator: Arc<dyn TextGenerator>,
/// #     structured: Arc<dyn StructuredGenerator>,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let processor = DocumentProcessor::new(
///     extractor,
///     generator,
///     structured,
///     ProcessingConfig::default(),
/// );
/// let file = DocumentFile::new("indenture.pdf", "application/pdf", std::fs::read("indenture.pdf")?);
/// let output = processor.process_document(&file).await?;
/// println!("{}: {}", output.document_id, output.summary.issuer);
/// # Ok(())
/// # }
/// ```
pub struct DocumentProcessor {
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn TextGenerator>,
    structured: Arc<dyn StructuredGenerator>,
    config: ProcessingConfig,
}

impl DocumentProcessor {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn TextGenerator>,
        structured: Arc<dyn StructuredGenerator>,
        config: ProcessingConfig,
    ) -> Self {
        Self {
            extractor,
            generator,
            structured,
            config,
        }
    }

    /// Run the full pipeline over one uploaded file.
    ///
    /// # Errors
    /// Any [`ProcessError`] is terminal for this run. The final snapshot
    /// (aggregate `Error`, failing step marked with the message) is
    /// emitted to the observer before the error is returned.
    pub async fn process_document(
        &self,
        file: &DocumentFile,
    ) -> Result<ProcessingOutput, ProcessError> {
        let document_id = new_document_id();
        info!(document_id = %document_id, file_name = %file.name, "starting document processing");

        // Upload is completed immediately; validation starts in flight.
        let mut processing = DocumentProcessing::new(&document_id, file);
        self.emit(&processing);

        match self.run_stages(file, &mut processing, &document_id).await {
            Ok(summary) => {
                processing.summary = Some(
                    serde_json::to_string(&summary)
                        .map_err(|e| ProcessError::Internal(format!("summary serialise: {e}")))?,
                );
                processing.status = DocumentStatus::Completed;
                self.emit(&processing);
                info!(document_id = %document_id, "document processing completed");
                Ok(ProcessingOutput {
                    document_id,
                    processing,
                    summary,
                })
            }
            Err(e) => {
                let message = e.to_string();
                warn!(document_id = %document_id, error = %message, "document processing failed");
                if let Some(step) = processing
                    .steps
                    .iter_mut()
                    .find(|s| s.status == StepStatus::Processing)
                {
                    step.status = StepStatus::Error;
                    step.message = Some(message.clone());
                }
                processing.status = DocumentStatus::Error;
                processing.error_message = Some(message);
                self.emit(&processing);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        file: &DocumentFile,
        processing: &mut DocumentProcessing,
        document_id: &str,
    ) -> Result<BondIndentureSummary, ProcessError> {
        // ── Stage 1: Validation ──────────────────────────────────────────
        self.update_step(
            processing,
            StepId::Validation,
            StepStatus::Processing,
            "Validating PDF structure...",
            Some(25),
        )
        .await;

        validate::validate_file(file, &self.config)?;

        self.update_step(
            processing,
            StepId::Validation,
            StepStatus::Completed,
            "Document validated successfully",
            Some(100),
        )
        .await;

        // ── Stage 2: Text extraction ─────────────────────────────────────
        self.update_step(
            processing,
            StepId::Extraction,
            StepStatus::Processing,
            "Extracting text from PDF...",
            Some(0),
        )
        .await;

        let extracted = extract::extract_text(
            &self.extractor,
            file,
            self.config.chunk_size,
            |message, progress| {
                if let Some(step) = processing.step_mut(StepId::Extraction) {
                    step.message = Some(message.to_string());
                    step.progress = Some(progress);
                }
                self.emit(processing);
            },
        )
        .await?;

        let trimmed_len = extracted.trim().chars().count();
        if trimmed_len < self.config.min_extracted_chars {
            return Err(ProcessError::InsufficientText { chars: trimmed_len });
        }

        processing.extracted_text = Some(extracted.clone());
        self.update_step(
            processing,
            StepId::Extraction,
            StepStatus::Completed,
            &format!("Extracted {} characters", extracted.chars().count()),
            Some(100),
        )
        .await;

        // ── Stage 3: Preprocessing ───────────────────────────────────────
        self.update_step(
            processing,
            StepId::Preprocessing,
            StepStatus::Processing,
            "Cleaning and structuring text...",
            Some(0),
        )
        .await;

        // Deterministic, no failure path.
        let cleaned = preprocess::normalize_text(&extracted);

        self.update_step(
            processing,
            StepId::Preprocessing,
            StepStatus::Completed,
            "Text preprocessed and structured",
            Some(100),
        )
        .await;

        // ── Stage 4: AI analysis ─────────────────────────────────────────
        self.update_step(
            processing,
            StepId::AiAnalysis,
            StepStatus::Processing,
            "Analyzing document with AI...",
            Some(0),
        )
        .await;

        let analysis_prompt =
            prompts::build_analysis_prompt(&cleaned, self.config.analysis_excerpt_chars);
        let analysis = generate::run_analysis(&self.generator, &analysis_prompt, &self.config).await?;

        self.update_step(
            processing,
            StepId::AiAnalysis,
            StepStatus::Completed,
            "Document analysis completed",
            Some(100),
        )
        .await;

        // ── Stage 5: Summary generation ──────────────────────────────────
        self.update_step(
            processing,
            StepId::SummaryGeneration,
            StepStatus::Processing,
            "Generating structured summary...",
            Some(0),
        )
        .await;

        let summary_prompt =
            prompts::build_summary_prompt(&cleaned, &analysis, self.config.summary_excerpt_chars);
        let raw = generate::run_summary_generation(&self.structured, &summary_prompt).await?;
        let summary = normalize_summary(raw, document_id, Utc::now())?;

        self.update_step(
            processing,
            StepId::SummaryGeneration,
            StepStatus::Completed,
            "Summary generated successfully",
            Some(100),
        )
        .await;

        Ok(summary)
    }

    /// Apply a step transition, emit a snapshot, and pace if configured.
    async fn update_step(
        &self,
        processing: &mut DocumentProcessing,
        id: StepId,
        status: StepStatus,
        message: &str,
        progress: Option<u8>,
    ) {
        if let Some(step) = processing.step_mut(id) {
            step.status = status;
            step.message = Some(message.to_string());
            if progress.is_some() {
                step.progress = progress;
            }
        }
        self.emit(processing);
        self.pace().await;
    }

    /// Push a snapshot to the observer. Fire-and-forget: the observer is
    /// invoked synchronously and nothing it does can abort the pipeline.
    fn emit(&self, processing: &DocumentProcessing) {
        if let Some(ref observer) = self.config.observer {
            observer.on_update(processing);
        }
    }

    /// Optional fixed pause between transitions, purely to pace UI
    /// feedback. Off by default.
    async fn pace(&self) {
        if self.config.step_delay_ms > 0 {
            sleep(Duration::from_millis(self.config.step_delay_ms)).await;
        }
    }
}

/// Generate an opaque document id for one upload attempt.
fn new_document_id() -> String {
    format!("doc_{}", Uuid::new_v4().simple())
}
