//! Data model for a single document processing run.
//!
//! [`DocumentProcessing`] is the aggregate root for one upload attempt. It
//! owns a fixed, ordered list of six [`ProcessingStep`]s whose insertion
//! order is the execution order. The step list is deliberately a plain
//! `Vec` of tagged records rather than a state-machine framework: the
//! pipeline is a small fixed enumeration and modelling it as anything
//! heavier would misrepresent it.
//!
//! Invariants maintained by [`crate::process::DocumentProcessor`]:
//!
//! * at most one step has status [`StepStatus::Processing`] at any time;
//! * a step never leaves [`StepStatus::Completed`] or [`StepStatus::Error`];
//! * aggregate [`DocumentStatus::Error`] implies exactly one step carries
//!   the failure message;
//! * aggregate [`DocumentStatus::Completed`] implies all steps completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for each pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Upload,
    Validation,
    Extraction,
    Preprocessing,
    AiAnalysis,
    SummaryGeneration,
}

impl StepId {
    /// All steps in execution order. The pipeline is constructed from
    /// this list, so insertion order always equals execution order.
    pub const ALL: [StepId; 6] = [
        StepId::Upload,
        StepId::Validation,
        StepId::Extraction,
        StepId::Preprocessing,
        StepId::AiAnalysis,
        StepId::SummaryGeneration,
    ];

    /// Stable slug used in snapshots and persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Upload => "upload",
            StepId::Validation => "validation",
            StepId::Extraction => "extraction",
            StepId::Preprocessing => "preprocessing",
            StepId::AiAnalysis => "ai_analysis",
            StepId::SummaryGeneration => "summary_generation",
        }
    }

    /// Human-readable display label.
    pub fn label(&self) -> &'static str {
        match self {
            StepId::Upload => "File Upload",
            StepId::Validation => "Document Validation",
            StepId::Extraction => "Text Extraction",
            StepId::Preprocessing => "Text Preprocessing",
            StepId::AiAnalysis => "AI Analysis",
            StepId::SummaryGeneration => "Summary Generation",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a single step.
///
/// Transitions forward only: `Pending → Processing → Completed`, or
/// `Processing → Error` on failure. Never reverses once terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

/// One named stage in the pipeline with its current status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub id: StepId,
    /// Display label, fixed at construction.
    pub name: String,
    pub status: StepStatus,
    /// Optional human-readable note attached on each transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Optional coarse progress indicator, 0–100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl ProcessingStep {
    fn new(id: StepId, status: StepStatus) -> Self {
        Self {
            id,
            name: id.label().to_string(),
            status,
            message: None,
            progress: None,
        }
    }
}

/// Lifecycle state of the whole upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Uploading,
    Processing,
    Completed,
    Error,
}

/// An uploaded file handed to the pipeline: name, declared content type,
/// and raw bytes. File acquisition itself (drag-and-drop, network upload)
/// happens upstream; by the time a `DocumentFile` exists the bytes are
/// already in memory.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub name: String,
    /// MIME type as declared by the uploader, e.g. `application/pdf`.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Aggregate root for one upload attempt.
///
/// Snapshots of this struct are pushed to the configured
/// [`crate::progress::ProcessingObserver`] after every state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProcessing {
    /// Opaque unique token, `doc_<uuid>`.
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub status: DocumentStatus,
    /// Fixed six entries; insertion order is execution order.
    pub steps: Vec<ProcessingStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Serialized [`crate::summary::BondIndentureSummary`] JSON, set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DocumentProcessing {
    /// Construct the aggregate for a fresh run.
    ///
    /// `upload` is completed immediately (file acquisition already
    /// succeeded upstream); `validation` starts processing; everything
    /// else is pending.
    pub fn new(id: impl Into<String>, file: &DocumentFile) -> Self {
        let steps = StepId::ALL
            .iter()
            .map(|&sid| match sid {
                StepId::Upload => ProcessingStep::new(sid, StepStatus::Completed),
                StepId::Validation => {
                    let mut s = ProcessingStep::new(sid, StepStatus::Processing);
                    s.progress = Some(0);
                    s
                }
                _ => ProcessingStep::new(sid, StepStatus::Pending),
            })
            .collect();

        Self {
            id: id.into(),
            file_name: file.name.clone(),
            file_size: file.size(),
            uploaded_at: Utc::now(),
            status: DocumentStatus::Processing,
            steps,
            extracted_text: None,
            summary: None,
            error_message: None,
        }
    }

    /// Mutable access to a step by id. The step list is fixed at
    /// construction, so a miss is a programming error; callers treat
    /// `None` as a no-op rather than panicking.
    pub fn step_mut(&mut self, id: StepId) -> Option<&mut ProcessingStep> {
        self.steps.iter_mut().find(|s| s.id == id)
    }

    pub fn step(&self, id: StepId) -> Option<&ProcessingStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// The step currently in flight, if any.
    pub fn current_step(&self) -> Option<&ProcessingStep> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Processing)
    }

    /// Number of steps currently in flight. The pipeline keeps this ≤ 1.
    pub fn processing_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Processing)
            .count()
    }

    /// True once every step reached `Completed`.
    pub fn all_steps_completed(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, bytes: usize) -> DocumentFile {
        DocumentFile::new(name, "application/pdf", vec![b'x'; bytes])
    }

    #[test]
    fn new_aggregate_has_six_steps_in_order() {
        let p = DocumentProcessing::new("doc_1", &pdf("a.pdf", 10));
        assert_eq!(p.steps.len(), 6);
        let ids: Vec<&str> = p.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "upload",
                "validation",
                "extraction",
                "preprocessing",
                "ai_analysis",
                "summary_generation"
            ]
        );
    }

    #[test]
    fn new_aggregate_upload_done_validation_in_flight() {
        let p = DocumentProcessing::new("doc_1", &pdf("a.pdf", 10));
        assert_eq!(p.step(StepId::Upload).unwrap().status, StepStatus::Completed);
        assert_eq!(
            p.step(StepId::Validation).unwrap().status,
            StepStatus::Processing
        );
        assert_eq!(p.processing_count(), 1);
        assert_eq!(p.status, DocumentStatus::Processing);
    }

    #[test]
    fn file_size_tracks_byte_length() {
        let p = DocumentProcessing::new("doc_1", &pdf("a.pdf", 1234));
        assert_eq!(p.file_size, 1234);
    }

    #[test]
    fn snapshot_serialises_with_camel_case_keys() {
        let p = DocumentProcessing::new("doc_1", &pdf("a.pdf", 10));
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("fileName").is_some());
        assert!(json.get("uploadedAt").is_some());
        assert_eq!(json["steps"][4]["id"], "ai_analysis");
    }
}
