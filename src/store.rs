//! Record-store boundary: persisting runs and reading history.
//!
//! Persistence is delegated entirely to an external append-only record
//! store behind the [`RecordStore`] trait. Two record kinds exist —
//! documents and summaries — mirroring the store's flat columns: the
//! three array fields of a summary are serialized to JSON text on write
//! and parsed back on read, because the store only holds scalar columns.
//!
//! Records are tagged with the session user's opaque id for ownership;
//! the helpers at the bottom ([`save_run`], [`load_history`],
//! [`load_summary`]) wire the session provider and the store together so
//! hosts don't repeat that plumbing.

use crate::document::{DocumentProcessing, DocumentStatus};
use crate::error::{ProcessError, ServiceError};
use crate::services::SessionProvider;
use crate::summary::BondIndentureSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default history page size.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// One row in the "documents" record kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub status: DocumentStatus,
    pub extracted_text: Option<String>,
    pub error_message: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Flatten a finished (completed or failed) aggregate into a row.
    pub fn from_processing(processing: &DocumentProcessing, user_id: &str) -> Self {
        Self {
            id: processing.id.clone(),
            user_id: user_id.to_string(),
            file_name: processing.file_name.clone(),
            file_size: processing.file_size,
            status: processing.status,
            extracted_text: processing.extracted_text.clone(),
            error_message: processing.error_message.clone(),
            uploaded_at: processing.uploaded_at,
        }
    }
}

/// One row in the "summaries" record kind.
///
/// `key_terms`, `covenants`, and `default_provisions` are JSON-encoded
/// arrays, stored as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub id: String,
    pub document_id: String,
    pub user_id: String,
    pub issuer: String,
    pub bond_type: String,
    pub principal_amount: String,
    pub interest_rate: String,
    pub maturity_date: String,
    pub bond_ranking: String,
    pub security_details: String,
    pub cap_table_position: String,
    pub subordination_details: String,
    pub guarantee_structure: String,
    pub key_terms: String,
    pub covenants: String,
    pub default_provisions: String,
    pub executive_summary: String,
    pub created_at: DateTime<Utc>,
}

impl SummaryRecord {
    /// Serialize a summary into its stored row form.
    pub fn from_summary(
        summary: &BondIndentureSummary,
        user_id: &str,
    ) -> Result<Self, ProcessError> {
        let encode = |v: &Vec<String>| {
            serde_json::to_string(v).map_err(|e| ProcessError::Storage {
                detail: format!("failed to encode array column: {e}"),
            })
        };
        Ok(Self {
            id: summary.id.clone(),
            document_id: summary.document_id.clone(),
            user_id: user_id.to_string(),
            issuer: summary.issuer.clone(),
            bond_type: summary.bond_type.clone(),
            principal_amount: summary.principal_amount.clone(),
            interest_rate: summary.interest_rate.clone(),
            maturity_date: summary.maturity_date.clone(),
            bond_ranking: summary.seniority.bond_ranking.clone(),
            security_details: summary.seniority.security_details.clone(),
            cap_table_position: summary.seniority.cap_table_position.clone(),
            subordination_details: summary.seniority.subordination_details.clone(),
            guarantee_structure: summary.seniority.guarantee_structure.clone(),
            key_terms: encode(&summary.key_terms)?,
            covenants: encode(&summary.covenants)?,
            default_provisions: encode(&summary.default_provisions)?,
            executive_summary: summary.executive_summary.clone(),
            created_at: summary.created_at,
        })
    }

    /// Parse a stored row back into the summary value object.
    pub fn into_summary(self) -> Result<BondIndentureSummary, ProcessError> {
        let decode = |column: &str, text: &str| {
            serde_json::from_str::<Vec<String>>(text).map_err(|e| ProcessError::Storage {
                detail: format!("failed to decode {column} column: {e}"),
            })
        };
        Ok(BondIndentureSummary {
            seniority: crate::summary::SeniorityProfile {
                bond_ranking: self.bond_ranking,
                security_details: self.security_details,
                cap_table_position: self.cap_table_position,
                subordination_details: self.subordination_details,
                guarantee_structure: self.guarantee_structure,
            },
            key_terms: decode("key_terms", &self.key_terms)?,
            covenants: decode("covenants", &self.covenants)?,
            default_provisions: decode("default_provisions", &self.default_provisions)?,
            id: self.id,
            document_id: self.document_id,
            issuer: self.issuer,
            bond_type: self.bond_type,
            principal_amount: self.principal_amount,
            interest_rate: self.interest_rate,
            maturity_date: self.maturity_date,
            executive_summary: self.executive_summary,
            created_at: self.created_at,
        })
    }
}

/// External append-only record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_document(&self, record: &DocumentRecord) -> Result<(), ServiceError>;

    async fn create_summary(&self, record: &SummaryRecord) -> Result<(), ServiceError>;

    /// The user's documents, newest first, at most `limit` rows.
    async fn list_documents(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DocumentRecord>, ServiceError>;

    /// The summary for one of the user's documents, if it exists.
    async fn find_summary(
        &self,
        user_id: &str,
        document_id: &str,
    ) -> Result<Option<SummaryRecord>, ServiceError>;
}

/// Persist a finished run (and its summary, when one was produced) under
/// the current session user.
///
/// Failed runs are persisted too — the history view shows them with
/// their error message so the user can retry.
///
/// # Errors
/// [`ProcessError::Storage`] when no user is signed in or the store
/// rejects a write.
pub async fn save_run(
    store: &Arc<dyn RecordStore>,
    session: &Arc<dyn SessionProvider>,
    processing: &DocumentProcessing,
    summary: Option<&BondIndentureSummary>,
) -> Result<(), ProcessError> {
    let user_id = require_user(session).await?;

    let doc = DocumentRecord::from_processing(processing, &user_id);
    store
        .create_document(&doc)
        .await
        .map_err(|e| ProcessError::Storage {
            detail: e.to_string(),
        })?;
    debug!(document_id = %doc.id, "document record persisted");

    if let Some(summary) = summary {
        let row = SummaryRecord::from_summary(summary, &user_id)?;
        store
            .create_summary(&row)
            .await
            .map_err(|e| ProcessError::Storage {
                detail: e.to_string(),
            })?;
        debug!(summary_id = %row.id, "summary record persisted");
    }

    Ok(())
}

/// The current user's most recent document records, newest first.
pub async fn load_history(
    store: &Arc<dyn RecordStore>,
    session: &Arc<dyn SessionProvider>,
    limit: usize,
) -> Result<Vec<DocumentRecord>, ProcessError> {
    let user_id = require_user(session).await?;
    store
        .list_documents(&user_id, limit)
        .await
        .map_err(|e| ProcessError::Storage {
            detail: e.to_string(),
        })
}

/// Load and decode the summary for one of the current user's documents.
pub async fn load_summary(
    store: &Arc<dyn RecordStore>,
    session: &Arc<dyn SessionProvider>,
    document_id: &str,
) -> Result<Option<BondIndentureSummary>, ProcessError> {
    let user_id = require_user(session).await?;
    let row = store
        .find_summary(&user_id, document_id)
        .await
        .map_err(|e| ProcessError::Storage {
            detail: e.to_string(),
        })?;
    row.map(SummaryRecord::into_summary).transpose()
}

async fn require_user(session: &Arc<dyn SessionProvider>) -> Result<String, ProcessError> {
    session
        .current_user_id()
        .await
        .map_err(|e| ProcessError::Storage {
            detail: e.to_string(),
        })?
        .ok_or_else(|| ProcessError::Storage {
            detail: "no user is signed in".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{normalize_summary, NOT_SPECIFIED};
    use serde_json::json;

    fn summary() -> BondIndentureSummary {
        normalize_summary(
            json!({
                "issuer": "Acme Corp",
                "bondType": "Corporate Bond",
                "keyTerms": ["Callable after 2027", "144A"],
                "covenants": [],
                "defaultProvisions": ["Cross-default"],
                "executiveSummary": "Summary."
            }),
            "doc_42",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn array_columns_round_trip_through_json_text() {
        let s = summary();
        let row = SummaryRecord::from_summary(&s, "user_1").unwrap();
        assert_eq!(row.key_terms, r#"["Callable after 2027","144A"]"#);
        assert_eq!(row.covenants, "[]");

        let back = row.into_summary().unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn sentinel_fields_survive_the_round_trip() {
        let s = summary();
        assert_eq!(s.principal_amount, NOT_SPECIFIED);
        let back = SummaryRecord::from_summary(&s, "user_1")
            .unwrap()
            .into_summary()
            .unwrap();
        assert_eq!(back.principal_amount, NOT_SPECIFIED);
        assert_eq!(back.seniority.bond_ranking, NOT_SPECIFIED);
    }

    #[test]
    fn corrupt_array_column_is_a_storage_error() {
        let mut row = SummaryRecord::from_summary(&summary(), "user_1").unwrap();
        row.covenants = "not json".to_string();
        let err = row.into_summary().unwrap_err();
        assert!(matches!(err, ProcessError::Storage { .. }));
        assert!(err.to_string().contains("covenants"));
    }

    #[test]
    fn document_record_copies_terminal_state() {
        use crate::document::DocumentFile;
        let file = DocumentFile::new("a.pdf", "application/pdf", vec![1, 2]);
        let mut processing = DocumentProcessing::new("doc_9", &file);
        processing.status = DocumentStatus::Error;
        processing.error_message = Some("Invalid PDF file format".into());

        let row = DocumentRecord::from_processing(&processing, "user_1");
        assert_eq!(row.id, "doc_9");
        assert_eq!(row.user_id, "user_1");
        assert_eq!(row.status, DocumentStatus::Error);
        assert_eq!(row.error_message.as_deref(), Some("Invalid PDF file format"));
    }
}
