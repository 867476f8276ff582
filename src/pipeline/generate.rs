//! AI interaction: the analysis and structured-summary calls.
//!
//! This module is intentionally thin — all prompt engineering lives in
//! [`crate::prompts`] so it can be tuned without touching error handling
//! here, and the response-shape validation lives in
//! [`crate::summary::normalize_summary`]. What remains is classifying
//! collaborator failures and rejecting empty analysis payloads.

use crate::config::ProcessingConfig;
use crate::error::ProcessError;
use crate::services::{StructuredGenerator, TextGenerator};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Run the free-text analysis call.
///
/// # Errors
/// [`ProcessError::AnalysisFailed`] when the call fails or returns an
/// empty string — an empty analysis would silently degrade the summary
/// prompt, so it is treated the same as a failed call.
pub async fn run_analysis(
    generator: &Arc<dyn TextGenerator>,
    prompt: &str,
    config: &ProcessingConfig,
) -> Result<String, ProcessError> {
    let text = generator
        .generate_text(prompt, &config.model, config.max_output_tokens)
        .await
        .map_err(|e| ProcessError::AnalysisFailed {
            detail: e.to_string(),
        })?;

    if text.trim().is_empty() {
        return Err(ProcessError::AnalysisFailed {
            detail: "AI analysis returned empty result".to_string(),
        });
    }

    debug!(chars = text.len(), "analysis call succeeded");
    Ok(text)
}

/// Run the schema-constrained structured-summary call.
///
/// The returned [`Value`] is untrusted; the caller hands it to
/// [`crate::summary::normalize_summary`] before anything reads it.
///
/// # Errors
/// [`ProcessError::SummaryGenerationFailed`] when the call itself fails.
pub async fn run_summary_generation(
    generator: &Arc<dyn StructuredGenerator>,
    prompt: &str,
) -> Result<Value, ProcessError> {
    let raw = generator
        .generate_object(prompt, &summary_schema())
        .await
        .map_err(|e| ProcessError::SummaryGenerationFailed {
            detail: e.to_string(),
        })?;

    debug!("structured generation call succeeded");
    Ok(raw)
}

/// JSON schema handed to the structured-generation service.
///
/// Every field is declared required; the schema is still only a request,
/// which is why the normaliser re-validates the response.
pub fn summary_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "seniority": {
                "type": "object",
                "properties": {
                    "bondRanking": { "type": "string" },
                    "securityDetails": { "type": "string" },
                    "capTablePosition": { "type": "string" },
                    "subordinationDetails": { "type": "string" },
                    "guaranteeStructure": { "type": "string" }
                },
                "required": [
                    "bondRanking",
                    "securityDetails",
                    "capTablePosition",
                    "subordinationDetails",
                    "guaranteeStructure"
                ]
            },
            "issuer": { "type": "string" },
            "bondType": { "type": "string" },
            "principalAmount": { "type": "string" },
            "interestRate": { "type": "string" },
            "maturityDate": { "type": "string" },
            "keyTerms": { "type": "array", "items": { "type": "string" } },
            "covenants": { "type": "array", "items": { "type": "string" } },
            "defaultProvisions": { "type": "array", "items": { "type": "string" } },
            "executiveSummary": { "type": "string" }
        },
        "required": [
            "seniority",
            "issuer",
            "bondType",
            "principalAmount",
            "interestRate",
            "maturityDate",
            "keyTerms",
            "covenants",
            "defaultProvisions",
            "executiveSummary"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;

    struct FixedText(Result<String, ServiceError>);

    #[async_trait]
    impl TextGenerator for FixedText {
        async fn generate_text(
            &self,
            _prompt: &str,
            _model: &str,
            _max_output_tokens: usize,
        ) -> Result<String, ServiceError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn empty_analysis_response_is_an_error() {
        let gen: Arc<dyn TextGenerator> = Arc::new(FixedText(Ok("   ".into())));
        let err = run_analysis(&gen, "p", &ProcessingConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty result"));
    }

    #[tokio::test]
    async fn failed_analysis_call_carries_detail() {
        let gen: Arc<dyn TextGenerator> = Arc::new(FixedText(Err(ServiceError::from("429"))));
        let err = run_analysis(&gen, "p", &ProcessingConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    struct FailingStructured;

    #[async_trait]
    impl StructuredGenerator for FailingStructured {
        async fn generate_object(
            &self,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<Value, ServiceError> {
            Err(ServiceError::from("schema rejected by provider"))
        }
    }

    #[tokio::test]
    async fn failed_structured_call_carries_detail() {
        let gen: Arc<dyn StructuredGenerator> = Arc::new(FailingStructured);
        let err = run_summary_generation(&gen, "p").await.unwrap_err();
        assert!(matches!(err, ProcessError::SummaryGenerationFailed { .. }));
        assert!(err.to_string().contains("schema rejected by provider"));
        assert!(err.to_string().contains("Please try again"));
    }

    #[test]
    fn schema_declares_all_top_level_required_fields() {
        let schema = summary_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required.len(), 10);
        assert!(required.contains(&"seniority"));
        assert!(required.contains(&"executiveSummary"));
        assert_eq!(
            schema["properties"]["seniority"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }
}
