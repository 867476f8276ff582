//! The structured summary value object and its normalisation boundary.
//!
//! ## Why a normalisation boundary?
//!
//! The structured-generation call is given an explicit JSON schema, but
//! hosted models are not guaranteed to honour it: fields arrive missing,
//! blank, or with the wrong runtime type. Letting that shape leak into
//! the rest of the crate would force every consumer to re-validate, so
//! the untrusted `serde_json::Value` crosses into a fully-populated
//! [`BondIndentureSummary`] in exactly one place: [`normalize_summary`].
//!
//! The policy is deliberately asymmetric: a response that is not an
//! object at all is fatal ([`ProcessError::InvalidSummaryData`] — there
//! is nothing to default from), while any malformed *field* inside an
//! otherwise-valid object is silently replaced with the
//! [`NOT_SPECIFIED`] sentinel (scalars) or an empty list (arrays). A
//! missing field must never abort an otherwise successful run.

use crate::error::ProcessError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Sentinel substituted for missing or invalid required string fields.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Where the bonds sit in the issuer's capital structure.
///
/// This is the first section of every summary: seniority language
/// ("senior secured first lien", "pari passu", "structurally
/// subordinated") determines recovery priority and is the single most
/// consequential piece of an indenture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeniorityProfile {
    /// Ranking in the capital structure, e.g. "Senior Secured First Lien".
    pub bond_ranking: String,
    /// Collateral or security backing the bonds.
    pub security_details: String,
    /// Position relative to equity, other debt, and preferred securities.
    pub cap_table_position: String,
    /// Subordination provisions and intercreditor arrangements.
    pub subordination_details: String,
    /// Guarantees, their providers, and their ranking.
    pub guarantee_structure: String,
}

/// Immutable structured summary of one bond indenture.
///
/// Constructed once per successful pipeline run by [`normalize_summary`];
/// owned by the caller for persistence and display. Field names
/// serialise in camelCase to match the generation schema and the stored
/// JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondIndentureSummary {
    /// `summary_<document id>`.
    pub id: String,
    pub document_id: String,
    pub seniority: SeniorityProfile,
    pub issuer: String,
    pub bond_type: String,
    pub principal_amount: String,
    pub interest_rate: String,
    pub maturity_date: String,
    pub key_terms: Vec<String>,
    pub covenants: Vec<String>,
    pub default_provisions: Vec<String>,
    pub executive_summary: String,
    pub created_at: DateTime<Utc>,
}

/// Validate and backfill the untrusted structured-generation response.
///
/// # Errors
/// [`ProcessError::InvalidSummaryData`] when `raw` is not a JSON object
/// (including `null`). Every other malformation is recovered via
/// sentinel defaulting and never surfaces as an error.
pub fn normalize_summary(
    raw: Value,
    document_id: &str,
    created_at: DateTime<Utc>,
) -> Result<BondIndentureSummary, ProcessError> {
    let obj = match raw {
        Value::Object(map) => map,
        other => {
            debug!("structured response was not an object: {}", value_kind(&other));
            return Err(ProcessError::InvalidSummaryData);
        }
    };

    // An absent or non-object seniority block degrades to an empty map so
    // the per-field rule below fills every slot with the sentinel.
    let seniority_obj = match obj.get("seniority") {
        Some(Value::Object(map)) => map.clone(),
        _ => serde_json::Map::new(),
    };

    let seniority = SeniorityProfile {
        bond_ranking: scalar_or_sentinel(&seniority_obj, "bondRanking"),
        security_details: scalar_or_sentinel(&seniority_obj, "securityDetails"),
        cap_table_position: scalar_or_sentinel(&seniority_obj, "capTablePosition"),
        subordination_details: scalar_or_sentinel(&seniority_obj, "subordinationDetails"),
        guarantee_structure: scalar_or_sentinel(&seniority_obj, "guaranteeStructure"),
    };

    Ok(BondIndentureSummary {
        id: format!("summary_{document_id}"),
        document_id: document_id.to_string(),
        seniority,
        issuer: scalar_or_sentinel(&obj, "issuer"),
        bond_type: scalar_or_sentinel(&obj, "bondType"),
        principal_amount: scalar_or_sentinel(&obj, "principalAmount"),
        interest_rate: scalar_or_sentinel(&obj, "interestRate"),
        maturity_date: scalar_or_sentinel(&obj, "maturityDate"),
        key_terms: string_list(&obj, "keyTerms"),
        covenants: string_list(&obj, "covenants"),
        default_provisions: string_list(&obj, "defaultProvisions"),
        executive_summary: scalar_or_sentinel(&obj, "executiveSummary"),
        created_at,
    })
}

/// A required scalar: present, a string, and non-blank after trimming —
/// otherwise the sentinel.
fn scalar_or_sentinel(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// An array field: non-arrays become empty; elements are not individually
/// validated, but non-string elements are carried as their JSON text so
/// nothing is silently dropped.
fn string_list(obj: &serde_json::Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_raw() -> Value {
        json!({
            "seniority": {
                "bondRanking": "Senior Unsecured",
                "securityDetails": "Unsecured general obligation",
                "capTablePosition": "Above equity, pari passu with other senior notes",
                "subordinationDetails": "None",
                "guaranteeStructure": "Guaranteed by all material subsidiaries"
            },
            "issuer": "Acme Corp",
            "bondType": "Corporate Bond",
            "principalAmount": "$100,000,000",
            "interestRate": "4.25% per annum",
            "maturityDate": "December 15, 2030",
            "keyTerms": ["Callable after 2027", "144A"],
            "covenants": ["Limitation on liens"],
            "defaultProvisions": ["Cross-default above $25M"],
            "executiveSummary": "A plain senior unsecured issue."
        })
    }

    fn normalize(raw: Value) -> Result<BondIndentureSummary, ProcessError> {
        normalize_summary(raw, "doc_1", Utc::now())
    }

    #[test]
    fn fully_valid_object_passes_through_unchanged() {
        let s = normalize(full_raw()).unwrap();
        assert_eq!(s.issuer, "Acme Corp");
        assert_eq!(s.seniority.bond_ranking, "Senior Unsecured");
        assert_eq!(s.key_terms.len(), 2);
        assert_eq!(s.id, "summary_doc_1");
        assert_eq!(s.document_id, "doc_1");
    }

    #[test]
    fn null_response_is_fatal() {
        assert!(matches!(
            normalize(Value::Null),
            Err(ProcessError::InvalidSummaryData)
        ));
    }

    #[test]
    fn string_response_is_fatal() {
        assert!(matches!(
            normalize(json!("not an object")),
            Err(ProcessError::InvalidSummaryData)
        ));
    }

    #[test]
    fn blank_issuer_defaults_others_untouched() {
        let mut raw = full_raw();
        raw["issuer"] = json!("");
        let s = normalize(raw).unwrap();
        assert_eq!(s.issuer, NOT_SPECIFIED);
        assert_eq!(s.bond_type, "Corporate Bond");
        assert_eq!(s.principal_amount, "$100,000,000");
    }

    #[test]
    fn whitespace_only_scalar_defaults() {
        let mut raw = full_raw();
        raw["maturityDate"] = json!("   ");
        let s = normalize(raw).unwrap();
        assert_eq!(s.maturity_date, NOT_SPECIFIED);
    }

    #[test]
    fn wrong_typed_scalar_defaults() {
        let mut raw = full_raw();
        raw["principalAmount"] = json!(100_000_000);
        let s = normalize(raw).unwrap();
        assert_eq!(s.principal_amount, NOT_SPECIFIED);
    }

    #[test]
    fn missing_seniority_fills_all_five_with_sentinel() {
        let mut raw = full_raw();
        raw.as_object_mut().unwrap().remove("seniority");
        let s = normalize(raw).unwrap();
        assert_eq!(s.seniority.bond_ranking, NOT_SPECIFIED);
        assert_eq!(s.seniority.security_details, NOT_SPECIFIED);
        assert_eq!(s.seniority.cap_table_position, NOT_SPECIFIED);
        assert_eq!(s.seniority.subordination_details, NOT_SPECIFIED);
        assert_eq!(s.seniority.guarantee_structure, NOT_SPECIFIED);
    }

    #[test]
    fn non_object_seniority_is_not_fatal() {
        let mut raw = full_raw();
        raw["seniority"] = json!("senior");
        let s = normalize(raw).unwrap();
        assert_eq!(s.seniority.bond_ranking, NOT_SPECIFIED);
    }

    #[test]
    fn non_array_list_fields_become_empty() {
        let mut raw = full_raw();
        raw["keyTerms"] = json!("Callable after 2027");
        raw["covenants"] = json!(null);
        let s = normalize(raw).unwrap();
        assert!(s.key_terms.is_empty());
        assert!(s.covenants.is_empty());
        assert_eq!(s.default_provisions, vec!["Cross-default above $25M"]);
    }

    #[test]
    fn empty_object_yields_all_sentinels_and_empty_lists() {
        let s = normalize(json!({})).unwrap();
        assert_eq!(s.issuer, NOT_SPECIFIED);
        assert_eq!(s.executive_summary, NOT_SPECIFIED);
        assert!(s.key_terms.is_empty());
        assert!(s.covenants.is_empty());
        assert!(s.default_provisions.is_empty());
    }

    #[test]
    fn summary_serialises_camel_case() {
        let s = normalize(full_raw()).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("bondType").is_some());
        assert!(json.get("defaultProvisions").is_some());
        assert!(json["seniority"].get("capTablePosition").is_some());
    }
}
