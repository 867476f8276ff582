//! Prompt construction for the two AI calls.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tuning what the model is asked to
//!    extract (e.g. adding a new seniority cue) happens in exactly one
//!    place.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    a live model, so truncation and excerpt regressions are easy to
//!    catch.
//!
//! Both builders are pure functions over the normalised document text.
//! Excerpts are bounded in *characters* (not bytes, so truncation never
//! splits a code point) with an explicit marker appended whenever text
//! was dropped, so the model knows it is looking at a prefix.

/// Marker appended to a document excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Build the free-text analysis prompt over the first
/// `excerpt_chars` characters of the normalised document.
pub fn build_analysis_prompt(text: &str, excerpt_chars: usize) -> String {
    let (excerpt, truncated) = take_chars(text, excerpt_chars);
    format!(
        "Analyze this bond indenture document and identify the key financial and legal components. Focus on:\n\
         \n\
         1. Issuer information and bond classification\n\
         2. Financial terms (principal, interest rate, maturity)\n\
         3. Key covenants and restrictions\n\
         4. Default provisions and remedies\n\
         5. Important dates and milestones\n\
         \n\
         Document text:\n\
         {excerpt}{marker}\n\
         \n\
         Provide a detailed analysis focusing on the most critical terms and provisions.",
        marker = if truncated { TRUNCATION_MARKER } else { "" },
    )
}

/// Build the structured-summary prompt from a bounded document excerpt
/// plus the full analysis text.
pub fn build_summary_prompt(text: &str, analysis: &str, excerpt_chars: usize) -> String {
    let (excerpt, truncated) = take_chars(text, excerpt_chars);
    format!(
        "Based on this bond indenture document and analysis, create a structured summary with the following information:\n\
         \n\
         Document: {excerpt}{marker}\n\
         \n\
         Analysis: {analysis}\n\
         \n\
         Extract and format the following information:\n\
         \n\
         SENIORITY ANALYSIS (CRITICAL - This should be the first section):\n\
         - seniority.bondRanking: Where these bonds rank in the capital structure (e.g., \"Senior Secured First Lien\", \"Senior Unsecured\", \"Subordinated\", \"Junior Subordinated\")\n\
         - seniority.securityDetails: What specific collateral or security backs these bonds (e.g., \"Secured by first lien on all assets\", \"Unsecured general obligation\")\n\
         - seniority.capTablePosition: Detailed description of where bonds sit in the capital structure relative to equity, other debt, and preferred securities\n\
         - seniority.subordinationDetails: Any subordination provisions, intercreditor agreements, or ranking relative to other debt instruments\n\
         - seniority.guaranteeStructure: Details of any guarantees, who provides them, and their ranking in the capital structure\n\
         \n\
         OTHER BOND DETAILS:\n\
         - issuer: The name of the bond issuer\n\
         - bondType: Type of bond (e.g., \"Corporate Bond\", \"Municipal Bond\", \"Convertible Bond\")\n\
         - principalAmount: The principal amount (e.g., \"$100,000,000\")\n\
         - interestRate: Interest rate (e.g., \"4.25% per annum\")\n\
         - maturityDate: Maturity date (e.g., \"December 15, 2030\")\n\
         - keyTerms: Array of 5-8 most important terms\n\
         - covenants: Array of key covenants and restrictions\n\
         - defaultProvisions: Array of default events and remedies\n\
         - executiveSummary: A comprehensive 2-3 paragraph executive summary\n\
         \n\
         Pay special attention to seniority language such as:\n\
         - \"Senior\" vs \"Subordinated\" vs \"Junior\"\n\
         - \"Secured\" vs \"Unsecured\"\n\
         - \"First lien\", \"Second lien\", \"Third lien\"\n\
         - \"Pari passu\" (equal ranking)\n\
         - \"Structurally subordinated\"\n\
         - Guarantee provisions and their ranking\n\
         - Intercreditor agreements\n\
         - Security interests and collateral descriptions\n\
         \n\
         Ensure all financial amounts include currency symbols and all dates are properly formatted.",
        marker = if truncated { TRUNCATION_MARKER } else { "" },
    )
}

/// First `limit` characters of `text`, with a flag saying whether
/// anything was dropped.
fn take_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_carries_no_marker() {
        let prompt = build_analysis_prompt("a short indenture", 8000);
        assert!(prompt.contains("a short indenture"));
        assert!(!prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn long_text_is_cut_at_limit_with_marker() {
        let text = "x".repeat(9000);
        let prompt = build_analysis_prompt(&text, 8000);
        assert!(prompt.contains(TRUNCATION_MARKER));
        assert!(prompt.contains(&"x".repeat(8000)));
        assert!(!prompt.contains(&"x".repeat(8001)));
    }

    #[test]
    fn text_exactly_at_limit_is_not_marked_truncated() {
        let text = "y".repeat(8000);
        let prompt = build_analysis_prompt(&text, 8000);
        assert!(!prompt.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // Multi-byte chars: 10 chars is 30 bytes; a byte-based cut at 10
        // would split a code point and panic.
        let text = "€".repeat(20);
        let (excerpt, truncated) = take_chars(&text, 10);
        assert!(truncated);
        assert_eq!(excerpt.chars().count(), 10);
    }

    #[test]
    fn summary_prompt_includes_full_analysis() {
        let analysis = "The notes rank pari passu with existing senior debt.";
        let prompt = build_summary_prompt(&"z".repeat(5000), analysis, 4000);
        assert!(prompt.contains(analysis));
        assert!(prompt.contains(TRUNCATION_MARKER));
        assert!(prompt.contains(&"z".repeat(4000)));
        assert!(!prompt.contains(&"z".repeat(4001)));
    }

    #[test]
    fn summary_prompt_names_every_schema_field() {
        let prompt = build_summary_prompt("doc", "analysis", 4000);
        for field in [
            "seniority.bondRanking",
            "seniority.securityDetails",
            "seniority.capTablePosition",
            "seniority.subordinationDetails",
            "seniority.guaranteeStructure",
            "issuer",
            "bondType",
            "principalAmount",
            "interestRate",
            "maturityDate",
            "keyTerms",
            "covenants",
            "defaultProvisions",
            "executiveSummary",
        ] {
            assert!(prompt.contains(field), "prompt missing field {field}");
        }
    }
}
