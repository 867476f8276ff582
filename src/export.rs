//! Summary export: plain-text rendering and download file naming.
//!
//! Only the plain-text report body is generated here; for the PDF and
//! Word formats the crate supplies the naming convention and the host
//! does the actual document generation.

use crate::summary::BondIndentureSummary;
use once_cell::sync::Lazy;
use regex::Regex;

/// Requested download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "docx",
        }
    }
}

/// Render the summary as a plain-text report.
pub fn render_text_report(summary: &BondIndentureSummary) -> String {
    let bullets = |items: &[String]| {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "BOND INDENTURE SUMMARY\n\
         \n\
         Issuer: {issuer}\n\
         Bond Type: {bond_type}\n\
         Principal Amount: {principal}\n\
         Interest Rate: {rate}\n\
         Maturity Date: {maturity}\n\
         \n\
         SENIORITY\n\
         Ranking: {ranking}\n\
         Security: {security}\n\
         Capital Structure Position: {cap_table}\n\
         Subordination: {subordination}\n\
         Guarantees: {guarantees}\n\
         \n\
         EXECUTIVE SUMMARY\n\
         {executive}\n\
         \n\
         KEY TERMS\n\
         {key_terms}\n\
         \n\
         COVENANTS\n\
         {covenants}\n\
         \n\
         DEFAULT PROVISIONS\n\
         {default_provisions}\n\
         \n\
         Generated on: {generated}\n",
        issuer = summary.issuer,
        bond_type = summary.bond_type,
        principal = summary.principal_amount,
        rate = summary.interest_rate,
        maturity = summary.maturity_date,
        ranking = summary.seniority.bond_ranking,
        security = summary.seniority.security_details,
        cap_table = summary.seniority.cap_table_position,
        subordination = summary.seniority.subordination_details,
        guarantees = summary.seniority.guarantee_structure,
        executive = summary.executive_summary,
        key_terms = bullets(&summary.key_terms),
        covenants = bullets(&summary.covenants),
        default_provisions = bullets(&summary.default_provisions),
        generated = summary.created_at.format("%Y-%m-%d"),
    )
}

static RE_NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Download file name derived from the issuer,
/// e.g. `bond-summary-acme-corp.txt`.
pub fn export_file_name(summary: &BondIndentureSummary, format: ExportFormat) -> String {
    let slug = RE_NON_SLUG
        .replace_all(&summary.issuer.to_lowercase(), "-")
        .trim_matches('-')
        .to_string();
    let slug = if slug.is_empty() {
        "document".to_string()
    } else {
        slug
    };
    format!("bond-summary-{slug}.{}", format.extension())
}
