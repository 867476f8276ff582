//! Text preprocessing: deterministic cleanup of raw extracted text.
//!
//! ## Why is preprocessing necessary?
//!
//! Extraction services faithfully reproduce artefacts that carry no
//! meaning for analysis — pagination markers, running headers printed in
//! block capitals on every page, stray control bytes from font encodings.
//! Feeding those to the model wastes prompt budget and invites the
//! analysis to quote junk.
//!
//! This module applies cheap, deterministic rules that strip artefacts
//! without touching content. Each rule is a pure function and the whole
//! transform is **idempotent**: running it twice yields the same output
//! as running it once. There is no failure path; the output is always a
//! string, possibly empty.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: strip junk bytes before
//! pattern matching so patterns see clean input, remove pagination before
//! whitespace collapsing so the leftover gaps are healed, and drop
//! artefact lines before collapsing blank lines so the drops don't leave
//! triple-newline seams. The whole sequence then repeats until the text
//! stops changing: removing a pagination marker can splice the
//! surrounding text into a fresh marker, which a single pass would miss.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all preprocessing rules to raw extracted text.
///
/// Rules (applied in order, to a fixpoint):
/// 1. Strip characters outside printable ASCII, preserving newlines and tabs
/// 2. Remove `Page N of M` pagination markers (case-insensitive)
/// 3. Collapse horizontal whitespace runs to a single space, per line
/// 4. Drop standalone page-number lines and all-caps header/footer lines
/// 5. Collapse multiple blank lines to exactly one blank line
/// 6. Trim leading/trailing whitespace
pub fn normalize_text(input: &str) -> String {
    let mut text = normalize_once(input);
    loop {
        let again = normalize_once(&text);
        if again == text {
            return text;
        }
        text = again;
    }
}

fn normalize_once(input: &str) -> String {
    let stripped = strip_non_printable(input);
    let depaged = remove_pagination(&stripped);
    let lines: Vec<String> = depaged
        .lines()
        .map(collapse_horizontal_whitespace)
        .filter(|line| !is_artifact_line(line))
        .collect();
    let collapsed = collapse_blank_lines(&lines.join("\n"));
    collapsed.trim().to_string()
}

// ── Rule 1: Strip non-printable characters ───────────────────────────────────

// Tabs survive this rule so the whitespace-collapse rule can turn them
// into spaces; deleting them here would glue words together.
fn strip_non_printable(input: &str) -> String {
    input
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || (' '..='~').contains(&c))
        .collect()
}

// ── Rule 2: Remove pagination markers ────────────────────────────────────────

static RE_PAGINATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Page \d+ of \d+").unwrap());

fn remove_pagination(input: &str) -> String {
    RE_PAGINATION.replace_all(input, "").to_string()
}

// ── Rule 3: Collapse horizontal whitespace ───────────────────────────────────

static RE_HSPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

fn collapse_horizontal_whitespace(line: &str) -> String {
    RE_HSPACE.replace_all(line, " ").trim().to_string()
}

// ── Rule 4: Drop artefact lines ──────────────────────────────────────────────

static RE_NUMERIC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// Running headers/footers come out as lines of block capitals; ten or
// more uppercase letters/spaces with nothing else is the heuristic.
static RE_ALLCAPS_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z ]{10,}$").unwrap());

/// Lines consisting solely of a page number or a block-capitals
/// header/footer. Expects an already-trimmed line.
fn is_artifact_line(line: &str) -> bool {
    RE_NUMERIC_LINE.is_match(line) || RE_ALLCAPS_LINE.is_match(line)
}

// ── Rule 5: Collapse blank lines ─────────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
