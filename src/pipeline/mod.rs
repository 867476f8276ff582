//! Pipeline stages for document analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different extraction backend) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ extract ──▶ preprocess ──▶ generate
//! (type/size)  (primary +   (deterministic  (analysis text +
//!               fallback)    cleanup)        structured summary)
//! ```
//!
//! 1. [`validate`]   — reject wrong-typed, empty, or oversized uploads
//! 2. [`extract`]    — drive the extraction service with one chunked
//!    fallback; the first stage with network I/O
//! 3. [`preprocess`] — deterministic, idempotent text cleanup rules to
//!    strip extraction artefacts (pagination, headers, junk bytes)
//! 4. [`generate`]   — the two AI calls: free-text analysis and
//!    schema-constrained structured summary

pub mod extract;
pub mod generate;
pub mod preprocess;
pub mod validate;
