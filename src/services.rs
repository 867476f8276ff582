//! Traits for the external collaborators the pipeline consumes.
//!
//! The backend (identity provider, text extraction, text and structured
//! generation) is entirely external to this crate. Each collaborator is a
//! small `async` trait the host implements over its own transport; the
//! pipeline holds them as `Arc<dyn …>` and never sees a concrete client.
//! This is also what makes the pipeline testable without a network: the
//! integration suite drives it with in-memory mock implementations.
//!
//! All methods are suspension points returning a [`ServiceError`] on
//! failure; the pipeline classifies those into
//! [`crate::error::ProcessError`] variants at the call site.

use crate::document::DocumentFile;
use crate::error::ServiceError;
use async_trait::async_trait;
use serde_json::Value;

/// What a text-extraction call actually returned, before any trust is
/// placed in it.
///
/// Extraction services are loosely typed at the wire level: the primary
/// call should return text and the chunked call should return a sequence,
/// but neither is guaranteed. Modelling the result as an explicit sum
/// type keeps the "runtime type was not text" case visible in the
/// adapter instead of panicking deep inside a deserialiser.
#[derive(Debug, Clone)]
pub enum ExtractedContent {
    /// Plain extracted text.
    Text(String),
    /// An ordered sequence of text chunks.
    Chunks(Vec<String>),
    /// Anything else the service produced.
    Other(Value),
}

/// Remote text-extraction service over an uploaded document blob.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Whole-document extraction, the primary strategy.
    async fn extract(&self, file: &DocumentFile) -> Result<ExtractedContent, ServiceError>;

    /// Chunked extraction requesting fixed-size chunks, the fallback
    /// strategy for documents the primary call cannot handle in one pass.
    async fn extract_chunked(
        &self,
        file: &DocumentFile,
        chunk_size: usize,
    ) -> Result<ExtractedContent, ServiceError>;
}

/// Hosted free-text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(
        &self,
        prompt: &str,
        model: &str,
        max_output_tokens: usize,
    ) -> Result<String, ServiceError>;
}

/// Hosted structured generation constrained by a JSON schema.
///
/// The returned [`Value`] is untrusted even when the call succeeds — the
/// schema is a request, not a guarantee. It crosses into a typed summary
/// only through [`crate::summary::normalize_summary`].
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate_object(&self, prompt: &str, schema: &Value) -> Result<Value, ServiceError>;
}

/// External identity/session provider.
///
/// The pipeline only needs the authenticated user's id as an opaque
/// ownership tag on persisted records; login/logout flows live entirely
/// in the host.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current user's opaque id, or `None` when nobody is signed in.
    async fn current_user_id(&self) -> Result<Option<String>, ServiceError>;
}
