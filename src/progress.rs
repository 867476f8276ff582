//! Observer trait for pipeline state snapshots.
//!
//! Inject an [`Arc<dyn ProcessingObserver>`] via
//! [`crate::config::ProcessingConfigBuilder::observer`] to receive the
//! full [`DocumentProcessing`] aggregate after every state change.
//!
//! # Why a callback instead of a channel?
//!
//! The callback is the least-invasive integration point: hosts can
//! forward snapshots to a UI state store, a WebSocket, a database row, or
//! a progress bar without the library knowing how the host communicates.
//! The orchestrator invokes it synchronously on its own task at each
//! transition and treats it as fire-and-forget: observers must not block,
//! and nothing an observer does can abort the pipeline.
//!
//! # Example
//!
//! ```rust
//! use bondlens::{DocumentProcessing, ProcessingConfig, ProcessingObserver};
//! use std::sync::{Arc, Mutex};
//!
//! struct Recorder {
//!     snapshots: Mutex<Vec<DocumentProcessing>>,
//! }
//!
//! impl ProcessingObserver for Recorder {
//!     fn on_update(&self, processing: &DocumentProcessing) {
//!         self.snapshots.lock().unwrap().push(processing.clone());
//!     }
//! }
//!
//! let recorder = Arc::new(Recorder { snapshots: Mutex::new(Vec::new()) });
//! let config = ProcessingConfig::builder()
//!     .observer(recorder as Arc<dyn ProcessingObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::document::DocumentProcessing;
use std::sync::Arc;

/// Called by the pipeline after every aggregate state change.
///
/// Implementations must be `Send + Sync`; multiple independent pipeline
/// runs may share one observer. The method has a default no-op body so
/// partial implementations stay forward-compatible.
pub trait ProcessingObserver: Send + Sync {
    /// Receive a snapshot of the aggregate as it stands right now.
    ///
    /// The snapshot is borrowed; clone it if you need to keep it beyond
    /// the call. Invariant at every invocation: at most one step has
    /// status `Processing`.
    fn on_update(&self, processing: &DocumentProcessing) {
        let _ = processing;
    }
}

/// A no-op implementation for callers that don't need snapshots.
///
/// This is the behaviour when no observer is configured.
pub struct NoopObserver;

impl ProcessingObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ProcessingConfig`].
pub type Observer = Arc<dyn ProcessingObserver>;
