//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the orchestrator works through the input directory. The CLI uses it to
//! print one coloured result line per document; library users can forward
//! the events anywhere without the orchestrator knowing how.
//!
//! Documents are converted one at a time, so events for a run always arrive
//! in order: `on_run_start`, then for each document `on_document_start`
//! followed by `on_document_complete`, then `on_run_complete`.

use crate::output::{ConversionOutcome, DocumentKey, RunStats};
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the input directory was listed.
    ///
    /// # Arguments
    /// * `total_documents` — number of PDF candidates found
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before a document's completion check.
    ///
    /// # Arguments
    /// * `key`   — document key (file name without extension)
    /// * `index` — 1-indexed position in listing order
    /// * `total` — number of candidates in the run
    fn on_document_start(&self, key: &DocumentKey, index: usize, total: usize) {
        let _ = (key, index, total);
    }

    /// Called with the terminal outcome of a document.
    fn on_document_complete(&self, key: &DocumentKey, outcome: ConversionOutcome) {
        let _ = (key, outcome);
    }

    /// Called once after every candidate has been attempted.
    fn on_run_complete(&self, stats: &RunStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<String>>,
    }

    impl BatchProgressCallback for RecordingCallback {
        fn on_run_start(&self, total_documents: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {total_documents}"));
        }

        fn on_document_complete(&self, key: &DocumentKey, outcome: ConversionOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{key} {outcome}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let key = DocumentKey::from_path(std::path::Path::new("a.pdf")).unwrap();
        cb.on_run_start(2);
        cb.on_document_start(&key, 1, 2);
        cb.on_document_complete(&key, ConversionOutcome::Failed);
        cb.on_run_complete(&RunStats::default());
    }

    #[test]
    fn overridden_methods_receive_events() {
        let cb = RecordingCallback::default();
        let key = DocumentKey::from_path(std::path::Path::new("/in/report.pdf")).unwrap();
        cb.on_run_start(1);
        cb.on_document_start(&key, 1, 1);
        cb.on_document_complete(&key, ConversionOutcome::Succeeded);
        assert_eq!(
            *cb.events.lock().unwrap(),
            vec!["start 1".to_string(), "report succeeded".to_string()]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
    }
}
