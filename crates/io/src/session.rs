//! One comparison at a time, with its exports.
//!
//! A session owns the latest result and the staged exports built from it.
//! Starting a new comparison releases the previous exports before anything
//! new is staged; dropping the session releases whatever is left.

use std::panic::{self, AssertUnwindSafe};

use leadsync_recon::model::{Dataset, ReconciliationResult};
use leadsync_recon::{reconcile_with, ReconConfig};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::IoError;
use crate::export::ExportSet;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The engine failed unexpectedly. No partial result is kept.
    #[error("An error occurred while comparing the leads. Please check your CSV files.")]
    ComparisonFailed,
    #[error(transparent)]
    Export(#[from] IoError),
}

#[derive(Debug)]
pub struct Comparison {
    pub result: ReconciliationResult,
    /// Present only when the result has unmatched records.
    pub exports: Option<ExportSet>,
}

#[derive(Debug, Default)]
pub struct ComparisonSession {
    config: ReconConfig,
    current: Option<Comparison>,
}

impl ComparisonSession {
    pub fn new(config: ReconConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&Comparison> {
        self.current.as_ref()
    }

    /// Replace the current comparison with one over `source` and `reference`.
    ///
    /// Returns `Ok(None)` without running the engine when either dataset is
    /// empty; the previous comparison is discarded either way.
    ///
    /// A panic in the engine becomes [`SessionError::ComparisonFailed`]. The
    /// process panic hook still sees it first; the `leadsync` binary installs
    /// one that only logs at debug level.
    pub fn compare(
        &mut self,
        source: &Dataset,
        reference: &Dataset,
    ) -> Result<Option<&Comparison>, SessionError> {
        self.clear();
        if source.is_empty() || reference.is_empty() {
            return Ok(None);
        }

        let config = &self.config;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            reconcile_with(config, source, reference)
        }))
        .map_err(|_| {
            error!("reconciliation panicked");
            SessionError::ComparisonFailed
        })?;

        let exports = ExportSet::create(&result, &self.config.export)?;
        let stored = self.current.insert(Comparison { result, exports });
        Ok(Some(&*stored))
    }

    /// Drop the current comparison and release its exports.
    pub fn clear(&mut self) {
        let Some(previous) = self.current.take() else {
            return;
        };
        if let Some(exports) = previous.exports {
            if let Err(e) = exports.release() {
                warn!(error = %e, "failed to release previous exports");
            }
        }
    }
}

impl Drop for ComparisonSession {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadsync_recon::model::Record;

    fn rec(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    fn datasets(source_email: &str) -> (Dataset, Dataset) {
        let reference = Dataset::new(vec![rec(&[("Email", "a@x.com"), ("Phone", "")])]);
        let source = Dataset::new(vec![rec(&[("email", source_email), ("phone_number", "")])]);
        (source, reference)
    }

    #[test]
    fn new_comparison_releases_previous_exports() {
        let mut session = ComparisonSession::default();
        let (source, reference) = datasets("b@x.com");

        let first = session.compare(&source, &reference).unwrap().unwrap();
        let exports = first.exports.as_ref().unwrap();
        let old_paths: Vec<_> = exports.handles().iter().map(|h| h.path().to_path_buf()).collect();
        assert!(old_paths.iter().all(|p| p.exists()));

        let second = session.compare(&source, &reference).unwrap().unwrap();
        assert!(second.exports.is_some());
        assert!(old_paths.iter().all(|p| !p.exists()));
    }

    #[test]
    fn matched_result_has_no_exports() {
        let mut session = ComparisonSession::default();
        let (source, reference) = datasets("A@X.com");
        let cmp = session.compare(&source, &reference).unwrap().unwrap();
        assert!(!cmp.result.has_unmatched);
        assert!(cmp.exports.is_none());
    }

    #[test]
    fn empty_input_clears_state() {
        let mut session = ComparisonSession::default();
        let (source, reference) = datasets("b@x.com");
        session.compare(&source, &reference).unwrap();
        let staged = session.current().unwrap().exports.as_ref().unwrap().missing.path().to_path_buf();

        assert!(session.compare(&Dataset::default(), &reference).unwrap().is_none());
        assert!(session.current().is_none());
        assert!(!staged.exists());
    }

    #[test]
    fn drop_releases_exports() {
        let (source, reference) = datasets("b@x.com");
        let staged = {
            let mut session = ComparisonSession::default();
            let cmp = session.compare(&source, &reference).unwrap().unwrap();
            let path = cmp.exports.as_ref().unwrap().combined.path().to_path_buf();
            path
        };
        assert!(!staged.exists());
    }

    #[test]
    fn failure_message_is_generic() {
        assert_eq!(
            SessionError::ComparisonFailed.to_string(),
            "An error occurred while comparing the leads. Please check your CSV files."
        );
    }
}
