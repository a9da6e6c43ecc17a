//! Downloadable CSV exports of a reconciliation result.
//!
//! An [`ExportHandle`] owns a staged temporary file holding the serialized
//! dataset. The staged file lives exactly as long as the handle: it is
//! removed on [`ExportHandle::release`] or when the handle is dropped.
//! Persisting copies the content out; the staged file stays owned by the
//! handle.

use std::io::Write;
use std::path::{Path, PathBuf};

use leadsync_recon::config::ExportNames;
use leadsync_recon::model::{Dataset, ReconciliationResult};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::csv::serialize_to_delimited_text;
use crate::error::IoError;

pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

#[derive(Debug)]
pub struct ExportHandle {
    filename: String,
    staged: NamedTempFile,
    len: usize,
}

impl ExportHandle {
    /// Serialize `dataset` and stage it under a temporary path.
    pub fn create(dataset: &Dataset, filename: &str) -> Result<Self, IoError> {
        let text = serialize_to_delimited_text(dataset)?;
        let mut staged = tempfile::Builder::new()
            .prefix("leadsync-")
            .suffix(".csv")
            .tempfile()
            .map_err(IoError::Staging)?;
        staged.write_all(text.as_bytes()).map_err(IoError::Staging)?;
        staged.flush().map_err(IoError::Staging)?;
        debug!(filename, path = %staged.path().display(), bytes = text.len(), "staged export");
        Ok(Self {
            filename: filename.to_string(),
            staged,
            len: text.len(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime(&self) -> &'static str {
        CSV_MIME
    }

    /// Path of the staged file. Valid until the handle is released.
    pub fn path(&self) -> &Path {
        self.staged.path()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contents(&self) -> Result<String, IoError> {
        std::fs::read_to_string(self.path()).map_err(|source| IoError::Read {
            path: self.path().to_path_buf(),
            source,
        })
    }

    /// Copy the staged content to `dir/<filename>`, creating `dir` if needed.
    pub fn persist_into(&self, dir: &Path) -> Result<PathBuf, IoError> {
        std::fs::create_dir_all(dir).map_err(|source| IoError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let dest = dir.join(&self.filename);
        std::fs::copy(self.path(), &dest).map_err(|source| IoError::Write {
            path: dest.clone(),
            source,
        })?;
        Ok(dest)
    }

    /// Remove the staged file now, reporting failures instead of ignoring
    /// them as drop does.
    pub fn release(self) -> Result<(), IoError> {
        let filename = self.filename;
        self.staged.close().map_err(IoError::Staging)?;
        debug!(filename = %filename, "released export");
        Ok(())
    }
}

/// The two exports produced for a result with unmatched records.
#[derive(Debug)]
pub struct ExportSet {
    pub missing: ExportHandle,
    pub combined: ExportHandle,
}

impl ExportSet {
    /// `None` when every source record was found in the reference.
    pub fn create(result: &ReconciliationResult, names: &ExportNames) -> Result<Option<Self>, IoError> {
        if !result.has_unmatched {
            return Ok(None);
        }
        let missing = ExportHandle::create(&result.unmatched, &names.missing_filename)?;
        let combined = ExportHandle::create(&result.combined, &names.combined_filename)?;
        Ok(Some(Self { missing, combined }))
    }

    pub fn handles(&self) -> [&ExportHandle; 2] {
        [&self.missing, &self.combined]
    }

    pub fn persist_into(&self, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
        self.handles().iter().map(|h| h.persist_into(dir)).collect()
    }

    pub fn release(self) -> Result<(), IoError> {
        let missing = self.missing.release();
        let combined = self.combined.release();
        missing.and(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadsync_recon::model::Record;
    use leadsync_recon::reconcile;

    fn rec(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn staged_file_lives_until_release() {
        let ds = Dataset::new(vec![rec(&[("Email", "a@x.com")])]);
        let handle = ExportHandle::create(&ds, "out.csv").unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(handle.contents().unwrap(), "Email\na@x.com");
        assert_eq!(handle.mime(), CSV_MIME);
        assert_eq!(handle.len(), "Email\na@x.com".len());

        handle.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn drop_releases_staged_file() {
        let ds = Dataset::new(vec![rec(&[("Email", "a@x.com")])]);
        let path = {
            let handle = ExportHandle::create(&ds, "out.csv").unwrap();
            handle.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn persist_copies_under_filename() {
        let dir = tempfile::tempdir().unwrap();
        let ds = Dataset::new(vec![rec(&[("Email", "a@x.com")])]);
        let handle = ExportHandle::create(&ds, "combined_leads.csv").unwrap();
        let dest = handle.persist_into(&dir.path().join("nested")).unwrap();
        assert_eq!(dest.file_name().unwrap(), "combined_leads.csv");
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "Email\na@x.com");
        // Persisted copy outlives the handle
        drop(handle);
        assert!(dest.exists());
    }

    #[test]
    fn no_exports_without_unmatched() {
        let reference = Dataset::new(vec![rec(&[("Email", "a@x.com")])]);
        let source = Dataset::new(vec![rec(&[("email", "a@x.com")])]);
        let result = reconcile(&source, &reference);
        assert!(ExportSet::create(&result, &ExportNames::default()).unwrap().is_none());
    }

    #[test]
    fn export_set_names() {
        let reference = Dataset::new(vec![rec(&[("Email", "a@x.com")])]);
        let source = Dataset::new(vec![rec(&[("email", "b@x.com")])]);
        let result = reconcile(&source, &reference);
        let set = ExportSet::create(&result, &ExportNames::default()).unwrap().unwrap();
        assert_eq!(set.missing.filename(), "missing_facebook_leads.csv");
        assert_eq!(set.combined.filename(), "combined_leads.csv");
        assert_eq!(set.missing.contents().unwrap(), "email\nb@x.com");
        assert_eq!(set.combined.contents().unwrap(), "Email\na@x.com\nb@x.com");
        set.release().unwrap();
    }
}
