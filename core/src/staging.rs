//! Client-side staging area for files awaiting upload.
//!
//! A [`StagedBatch`] holds files in insertion order and guarantees that
//! no two entries share an identity key. Validation (extension allow-list
//! and size ceiling) happens here, before anything touches the network.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::{StageError, StageResult};
use crate::format::format_file_size;

/// Metadata of a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type reported by the host, possibly empty.
    pub mime: String,
    /// Last modification time in epoch milliseconds, when known.
    pub last_modified: Option<i64>,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime: String::new(),
            last_modified: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn with_last_modified(mut self, millis: i64) -> Self {
        self.last_modified = Some(millis);
        self
    }

    /// Lowercase extension after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() && ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    /// Identity used to reject duplicate staging.
    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            size: self.size,
            last_modified: self.last_modified,
        }
    }
}

/// Identity key of a staged file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
    pub name: String,
    pub size: u64,
    pub last_modified: Option<i64>,
}

/// A staged file: metadata plus the host handle needed to send it.
#[derive(Debug, Clone)]
pub struct StagedFile<H> {
    pub meta: FileMeta,
    pub handle: H,
}

impl<H> StagedFile<H> {
    pub fn new(meta: FileMeta, handle: H) -> Self {
        Self { meta, handle }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Checks the allow-list and size ceiling for one file.
pub fn validate(meta: &FileMeta, config: &PipelineConfig) -> StageResult<()> {
    let allowed = meta
        .extension()
        .map(|ext| config.allowed_extensions.iter().any(|a| *a == ext))
        .unwrap_or(false);
    if !allowed {
        return Err(StageError::InvalidType {
            name: meta.name.clone(),
            allowed: config.allowed_label(),
        });
    }

    if meta.size > config.max_file_size {
        return Err(StageError::TooLarge {
            name: meta.name.clone(),
            size: meta.size,
            limit: config.max_file_size,
            limit_label: format_file_size(config.max_file_size),
        });
    }

    Ok(())
}

/// Result of one `stage` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Names of the files appended, in order.
    pub added: Vec<String>,
    pub rejected: Vec<StageError>,
    /// Batch length after the call.
    pub staged_count: usize,
}

impl StageReport {
    /// Candidates were offered but the batch is still empty.
    pub fn nothing_usable(&self) -> bool {
        self.added.is_empty() && !self.rejected.is_empty() && self.staged_count == 0
    }
}

/// Ordered, duplicate-free list of staged files.
#[derive(Debug, Clone)]
pub struct StagedBatch<H> {
    files: Vec<StagedFile<H>>,
}

impl<H> Default for StagedBatch<H> {
    fn default() -> Self {
        Self { files: Vec::new() }
    }
}

impl<H> StagedBatch<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[StagedFile<H>] {
        &self.files
    }

    pub fn contains(&self, key: &FileKey) -> bool {
        self.files.iter().any(|f| f.meta.key() == *key)
    }

    /// Total size of all staged files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.meta.size).sum()
    }

    /// Validates and appends each candidate, collecting rejections.
    pub fn stage<I>(&mut self, candidates: I, config: &PipelineConfig) -> StageReport
    where
        I: IntoIterator<Item = StagedFile<H>>,
    {
        let mut report = StageReport::default();

        for candidate in candidates {
            let outcome = if self.contains(&candidate.meta.key()) {
                Err(StageError::Duplicate {
                    name: candidate.meta.name.clone(),
                })
            } else {
                validate(&candidate.meta, config)
            };

            match outcome {
                Ok(()) => {
                    log::debug!("staged {} ({} bytes)", candidate.meta.name, candidate.meta.size);
                    report.added.push(candidate.meta.name.clone());
                    self.files.push(candidate);
                }
                Err(err) => {
                    log::debug!("rejected {}: {}", err.file_name(), err);
                    report.rejected.push(err);
                }
            }
        }

        report.staged_count = self.files.len();
        report
    }

    /// Removes the file at `index`; `None` when out of range.
    pub fn unstage(&mut self, index: usize) -> Option<StagedFile<H>> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Drops every staged file whose key is in `keys`.
    pub fn remove_keys(&mut self, keys: &[FileKey]) {
        self.files.retain(|f| !keys.contains(&f.meta.key()));
    }
}

impl<H: Clone> StagedBatch<H> {
    /// Copy of the current files, taken before a submission starts.
    pub fn snapshot(&self) -> Vec<StagedFile<H>> {
        self.files.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, size: u64) -> StagedFile<()> {
        StagedFile::new(FileMeta::new(name, size), ())
    }

    #[test]
    fn test_extension_parsing() {
        assert_eq!(FileMeta::new("Report.PDF", 1).extension().as_deref(), Some("pdf"));
        assert_eq!(FileMeta::new("archive.tar.txt", 1).extension().as_deref(), Some("txt"));
        assert_eq!(FileMeta::new("README", 1).extension(), None);
    }

    #[test]
    fn test_rejects_disallowed_extensions() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();

        let report = batch.stage(
            vec![candidate("photo.png", 10), candidate("script.exe", 10), candidate("noext", 10)],
            &config,
        );

        assert!(batch.is_empty());
        assert_eq!(report.rejected.len(), 3);
        assert!(report
            .rejected
            .iter()
            .all(|e| matches!(e, StageError::InvalidType { .. })));
        assert!(report.nothing_usable());
    }

    #[test]
    fn test_rejects_oversized_files() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();
        batch.stage(vec![candidate("keep.txt", 5)], &config);

        let report = batch.stage(vec![candidate("huge.pdf", config.max_file_size + 1)], &config);

        assert_eq!(batch.len(), 1);
        assert!(matches!(report.rejected[0], StageError::TooLarge { .. }));
        assert!(!report.nothing_usable());
    }

    #[test]
    fn test_size_at_limit_is_accepted() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();
        let report = batch.stage(vec![candidate("edge.docx", config.max_file_size)], &config);
        assert_eq!(report.added, vec!["edge.docx".to_string()]);
    }

    #[test]
    fn test_duplicates_within_one_call() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();

        let report = batch.stage(
            vec![candidate("a.pdf", 10 * 1024), candidate("a.pdf", 10 * 1024)],
            &config,
        );

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.files()[0].name(), "a.pdf");
        assert_eq!(report.rejected, vec![StageError::Duplicate { name: "a.pdf".into() }]);
    }

    #[test]
    fn test_duplicate_key_includes_last_modified() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();
        let first = StagedFile::new(FileMeta::new("a.pdf", 10).with_last_modified(1), ());
        let second = StagedFile::new(FileMeta::new("a.pdf", 10).with_last_modified(2), ());

        batch.stage(vec![first, second], &config);

        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_unstage_out_of_range_is_noop() {
        let config = PipelineConfig::default();
        let mut batch = StagedBatch::new();
        batch.stage(vec![candidate("a.pdf", 1), candidate("b.txt", 2)], &config);

        assert!(batch.unstage(5).is_none());
        assert_eq!(batch.len(), 2);

        let removed = batch.unstage(0).map(|f| f.meta.name);
        assert_eq!(removed.as_deref(), Some("a.pdf"));
        assert_eq!(batch.files()[0].name(), "b.txt");
        assert_eq!(batch.total_size(), 2);
    }
}
