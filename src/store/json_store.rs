use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::corpus::{Corpus, CorpusError};

/// Whole-document JSON persistence for the rotation records.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record set. A missing file is an empty corpus; a file that
    /// exists but cannot be parsed is an error rather than a silent reset.
    pub fn load(&self) -> Result<Corpus, CorpusError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no record file yet");
                return Ok(Corpus::default());
            }
            Err(e) => return Err(CorpusError::io(&self.path, e)),
        };

        let corpus: Corpus =
            serde_json::from_str(&content).map_err(|source| CorpusError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        if let Some(file) = corpus.duplicate_file() {
            return Err(CorpusError::DuplicateRecord {
                path: self.path.clone(),
                file: file.to_string(),
            });
        }

        info!(
            path = %self.path.display(),
            records = corpus.records.len(),
            finished = corpus.finished_count(),
            "loaded corpus records"
        );
        Ok(corpus)
    }

    /// Rewrite the full record set: stage to `.tmp`, sync, then rename over
    /// the old file.
    pub fn save(&self, corpus: &Corpus) -> Result<(), CorpusError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let json =
            serde_json::to_string_pretty(corpus).map_err(|e| self.encode_failure(e))?;

        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(CorpusError::io(&self.path, e));
        }

        debug!(
            path = %self.path.display(),
            records = corpus.records.len(),
            "saved corpus records"
        );
        Ok(())
    }

    /// Encoding problems are write failures, not a corrupt file on disk.
    fn encode_failure(&self, source: serde_json::Error) -> CorpusError {
        CorpusError::io(&self.path, io::Error::other(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusRecord, FileState};
    use chrono::Utc;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("record.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = make_test_store();
        let corpus = store.load().unwrap();
        assert!(corpus.records.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = make_test_store();
        let mut corpus = Corpus::default();
        corpus.record_mut("a.txt").line = 15;
        corpus.record_mut("b.txt").finished = true;
        corpus.record_mut("c.txt").last_served = Some(Utc::now());

        store.save(&corpus).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, corpus);
        assert_eq!(loaded.state_of("a.txt"), FileState::Active { line: 15 });
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("state").join("nested").join("record.json"));
        store.save(&Corpus::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save(&Corpus::default()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_malformed_file_is_rejected_and_kept() {
        let (_dir, store) = make_test_store();
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, CorpusError::Malformed { .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_duplicate_records_are_rejected() {
        let (_dir, store) = make_test_store();
        let corpus = Corpus {
            records: vec![CorpusRecord::new("a.txt"), CorpusRecord::new("a.txt")],
        };
        fs::write(store.path(), serde_json::to_string(&corpus).unwrap()).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateRecord { ref file, .. } if file == "a.txt"));
    }

    #[test]
    fn test_encode_failure_is_not_reported_as_malformed() {
        let (_dir, store) = make_test_store();
        let source = serde_json::from_str::<Corpus>("{").unwrap_err();
        let err = store.encode_failure(source);
        assert!(matches!(err, CorpusError::Io { .. }));
        assert!(!err.to_string().contains("malformed"));
    }

    #[test]
    fn test_save_overwrites_whole_document() {
        let (_dir, store) = make_test_store();
        let mut corpus = Corpus::default();
        corpus.record_mut("a.txt");
        corpus.record_mut("b.txt");
        store.save(&corpus).unwrap();

        corpus.records.remove(0);
        store.save(&corpus).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].file, "b.txt");
    }
}
