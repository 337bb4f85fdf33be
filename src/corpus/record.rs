use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rotation progress for one sample file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub file: String,
    /// Next unread line of the file.
    pub line: usize,
    pub finished: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_served: Option<DateTime<Utc>>,
}

impl CorpusRecord {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: 0,
            finished: false,
            last_served: None,
        }
    }
}

/// Where a file stands in the rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileState {
    Unseen,
    Active { line: usize },
    Finished,
}

impl FileState {
    pub fn start_line(&self) -> Option<usize> {
        match self {
            FileState::Unseen => Some(0),
            FileState::Active { line } => Some(*line),
            FileState::Finished => None,
        }
    }
}

/// Full persisted rotation state. At most one record per file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default, alias = "paragraphs")]
    pub records: Vec<CorpusRecord>,
}

impl Corpus {
    pub fn get(&self, file: &str) -> Option<&CorpusRecord> {
        self.records.iter().find(|r| r.file == file)
    }

    pub fn state_of(&self, file: &str) -> FileState {
        match self.get(file) {
            None => FileState::Unseen,
            Some(r) if r.finished => FileState::Finished,
            Some(r) => FileState::Active { line: r.line },
        }
    }

    /// Record for `file`, appended in first-served order if missing.
    pub fn record_mut(&mut self, file: &str) -> &mut CorpusRecord {
        let idx = match self.records.iter().position(|r| r.file == file) {
            Some(idx) => idx,
            None => {
                self.records.push(CorpusRecord::new(file));
                self.records.len() - 1
            }
        };
        &mut self.records[idx]
    }

    pub fn finish(&mut self, file: &str) {
        self.record_mut(file).finished = true;
    }

    /// First file name that appears in more than one record.
    pub fn duplicate_file(&self) -> Option<&str> {
        self.records.iter().enumerate().find_map(|(i, r)| {
            self.records[..i]
                .iter()
                .any(|earlier| earlier.file == r.file)
                .then_some(r.file.as_str())
        })
    }

    pub fn finished_count(&self) -> usize {
        self.records.iter().filter(|r| r.finished).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_of_tracks_record_lifecycle() {
        let mut corpus = Corpus::default();
        assert_eq!(corpus.state_of("a.txt"), FileState::Unseen);

        corpus.record_mut("a.txt").line = 15;
        assert_eq!(corpus.state_of("a.txt"), FileState::Active { line: 15 });

        corpus.finish("a.txt");
        assert_eq!(corpus.state_of("a.txt"), FileState::Finished);
        assert_eq!(FileState::Finished.start_line(), None);
    }

    #[test]
    fn test_record_mut_does_not_duplicate() {
        let mut corpus = Corpus::default();
        corpus.record_mut("a.txt");
        corpus.record_mut("b.txt");
        corpus.record_mut("a.txt").line = 3;
        assert_eq!(corpus.records.len(), 2);
        assert_eq!(corpus.records[0].line, 3);
        assert!(corpus.duplicate_file().is_none());
    }

    #[test]
    fn test_duplicate_file_detected() {
        let corpus = Corpus {
            records: vec![
                CorpusRecord::new("a.txt"),
                CorpusRecord::new("b.txt"),
                CorpusRecord::new("a.txt"),
            ],
        };
        assert_eq!(corpus.duplicate_file(), Some("a.txt"));
    }

    #[test]
    fn test_legacy_paragraphs_key_deserializes() {
        let json = r#"{"paragraphs":[{"file":"a.go","line":30,"finished":false}]}"#;
        let corpus: Corpus = serde_json::from_str(json).unwrap();
        assert_eq!(corpus.state_of("a.go"), FileState::Active { line: 30 });
        assert_eq!(corpus.records[0].last_served, None);
    }

    #[test]
    fn test_unserved_timestamp_is_omitted() {
        let corpus = Corpus {
            records: vec![CorpusRecord::new("a.txt")],
        };
        let json = serde_json::to_string(&corpus).unwrap();
        assert!(!json.contains("last_served"));
        assert!(json.contains("\"records\""));
    }
}
