pub mod chooser;
pub mod error;
pub mod record;
#[cfg(feature = "network")]
pub mod remote;
pub mod service;
pub mod worker;

pub use chooser::CorpusChooser;
pub use error::CorpusError;
pub use record::{Corpus, CorpusRecord, FileState};
pub use service::CorpusService;
pub use worker::{CorpusHandle, CorpusWorker};

/// Anything that can hand a typing session its next paragraph.
pub trait ParagraphSource {
    fn next_paragraph(&mut self) -> Result<String, CorpusError>;
}

/// Serves one fixed paragraph, then reports exhaustion.
pub struct FixedText {
    text: Option<String>,
}

impl FixedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl ParagraphSource for FixedText {
    fn next_paragraph(&mut self) -> Result<String, CorpusError> {
        self.text.take().ok_or(CorpusError::Exhausted)
    }
}
