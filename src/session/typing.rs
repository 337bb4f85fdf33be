use thiserror::Error;
use tracing::warn;

use crate::corpus::{CorpusError, ParagraphSource};
use crate::session::tokenize::{Span, fields};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("can not advance beyond the last word")]
    AtLastWord,
    #[error("session has no words")]
    NoWords,
}

/// Progress through one paragraph, one word at a time.
#[derive(Debug, Default)]
pub struct TypingSession {
    paragraph: String,
    words: Vec<Span>,
    word_index: usize,
    mistyped: bool,
    done: bool,
}

impl TypingSession {
    pub fn new(paragraph: impl Into<String>) -> Self {
        let mut session = Self::default();
        session.load(paragraph.into());
        session
    }

    /// Start over with the next paragraph from `source`.
    ///
    /// On failure the session is left empty (no current word) and the error
    /// is handed back for the caller to report.
    pub fn init(&mut self, source: &mut dyn ParagraphSource) -> Result<(), CorpusError> {
        match source.next_paragraph() {
            Ok(text) => {
                self.load(text);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "no paragraph to type");
                self.load(String::new());
                Err(e)
            }
        }
    }

    fn load(&mut self, paragraph: String) {
        self.words = fields(&paragraph);
        self.paragraph = paragraph;
        self.word_index = 0;
        self.mistyped = false;
        self.done = false;
    }

    pub fn paragraph(&self) -> &str {
        &self.paragraph
    }

    pub fn words(&self) -> &[Span] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words
            .get(self.word_index)
            .map(|span| span.slice(&self.paragraph))
    }

    pub fn is_last_word(&self) -> bool {
        !self.words.is_empty() && self.word_index == self.words.len() - 1
    }

    /// Move to the next word. `AtLastWord` means the paragraph is fully typed.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.words.is_empty() {
            return Err(SessionError::NoWords);
        }
        if self.word_index >= self.words.len() - 1 {
            return Err(SessionError::AtLastWord);
        }
        self.word_index += 1;
        Ok(())
    }

    pub fn count_done_words(&self) -> usize {
        self.word_index
    }

    /// Characters in the words before the current one, whitespace excluded.
    pub fn chars_upto_current(&self) -> usize {
        self.words[..self.word_index.min(self.words.len())]
            .iter()
            .map(|span| span.char_len(&self.paragraph))
            .sum()
    }

    pub fn set_mistyped(&mut self, mistyped: bool) {
        self.mistyped = mistyped;
    }

    pub fn is_mistyped(&self) -> bool {
        self.mistyped
    }

    /// Paragraph text before, at and after the current word.
    pub fn segments(&self) -> Option<(&str, &str, &str)> {
        let span = self.words.get(self.word_index)?;
        Some((
            &self.paragraph[..span.start],
            span.slice(&self.paragraph),
            &self.paragraph[span.end..],
        ))
    }

    /// Mark the session as done. Returns true only for the call that did it.
    pub fn reset(&mut self) -> bool {
        !std::mem::replace(&mut self.done, true)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}
