use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::corpus::error::CorpusError;
use crate::corpus::record::Corpus;

pub const DEFAULT_CHUNK_LINES: usize = 15;

/// Walks a directory of sample files in name order, serving one chunk of
/// lines per call and recording how far into each file it got.
#[derive(Clone, Debug)]
pub struct CorpusChooser {
    sample_dir: PathBuf,
    chunk_lines: usize,
}

impl CorpusChooser {
    pub fn new(sample_dir: impl Into<PathBuf>) -> Self {
        Self {
            sample_dir: sample_dir.into(),
            chunk_lines: DEFAULT_CHUNK_LINES,
        }
    }

    pub fn with_chunk_lines(mut self, chunk_lines: usize) -> Self {
        self.chunk_lines = chunk_lines.max(1);
        self
    }

    pub fn sample_dir(&self) -> &Path {
        &self.sample_dir
    }

    pub fn chunk_lines(&self) -> usize {
        self.chunk_lines
    }

    /// Serve the next unread chunk, updating `corpus` in place.
    ///
    /// Records are only touched after a file was read, so an I/O
    /// failure leaves that file's progress untouched.
    pub fn choose(&self, corpus: &mut Corpus) -> Result<String, CorpusError> {
        let files = self.list_files()?;

        for name in &files {
            let start = match corpus.state_of(name).start_line() {
                Some(start) => start,
                None => continue,
            };

            let path = self.sample_dir.join(name);
            let bytes = fs::read(&path).map_err(|e| CorpusError::io(&path, e))?;
            let content = String::from_utf8_lossy(&bytes);
            let total = content.lines().count();

            if total < self.chunk_lines {
                let record = corpus.record_mut(name);
                record.finished = true;
                record.line = total;
                record.last_served = Some(Utc::now());
                info!(file = %name, lines = total, "serving short file whole");
                return Ok(content.into_owned());
            }

            if start >= total {
                debug!(file = %name, start, total, "file fully served, skipping");
                corpus.finish(name);
                continue;
            }

            let end = start + self.chunk_lines.min(total - start);
            let chunk = content
                .lines()
                .skip(start)
                .take(end - start)
                .collect::<Vec<_>>()
                .join("\n");
            let record = corpus.record_mut(name);
            record.line = end;
            record.finished = end >= total;
            record.last_served = Some(Utc::now());
            info!(
                file = %name,
                start,
                end,
                finished = record.finished,
                "serving chunk"
            );
            return Ok(chunk);
        }

        Err(CorpusError::Exhausted)
    }

    /// Regular, non-hidden files in the sample directory, sorted by name.
    fn list_files(&self) -> Result<Vec<String>, CorpusError> {
        let entries =
            fs::read_dir(&self.sample_dir).map_err(|e| CorpusError::io(&self.sample_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CorpusError::io(&self.sample_dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| CorpusError::io(entry.path(), e))?
                .is_file();
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_file && !name.starts_with('.') {
                names.push(name);
            }
        }

        if names.is_empty() {
            return Err(CorpusError::NoFiles {
                dir: self.sample_dir.clone(),
            });
        }
        names.sort();
        Ok(names)
    }
}
