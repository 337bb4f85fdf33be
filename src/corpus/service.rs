use tracing::warn;

use crate::corpus::chooser::CorpusChooser;
use crate::corpus::error::CorpusError;
use crate::corpus::record::Corpus;
use crate::corpus::ParagraphSource;
use crate::store::RecordStore;

/// Chooser, record store and in-memory corpus owned as one unit, so each
/// selection is a single read-modify-persist step.
pub struct CorpusService {
    chooser: CorpusChooser,
    store: RecordStore,
    corpus: Corpus,
}

impl CorpusService {
    /// Load persisted records and bind them to `chooser`.
    pub fn open(chooser: CorpusChooser, store: RecordStore) -> Result<Self, CorpusError> {
        let corpus = store.load()?;
        Ok(Self {
            chooser,
            store,
            corpus,
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn chooser(&self) -> &CorpusChooser {
        &self.chooser
    }

    /// Select the next chunk and persist the updated records.
    ///
    /// The selection runs on a copy of the corpus that only replaces the
    /// in-memory state once it is saved, so a failed save serves the same
    /// chunk again on the next call. Exhaustion is persisted too, since the
    /// scan may have finalized records on the way.
    pub fn next_chunk(&mut self) -> Result<String, CorpusError> {
        let mut working = self.corpus.clone();
        match self.chooser.choose(&mut working) {
            Ok(chunk) => {
                self.store.save(&working)?;
                self.corpus = working;
                Ok(chunk)
            }
            Err(CorpusError::Exhausted) => {
                if let Err(e) = self.store.save(&working) {
                    warn!(error = %e, "failed to persist exhausted corpus");
                }
                self.corpus = working;
                Err(CorpusError::Exhausted)
            }
            Err(e) => Err(e),
        }
    }
}

impl ParagraphSource for CorpusService {
    fn next_paragraph(&mut self) -> Result<String, CorpusError> {
        self.next_chunk()
    }
}
