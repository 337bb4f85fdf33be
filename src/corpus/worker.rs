use std::sync::mpsc;
use std::thread;

use tracing::{debug, error, info};

use crate::corpus::error::CorpusError;
use crate::corpus::service::CorpusService;
use crate::corpus::ParagraphSource;

type Reply = mpsc::Sender<Result<String, CorpusError>>;

/// Dedicated thread that owns a [`CorpusService`]. Requests from every
/// handle are served one at a time, so the record file has a single writer.
pub struct CorpusWorker {
    thread: thread::JoinHandle<()>,
}

impl CorpusWorker {
    pub fn spawn(mut service: CorpusService) -> (Self, CorpusHandle) {
        let (tx, rx) = mpsc::channel::<Reply>();

        let thread = thread::spawn(move || {
            info!("corpus worker started");
            while let Ok(reply) = rx.recv() {
                let result = service.next_chunk();
                if let Err(e) = &result {
                    debug!(error = %e, "chunk request failed");
                }
                // Caller may have given up waiting.
                let _ = reply.send(result);
            }
            info!("corpus worker stopped");
        });

        (Self { thread }, CorpusHandle { tx })
    }

    /// Wait for the worker to exit. It exits once every handle is dropped.
    pub fn join(self) -> Result<(), CorpusError> {
        wait(self.thread)
    }
}

fn wait(thread: thread::JoinHandle<()>) -> Result<(), CorpusError> {
    thread.join().map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(%message, "corpus worker panicked");
        CorpusError::WorkerGone
    })
}

/// Cloneable client of a [`CorpusWorker`].
#[derive(Clone)]
pub struct CorpusHandle {
    tx: mpsc::Sender<Reply>,
}

impl CorpusHandle {
    pub fn next_chunk(&self) -> Result<String, CorpusError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(reply_tx)
            .map_err(|_| CorpusError::WorkerGone)?;
        reply_rx.recv().map_err(|_| CorpusError::WorkerGone)?
    }
}

impl ParagraphSource for CorpusHandle {
    fn next_paragraph(&mut self) -> Result<String, CorpusError> {
        self.next_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusChooser;
    use crate::store::RecordStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_handle_serves_until_exhausted_then_worker_stops() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let store = RecordStore::new(dir.path().join(".record.json"));
        let service = CorpusService::open(CorpusChooser::new(dir.path()), store).unwrap();

        let (worker, handle) = CorpusWorker::spawn(service);
        assert_eq!(handle.next_chunk().unwrap(), "one\ntwo\n");
        assert!(handle.next_chunk().unwrap_err().is_exhausted());

        drop(handle);
        assert!(worker.join().is_ok());
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let thread: thread::JoinHandle<()> = thread::spawn(|| panic!("record file vanished"));
        assert!(matches!(wait(thread), Err(CorpusError::WorkerGone)));
    }
}
