//! Debounced background writer
//!
//! Every mutation hands the writer a fresh snapshot. The writer waits until
//! no new snapshot has arrived for the debounce window, then writes only the
//! latest one. Write failures are logged and dropped; callers never block on
//! I/O unless they ask for [`AutoSaver::flush`].

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use super::SqliteStore;
use crate::Result;

/// Quiet period before a scheduled snapshot is written
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Something the writer thread knows how to persist
pub trait Snapshot: Send + 'static {
    fn write_to(&self, store: &mut SqliteStore) -> Result<()>;
}

enum SaveMessage<S> {
    Snapshot(S),
    Flush(Sender<()>),
    Exit,
}

/// Handle to the writer thread. Dropping it writes anything pending.
pub struct AutoSaver<S: Snapshot> {
    tx: Sender<SaveMessage<S>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl<S: Snapshot> AutoSaver<S> {
    /// Start the writer thread; it takes ownership of `store`
    pub fn spawn(store: SqliteStore, debounce: Duration) -> Self {
        let (tx, rx) = channel::unbounded::<SaveMessage<S>>();
        let handle = thread::spawn(move || run_writer(store, rx, debounce));
        Self {
            tx,
            handle: Some(handle),
        }
    }

    /// Replace the pending snapshot and restart the debounce window
    pub fn schedule(&self, snapshot: S) {
        if self.tx.send(SaveMessage::Snapshot(snapshot)).is_err() {
            tracing::error!("Autosave writer is gone; snapshot dropped");
        }
    }

    /// Write any pending snapshot now and wait for it to land
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = channel::bounded(1);
        if self.tx.send(SaveMessage::Flush(ack_tx)).is_err() {
            tracing::error!("Autosave writer is gone; nothing flushed");
            return;
        }
        let _ = ack_rx.recv();
    }
}

impl<S: Snapshot> Drop for AutoSaver<S> {
    fn drop(&mut self) {
        let _ = self.tx.send(SaveMessage::Exit);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Autosave writer panicked");
            }
        }
    }
}

fn run_writer<S: Snapshot>(mut store: SqliteStore, rx: Receiver<SaveMessage<S>>, debounce: Duration) {
    let mut pending: Option<S> = None;

    loop {
        let msg = if pending.is_some() {
            match rx.recv_timeout(debounce) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => {
                    write_pending(&mut store, &mut pending);
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    write_pending(&mut store, &mut pending);
                    break;
                }
            }
        } else {
            match rx.recv() {
                Ok(msg) => msg,
                Err(_) => break,
            }
        };

        match msg {
            SaveMessage::Snapshot(snapshot) => pending = Some(snapshot),
            SaveMessage::Flush(ack) => {
                write_pending(&mut store, &mut pending);
                let _ = ack.send(());
            }
            SaveMessage::Exit => {
                write_pending(&mut store, &mut pending);
                break;
            }
        }
    }

    tracing::debug!("Autosave writer stopped");
}

fn write_pending<S: Snapshot>(store: &mut SqliteStore, pending: &mut Option<S>) {
    if let Some(snapshot) = pending.take() {
        match snapshot.write_to(store) {
            Ok(()) => tracing::debug!("Ledger snapshot written"),
            Err(e) => tracing::error!("Failed to persist ledger snapshot: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counted {
        value: u32,
        writes: Arc<AtomicUsize>,
    }

    impl Snapshot for Counted {
        fn write_to(&self, store: &mut SqliteStore) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            store.set_item("counter", &self.value.to_string())
        }
    }

    #[test]
    fn test_burst_is_coalesced_and_written_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.db");
        let writes = Arc::new(AtomicUsize::new(0));

        {
            let saver = AutoSaver::spawn(SqliteStore::open(&path).unwrap(), Duration::from_secs(30));
            for value in 1..=5 {
                saver.schedule(Counted { value, writes: writes.clone() });
            }
        }

        assert_eq!(writes.load(Ordering::SeqCst), 1);
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_item("counter").unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_flush_writes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.db");
        let writes = Arc::new(AtomicUsize::new(0));

        let saver = AutoSaver::spawn(SqliteStore::open(&path).unwrap(), Duration::from_secs(30));
        saver.schedule(Counted { value: 7, writes: writes.clone() });
        saver.flush();

        assert_eq!(writes.load(Ordering::SeqCst), 1);
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_item("counter").unwrap().as_deref(), Some("7"));

        // Nothing pending: a second flush is a no-op
        saver.flush();
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_debounce_window_elapses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autosave.db");
        let writes = Arc::new(AtomicUsize::new(0));

        let saver = AutoSaver::spawn(SqliteStore::open(&path).unwrap(), Duration::from_millis(20));
        saver.schedule(Counted { value: 1, writes: writes.clone() });
        thread::sleep(Duration::from_millis(500));

        assert_eq!(writes.load(Ordering::SeqCst), 1);
        drop(saver);
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }
}
