//! A ledger bound to a database file
//!
//! Constructed once per process. Mutations go through [`Session::update`];
//! any change schedules a debounced background save.

use std::path::Path;
use std::time::Duration;
use crate::Result;
use crate::storage::{AutoSaver, SqliteStore};
use super::{Ledger, LedgerState};

pub struct Session {
    ledger: Ledger,
    saver: AutoSaver<LedgerState>,
}

impl Session {
    /// Load the ledger from `path` and start the background writer
    pub fn open(path: &Path, debounce: Duration) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        let ledger = Ledger::load(&store)?;
        let saver = AutoSaver::spawn(store, debounce);
        tracing::debug!("Session opened on {}", path.display());
        Ok(Self { ledger, saver })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run a mutation; if it changed anything, schedule a save
    pub fn update<T>(&mut self, f: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let before = self.ledger.revision();
        let result = f(&mut self.ledger);
        if self.ledger.revision() != before {
            self.saver.schedule(self.ledger.state().clone());
        }
        result
    }

    /// Block until every scheduled change is on disk
    pub fn flush(&self) {
        self.saver.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let location_id = {
            let mut session = Session::open(&path, Duration::from_secs(30)).unwrap();
            session
                .update(|ledger| Ok(ledger.add_location(Location::new("Jakarta", "Jl. Sudirman 1"))))
                .unwrap()
        };

        let session = Session::open(&path, Duration::from_secs(30)).unwrap();
        assert_eq!(session.ledger().location(&location_id).unwrap().name, "Jakarta");
    }

    #[test]
    fn test_flush_writes_before_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let mut session = Session::open(&path, Duration::from_secs(30)).unwrap();
        session.update(|ledger| Ok(ledger.add_category("Drone"))).unwrap();
        session.flush();

        let store = SqliteStore::open(&path).unwrap();
        let loaded = Ledger::load(&store).unwrap();
        assert!(loaded.categories().iter().any(|c| c == "Drone"));
    }

    #[test]
    fn test_failed_update_schedules_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        let mut session = Session::open(&path, Duration::from_secs(30)).unwrap();
        let result = session.update(|ledger| ledger.delete_room("ghost"));
        assert!(result.is_err());
        session.flush();

        let store = SqliteStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
