//! File-backed session storage.
//!
//! Entries live in one JSON object written to [`SESSION_FILE_NAME`] inside a
//! capability-scoped directory. Writes go to a staging file first and are
//! renamed into place so a crash never leaves a half-written session.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{SessionStorage, SessionStorageError};

/// Name of the session document inside the storage directory.
pub const SESSION_FILE_NAME: &str = "session.json";
const STAGING_FILE_NAME: &str = ".session.json.tmp";

type Entries = BTreeMap<String, String>;

/// Session entries persisted across process runs.
#[derive(Debug)]
pub struct FileSessionStorage {
    dir: Dir,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    /// Open (creating if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStorageError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, SessionStorageError> {
        let directory = directory.as_ref();
        Dir::create_ambient_dir_all(directory, ambient_authority())
            .map_err(|error| io_error(directory, &error))?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority())
            .map_err(|error| io_error(directory, &error))?;
        Ok(Self {
            dir,
            path: directory.join(SESSION_FILE_NAME),
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the session document, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, SessionStorageError> {
        let raw = match self.dir.read_to_string(SESSION_FILE_NAME) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(error) => return Err(io_error(&self.path, &error)),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|error| {
            SessionStorageError::corrupt(format!("{}: {error}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), SessionStorageError> {
        let document = serde_json::to_vec_pretty(entries).map_err(|error| {
            SessionStorageError::corrupt(format!("{}: {error}", self.path.display()))
        })?;
        self.dir
            .write(STAGING_FILE_NAME, document)
            .map_err(|error| io_error(&self.path, &error))?;
        self.dir
            .rename(STAGING_FILE_NAME, &self.dir, SESSION_FILE_NAME)
            .map_err(|error| io_error(&self.path, &error))?;
        debug!(path = %self.path.display(), entries = entries.len(), "session written");
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut Entries) -> bool) -> Result<(), SessionStorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        if change(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

fn io_error(path: &Path, error: &io::Error) -> SessionStorageError {
    SessionStorageError::io(format!("{}: {error}", path.display()))
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionStorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}
