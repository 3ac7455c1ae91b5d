use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Entry, User};

pub const ENTRY_HEADER: [&str; 5] = ["date", "entry_type", "description", "amount", "editor"];
pub const USER_HEADER: [&str; 4] = ["first_name", "last_name", "username", "password"];

/// Append-only storage for the two ledger tables. Business logic only talks
/// to this trait, so the backing store can change without touching it.
pub trait RecordStore: Send + Sync {
    fn append_entry(&self, entry: &Entry) -> StoreResult<()>;
    fn read_entries(&self) -> StoreResult<Vec<Entry>>;
    fn append_user(&self, user: &User) -> StoreResult<()>;
    fn read_users(&self) -> StoreResult<Vec<User>>;
}

/// A single CSV file with a fixed header row.
#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    header: &'static [&'static str],
}

impl CsvTable {
    pub fn new(path: PathBuf, header: &'static [&'static str]) -> Self {
        Self { path, header }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header if it does not exist yet.
    pub fn init(&self) -> StoreResult<()> {
        let writer = self.open_writer()?;
        writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;
        Ok(())
    }

    pub fn append<T: Serialize>(&self, row: &T) -> StoreResult<()> {
        let mut writer = self.open_writer()?;
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }

    /// Full scan in file order. Columns are matched by header name.
    /// Rows that fail to parse are logged and skipped; IO faults are errors.
    pub fn read_all<T: DeserializeOwned>(&self) -> StoreResult<Vec<T>> {
        let file = File::open(&self.path).map_err(|e| self.map_io(e))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut rows = Vec::new();
        for result in reader.deserialize::<T>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => tracing::warn!("Skipping unreadable row in {}: {}", self.path.display(), e),
            }
        }
        Ok(rows)
    }

    // Opens for append; the header goes in only while the file is empty.
    fn open_writer(&self) -> StoreResult<csv::Writer<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.map_io(e))?;
        let is_empty = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_empty {
            tracing::debug!("Writing header to {}", self.path.display());
            writer.write_record(self.header)?;
        }
        Ok(writer)
    }

    fn map_io(&self, err: std::io::Error) -> StoreError {
        if err.kind() == ErrorKind::NotFound {
            StoreError::Unavailable(self.path.clone())
        } else {
            StoreError::Io(err)
        }
    }
}

/// File-backed store: `entries.csv` and `users.csv` in one data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    entries: CsvTable,
    users: CsvTable,
}

impl CsvStore {
    /// Creates the data directory and any missing table files.
    pub fn open(data_dir: &Path, entries_file: &str, users_file: &str) -> StoreResult<Self> {
        fs::create_dir_all(data_dir)?;

        let store = Self {
            entries: CsvTable::new(data_dir.join(entries_file), &ENTRY_HEADER),
            users: CsvTable::new(data_dir.join(users_file), &USER_HEADER),
        };
        store.entries.init()?;
        store.users.init()?;

        tracing::info!(
            "Opened ledger store: {} and {}",
            store.entries.path().display(),
            store.users.path().display()
        );
        Ok(store)
    }
}

impl RecordStore for CsvStore {
    fn append_entry(&self, entry: &Entry) -> StoreResult<()> {
        self.entries.append(entry)
    }

    fn read_entries(&self) -> StoreResult<Vec<Entry>> {
        self.entries.read_all()
    }

    fn append_user(&self, user: &User) -> StoreResult<()> {
        self.users.append(user)
    }

    fn read_users(&self) -> StoreResult<Vec<User>> {
        self.users.read_all()
    }
}
