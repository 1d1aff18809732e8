use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::{Record, RecordDraft, RecordError, RecordId};

/// The table used when no other path is configured
pub const DEFAULT_LEDGER_PATH: &str = "expenses.csv";

/// The header row of the persisted table
pub const HEADER: [&str; 5] = ["id", "date", "category", "amount", "description"];

/// Possible errors to occur while reading or appending to the ledger
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Input(#[from] RecordError),
    #[error("Could not access the ledger: {0}")]
    Io(#[from] std::io::Error),
    #[error("The ledger table is unreadable: {0}")]
    Csv(#[from] csv::Error),
    #[error("The ledger has used up all record ids")]
    IdsExhausted,
}

impl StoreError {
    /// Whether the error was caused by bad user input
    ///
    /// Input errors leave the ledger untouched and can be retried. All other
    /// errors concern the table itself and are fatal.
    pub fn is_input(&self) -> bool {
        matches!(self, StoreError::Input(_))
    }
}

/// Where the ledger lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// The path of the CSV table backing the ledger
    pub path: PathBuf,
}

impl LedgerConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_PATH)
    }
}

/// The durable storage of all expense records
///
/// The store keeps no state besides its configuration. Every operation goes
/// back to the table, which is created lazily on first access. Only a single
/// writer is supported: two processes appending at the same time may hand out
/// the same id.
#[derive(Debug)]
pub struct LedgerStore {
    config: LedgerConfig,
}

impl LedgerStore {
    /// Creates a store for the configured table without touching the disk
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// The path of the backing table
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Creates the table with only a header row, if it does not exist yet
    ///
    /// An existing table is left as is.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        if self.path().exists() {
            return Ok(());
        }

        let file = File::create(self.path())?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        log::debug!("created ledger table at {}", self.path().display());

        Ok(())
    }

    /// Reads a snapshot of all records in append order
    pub fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        self.ensure_initialized()?;

        let file = File::open(self.path())?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);
        let records = reader
            .deserialize()
            .collect::<Result<Vec<Record>, _>>()?;
        log::debug!("read {} records from {}", records.len(), self.path().display());

        Ok(records)
    }

    /// The id the next appended record will get
    ///
    /// This is one past the largest id in the table, or [`RecordId::FIRST`] if
    /// the table is empty.
    pub fn next_id(&self) -> Result<RecordId, StoreError> {
        let records = self.read_all()?;
        match records.iter().map(Record::id).max() {
            Some(id) => id.next().ok_or(StoreError::IdsExhausted),
            None => Ok(RecordId::FIRST),
        }
    }

    /// Validates the draft and appends it as a new record, dated today if
    /// the draft has no date
    pub fn append(&self, draft: &RecordDraft) -> Result<Record, StoreError> {
        self.append_on(draft, Local::now().date_naive())
    }

    /// Validates the draft and appends it as a new record
    ///
    /// `today` is used for drafts without a date. The draft is parsed before
    /// the table is touched, so an input error never results in a write.
    pub fn append_on(&self, draft: &RecordDraft, today: NaiveDate) -> Result<Record, StoreError> {
        let parsed = draft.parse(today).map_err(|err| {
            log::warn!("rejected record: {}", err);
            err
        })?;

        let id = self.next_id()?;
        let record = parsed.into_record(id);

        let file = OpenOptions::new()
            .append(true)
            .open(self.path())?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;
        log::debug!("appended record {} to {}", record.id(), self.path().display());

        Ok(record)
    }
}
