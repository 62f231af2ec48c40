//! Storage layer for bmi-tracker.
//!
//! This module provides the `SQLite`-backed record store: an append-only
//! table of BMI observations with an explicit `uninitialized -> ready`
//! lifecycle.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::observation::{Observation, Record, RecordId};

use schema::SCHEMA_STATEMENTS;

/// Columns selected for every record query, in `row_to_record` order.
const RECORD_COLUMNS: &str = "id, weight, height, bmi, timestamp";

/// Record store for BMI observations.
///
/// A freshly opened store is uninitialized; call [`Storage::initialize`]
/// before anything else. The connection is released when the store is
/// closed or dropped.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Whether `initialize` has run on this handle.
    ready: bool,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or the database cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            ready: false,
        })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            ready: false,
        })
    }

    /// Ensure the schema exists and mark the store ready.
    ///
    /// Safe to call on every start and more than once per handle.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    pub fn initialize(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for statement in SCHEMA_STATEMENTS {
            tx.execute(statement, [])?;
        }
        tx.commit()?;

        self.ready = true;
        debug!("Schema ready at {}", self.path.display());
        Ok(())
    }

    /// Whether [`Storage::initialize`] has completed on this handle.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an observation, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not initialized or the write fails.
    pub fn append(&self, observation: &Observation) -> Result<Record> {
        self.append_at(observation, Utc::now())
    }

    /// Append with an explicit clock reading.
    ///
    /// The stored timestamp is never earlier than the newest existing one,
    /// so timestamps stay non-decreasing with id even if the clock steps back.
    fn append_at(&self, observation: &Observation, now: DateTime<Utc>) -> Result<Record> {
        self.ensure_ready()?;

        let tx = self.conn.unchecked_transaction()?;

        let newest: Option<String> = tx
            .query_row(
                "SELECT timestamp FROM bmi_observations ORDER BY timestamp DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let newest = newest.as_deref().map(parse_timestamp).transpose()?;

        let now = now.trunc_subsecs(6);
        let timestamp = newest.map_or(now, |newest| newest.max(now));

        tx.execute(
            r"
            INSERT INTO bmi_observations (weight, height, bmi, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                observation.weight().get(),
                observation.height().get(),
                observation.bmi(),
                format_timestamp(timestamp),
            ],
        )?;
        let id = RecordId(tx.last_insert_rowid());
        tx.commit()?;

        info!("Recorded observation {} (bmi {:.2})", id, observation.bmi());
        Ok(Record {
            id,
            weight: observation.weight().get(),
            height: observation.height().get(),
            bmi: observation.bmi(),
            timestamp,
        })
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not initialized or the query fails.
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.ensure_ready()?;

        let result = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM bmi_observations WHERE id = ?1"),
                [id.0],
                Self::row_to_record,
            )
            .optional()?;
        Ok(result)
    }

    /// Get up to `limit` records, most recent first.
    ///
    /// Ties on timestamp are broken by descending id. An empty store, or a
    /// `limit` of zero, yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not initialized or the query fails.
    pub fn recent_records(&self, limit: usize) -> Result<Vec<Record>> {
        self.ensure_ready()?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM bmi_observations \
             ORDER BY timestamp DESC, id DESC LIMIT ?1"
        ))?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map([limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Loaded {} of at most {} records", records.len(), limit);
        Ok(records)
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not initialized or the query fails.
    pub fn count(&self) -> Result<i64> {
        self.ensure_ready()?;

        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM bmi_observations", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not initialized, a query fails, or
    /// the database file cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;

        let oldest: Option<String> = self
            .conn
            .query_row(
                "SELECT timestamp FROM bmi_observations ORDER BY timestamp ASC, id ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let oldest_record = oldest.as_deref().map(parse_timestamp).transpose()?;

        let newest = self.recent_records(1)?.into_iter().next();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            total_records,
            oldest_record,
            newest_record: newest.as_ref().map(|r| r.timestamp),
            latest_bmi: newest.map(|r| r.bmi),
            db_size_bytes,
        })
    }

    /// Close the database, reporting any error from the final flush.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, err)| Error::from(err))?;
        debug!("Closed database at {}", path.display());
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(Error::StoreNotInitialized {
                path: self.path.clone(),
            })
        }
    }

    /// Convert a database row to a Record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let timestamp_str: String = row.get(4)?;

        Ok(Record {
            id: RecordId(row.get(0)?),
            weight: row.get(1)?,
            height: row.get(2)?,
            bmi: row.get(3)?,
            timestamp: parse_timestamp(&timestamp_str)?,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageStats {
    /// Total number of records stored.
    pub total_records: i64,
    /// Timestamp of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Timestamp of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// BMI of the newest record.
    pub latest_bmi: Option<f64>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))
}
