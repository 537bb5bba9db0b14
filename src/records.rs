//! High score and top-N records persistence.
//!
//! Everything is stored as JSON text under two stable keys in a small
//! key/value [`Storage`]. Missing or corrupt entries read back as a zero high
//! score and an empty list; write failures are logged and dropped. None of it
//! ever reaches the engine as an error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HIGH_SCORE_KEY: &str = "snake.highscore";
pub const RECORDS_KEY: &str = "snake.records.v1";
pub const RECORDS_LIMIT: usize = 10;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub score: u32,
    pub time: Timestamp,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{key}`")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write `{key}`")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed value under `{key}`")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value persistence.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, key: &str) -> PathBuf { self.dir.join(format!("{key}.json")) }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { key: key.to_string(), source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(self.path_for(key), value))
            .map_err(|source| StorageError::Write { key: key.to_string(), source })
    }
}

/// In-process storage; nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What the engine needs from persistence.
pub trait ScoreStore {
    fn high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32);
    /// Best records first, at most [`RECORDS_LIMIT`].
    fn records(&self) -> Vec<Record>;
    fn submit(&mut self, score: u32, time: Timestamp);
}

/// Inserts `record` keeping the list sorted by score (high first), earlier
/// time first on ties, and capped at [`RECORDS_LIMIT`].
pub fn insert_record(list: &mut Vec<Record>, record: Record) {
    list.push(record);
    list.sort_by(|a, b| b.score.cmp(&a.score).then(a.time.cmp(&b.time)));
    list.truncate(RECORDS_LIMIT);
}

/// [`ScoreStore`] on top of any [`Storage`].
#[derive(Clone, Debug, Default)]
pub struct Scoreboard<S> {
    storage: S,
}

impl<S: Storage> Scoreboard<S> {
    pub fn new(storage: S) -> Self { Self { storage } }

    pub fn storage(&self) -> &S { &self.storage }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.storage.read(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| StorageError::Malformed { key: key.to_string(), source }),
            None => Ok(None),
        }
    }

    fn store<T: Serialize>(&mut self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("could not encode `{key}`: {e}");
                return;
            }
        };
        if let Err(e) = self.storage.write(key, &text) {
            tracing::warn!("{e}: {}", error_source(&e));
        }
    }
}

fn error_source(e: &StorageError) -> String {
    std::error::Error::source(e).map(|s| s.to_string()).unwrap_or_default()
}

impl<S: Storage> ScoreStore for Scoreboard<S> {
    fn high_score(&self) -> u32 {
        match self.load::<u32>(HIGH_SCORE_KEY) {
            Ok(score) => score.unwrap_or(0),
            Err(e) => {
                tracing::warn!("{e}, treating high score as 0: {}", error_source(&e));
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u32) { self.store(HIGH_SCORE_KEY, &score); }

    fn records(&self) -> Vec<Record> {
        match self.load::<Vec<Record>>(RECORDS_KEY) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("{e}, starting with no records: {}", error_source(&e));
                Vec::new()
            }
        }
    }

    fn submit(&mut self, score: u32, time: Timestamp) {
        let mut list = self.records();
        insert_record(&mut list, Record { score, time });
        self.store(RECORDS_KEY, &list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Scoreboard<MemoryStorage> { Scoreboard::new(MemoryStorage::default()) }

    #[test]
    fn empty_storage_reads_as_zero_and_empty() {
        let b = board();
        assert_eq!(b.high_score(), 0);
        assert!(b.records().is_empty());
    }

    #[test]
    fn ties_keep_the_earlier_record_first() {
        let mut b = board();
        b.submit(150, 1_000);
        b.submit(90, 2_000);
        b.submit(150, 3_000);
        let scores: Vec<_> = b.records().iter().map(|r| (r.score, r.time)).collect();
        assert_eq!(scores, vec![(150, 1_000), (150, 3_000), (90, 2_000)]);
    }

    #[test]
    fn list_is_capped() {
        let mut b = board();
        for i in 0..15u32 {
            b.submit(10 * (i + 1), u64::from(i));
        }
        let list = b.records();
        assert_eq!(list.len(), RECORDS_LIMIT);
        assert_eq!(list.first().map(|r| r.score), Some(150));
        assert_eq!(list.last().map(|r| r.score), Some(60));
    }

    #[test]
    fn corrupt_values_degrade_to_defaults() {
        let mut storage = MemoryStorage::default();
        storage.write(HIGH_SCORE_KEY, "not a number").unwrap();
        storage.write(RECORDS_KEY, "{\"score\":").unwrap();
        let mut b = Scoreboard::new(storage);
        assert_eq!(b.high_score(), 0);
        assert!(b.records().is_empty());

        // a submit over a corrupt list starts a fresh one
        b.submit(40, 7);
        assert_eq!(b.records(), vec![Record { score: 40, time: 7 }]);
    }

    #[test]
    fn high_score_round_trips_through_storage() {
        let mut b = board();
        b.save_high_score(230);
        assert_eq!(b.storage().read(HIGH_SCORE_KEY).unwrap().as_deref(), Some("230"));
        assert_eq!(b.high_score(), 230);
    }

    #[test]
    fn records_serialize_as_score_and_time() {
        let json = serde_json::to_string(&Record { score: 10, time: 42 }).unwrap();
        assert_eq!(json, r#"{"score":10,"time":42}"#);
    }
}
