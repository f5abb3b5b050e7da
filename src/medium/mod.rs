//! Persistence medium - string-keyed storage the store mirrors into.
//!
//! The store treats the medium as a best-effort mirror, not the source of
//! truth for the running session: read failures degrade to empty defaults
//! and write failures are logged and swallowed.

mod file;
mod in_memory;

use std::fmt;

/// String-keyed storage backend. One value per key, last write wins.
pub trait StorageMedium: Send + Sync {
    /// Read the value stored under `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove the value under `key`, if any.
    fn remove(&self, key: &str) -> Result<(), MediumError>;
}

/// Error type for medium operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediumError {
    LockPoisoned(&'static str),
    Io(String),
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumError::LockPoisoned(operation) => {
                write!(f, "medium lock poisoned during {}", operation)
            }
            MediumError::Io(msg) => write!(f, "medium io error: {}", msg),
        }
    }
}

impl std::error::Error for MediumError {}

pub use file::FileMedium;
pub use in_memory::InMemoryMedium;
