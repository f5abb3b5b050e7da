use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{MediumError, StorageMedium};

/// File-backed medium: one file per key under a root directory.
///
/// Keys become file names and values the file contents. The root directory
/// is created on first write; reading from a nonexistent root yields `None`
/// for every key.
#[derive(Clone, Debug)]
pub struct FileMedium {
    root: PathBuf,
}

impl FileMedium {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the key files.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MediumError::Io(e.to_string())),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), MediumError> {
        fs::create_dir_all(&self.root).map_err(|e| MediumError::Io(e.to_string()))?;
        fs::write(self.key_path(key), value).map_err(|e| MediumError::Io(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediumError::Io(e.to_string())),
        }
    }
}
