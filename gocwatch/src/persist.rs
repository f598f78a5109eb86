//! JSON state documents with atomic replace.
//!
//! Each document is written to a sibling `.tmp` file and renamed over the
//! target, so a crash mid-write leaves either the old or the new document.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors reading or writing a state document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the document.
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The document exists but is not valid JSON for its schema.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to write or rename the document.
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Load a JSON document, returning the default value if the file is absent.
pub fn load_json<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a JSON document via temp file + rename.
pub fn save_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let temp_path = path.with_extension("json.tmp");
    let file = fs::File::create(&temp_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| write_err(io::Error::other(e)))?;
    writer.flush().map_err(write_err)?;
    writer
        .into_inner()
        .map_err(|e| write_err(e.into_error()))?
        .sync_all()
        .map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let value: BTreeMap<String, bool> = load_json(&dir.path().join("absent.json")).unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("flags.json");

        let mut value = BTreeMap::new();
        value.insert("HPF1||welcome".to_string(), true);
        save_json_atomic(&path, &value).unwrap();

        let loaded: BTreeMap<String, bool> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flags.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<BTreeMap<String, bool>, _> = load_json(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_save_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lru.json");

        save_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        save_json_atomic(&path, &vec![4]).unwrap();

        let loaded: Vec<i32> = load_json(&path).unwrap();
        assert_eq!(loaded, vec![4]);
    }
}
