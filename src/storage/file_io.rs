//! File I/O for data files and plan documents
//!
//! Data files are JSON written atomically (temp file, fsync, rename). Plan
//! documents exchanged with the user may be JSON or YAML, picked from the
//! file extension.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CashplanError;

/// Serialization format of a plan document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` are YAML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

fn storage_err(action: &str, path: &Path, err: impl std::fmt::Display) -> CashplanError {
    CashplanError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read a JSON data file, falling back to `T::default()` when it is missing
pub fn read_json<T, P>(path: P) -> Result<T, CashplanError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_err("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("parse", path, e))
}

/// Write a JSON data file atomically
///
/// The file is either completely replaced or left untouched.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), CashplanError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_err("create directory", parent, e))?;
    }

    // Same directory as the target so the rename stays atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| storage_err("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_err("serialize", path, e))?;
    writer.flush().map_err(|e| storage_err("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_err("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_err("replace", path, e)
    })
}

/// Read a plan document (JSON or YAML); the file must exist
pub fn read_document<T, P>(path: P) -> Result<T, CashplanError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| storage_err("read", path, e))?;

    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            serde_json::from_str(&contents).map_err(|e| storage_err("parse", path, e))
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(&contents).map_err(|e| storage_err("parse", path, e))
        }
    }
}

/// Write a plan document in the format given by its extension
pub fn write_document<T, P>(path: P, data: &T) -> Result<(), CashplanError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => write_json_atomic(path, data),
        DocumentFormat::Yaml => {
            let contents =
                serde_yaml::to_string(data).map_err(|e| storage_err("serialize", path, e))?;
            fs::write(path, contents).map_err(|e| storage_err("write", path, e))
        }
    }
}
