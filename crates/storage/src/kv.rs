// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyed JSON-file store: one file per key, atomic writes.
//!
//! The write path mirrors snapshot-style durability: serialize to a
//! `.tmp` sibling, fsync, rename into place. A crash mid-write leaves
//! either the old row or the new row, never a torn one. Corrupt rows
//! are skipped with a warning rather than failing the whole read:
//! the coordination core treats store damage as data loss for one row,
//! not an outage.

use crate::StorageError;
use ovs_core::sanitize_name;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A directory of `<key>.json` rows.
#[derive(Debug, Clone)]
pub struct KvDir {
    dir: PathBuf,
}

impl KvDir {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(key)))
    }

    /// Read one row. Missing or corrupt rows read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_reader(BufReader::new(file)) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt row, skipping");
                Ok(None)
            }
        }
    }

    /// Write one row atomically (tmp + fsync + rename).
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, value)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Remove one row; removing a missing row is not an error.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read every row, skipping corrupt ones.
    pub fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StorageError> {
        let mut rows = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file = match File::open(&path) {
                Ok(f) => f,
                // Raced with a concurrent remove
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            match serde_json::from_reader(BufReader::new(file)) {
                Ok(value) => rows.push(value),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt row, skipping");
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
