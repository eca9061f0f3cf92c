//! Resume cache built from previous success and failure outputs.
//!
//! Any tag found here has already been attempted and must not be looked up
//! again, whether it resolved or failed.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use anyhow::{Context, Result};

/// What an earlier run recorded for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    Resolved(String),
    Failed,
}

#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<String, CacheState>,
}

impl CacheStore {
    /// Loads every path in order. The first occurrence of a key wins.
    ///
    /// Rows with a blank second column are treated as failures.
    pub fn load<P: AsRef<Path>>(paths: &[P], delimiter: u8) -> Result<Self> {
        let mut store = Self::default();
        for path in paths {
            store.read_file(path.as_ref(), delimiter, false)?;
        }
        Ok(store)
    }

    /// Loads the success output first, then the failure output.
    pub fn load_with_failures(success: &Path, failed: &Path, delimiter: u8) -> Result<Self> {
        let mut store = Self::default();
        store.read_file(success, delimiter, false)?;
        store.read_file(failed, delimiter, true)?;
        Ok(store)
    }

    fn read_file(&mut self, path: &Path, delimiter: u8, failures: bool) -> Result<()> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to open cache file: {}", path.display()));
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(BufReader::new(file));

        let before = self.entries.len();
        for row in reader.records() {
            let row =
                row.with_context(|| format!("Failed to read cache file: {}", path.display()))?;
            // Failure rows are `[tag, ...rest]` and may hold the tag alone
            let min_len = if failures { 1 } else { 2 };
            if row.len() < min_len || row[0].trim().is_empty() {
                continue;
            }
            let state = match row.get(1) {
                Some(name) if !failures && !name.trim().is_empty() => {
                    CacheState::Resolved(name.to_string())
                }
                _ => CacheState::Failed,
            };
            self.entries.entry(row[0].to_string()).or_insert(state);
        }

        tracing::debug!(
            path = %path.display(),
            added = self.entries.len() - before,
            "Loaded cache file"
        );
        Ok(())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&CacheState> {
        self.entries.get(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
