//! Tagged input records and the delimited reader that produces them.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use csv::StringRecord;

/// One row of the input file: the tag key plus the rest of the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub tag: String,
    /// Remaining fields in their original order (genre, usage, related tags, ...).
    pub fields: Vec<String>,
}

impl TagRecord {
    pub fn new(tag: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    pub fn genre(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    pub fn usage(&self) -> Option<&str> {
        self.fields.get(1).map(String::as_str)
    }

    pub fn related_tags(&self) -> Vec<&str> {
        self.fields
            .get(2)
            .map(|raw| raw.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Builds a record from a raw row, or `None` if it has fewer than `min_fields` fields.
    pub fn from_row(row: &StringRecord, min_fields: usize) -> Option<Self> {
        if row.is_empty() || row.len() < min_fields.max(1) {
            return None;
        }
        let mut iter = row.iter().map(str::to_string);
        let tag = iter.next()?;
        if tag.trim().is_empty() {
            return None;
        }
        Some(Self::new(tag, iter.collect()))
    }
}

/// Item yielded by [`RecordSource`].
#[derive(Debug)]
pub enum SourceRow {
    Record(TagRecord),
    /// Row with too few fields; skipped without producing output.
    Malformed,
}

/// Streams [`TagRecord`]s from a headerless delimited file in input order.
pub struct RecordSource {
    reader: csv::Reader<File>,
    min_fields: usize,
}

impl RecordSource {
    pub fn open(path: &Path, delimiter: u8, min_fields: usize) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_path(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        Ok(Self { reader, min_fields })
    }
}

impl Iterator for RecordSource {
    type Item = Result<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => Some(Ok(match TagRecord::from_row(&row, self.min_fields) {
                Some(record) => SourceRow::Record(record),
                None => SourceRow::Malformed,
            })),
            Err(err) => Some(Err(err).context("Failed to read input row")),
        }
    }
}
