//! Append-only success and failure sinks.

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
};

use anyhow::{Context, Result};

use crate::record::TagRecord;

/// Destination for per-tag terminal outcomes.
pub trait ResolutionSink {
    fn success(&mut self, record: &TagRecord, name: &str) -> Result<()>;
    fn failure(&mut self, record: &TagRecord) -> Result<()>;
}

/// Writes `[tag, name, ...fields]` and `[tag, ...fields]` rows, flushing each one.
pub struct ResultWriter {
    success: csv::Writer<File>,
    failure: csv::Writer<File>,
}

fn open_append(path: &Path, delimiter: u8) -> Result<csv::Writer<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_writer(file))
}

impl ResultWriter {
    pub fn open(success_path: &Path, failed_path: &Path, delimiter: u8) -> Result<Self> {
        Ok(Self {
            success: open_append(success_path, delimiter)?,
            failure: open_append(failed_path, delimiter)?,
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.success.flush().context("Failed to flush success output")?;
        self.failure.flush().context("Failed to flush failure output")?;
        Ok(())
    }
}

impl ResolutionSink for ResultWriter {
    fn success(&mut self, record: &TagRecord, name: &str) -> Result<()> {
        let row = [record.tag.as_str(), name]
            .into_iter()
            .chain(record.fields.iter().map(String::as_str));
        self.success
            .write_record(row)
            .with_context(|| format!("Failed to write success row for {}", record.tag))?;
        self.success.flush().context("Failed to flush success output")?;
        Ok(())
    }

    fn failure(&mut self, record: &TagRecord) -> Result<()> {
        let row = std::iter::once(record.tag.as_str())
            .chain(record.fields.iter().map(String::as_str));
        self.failure
            .write_record(row)
            .with_context(|| format!("Failed to write failure row for {}", record.tag))?;
        self.failure.flush().context("Failed to flush failure output")?;
        Ok(())
    }
}
