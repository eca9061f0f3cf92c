//! Work titles collected from character tags such as `chen_(touhou)`.

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;

static WORK_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("valid work qualifier regex"));

/// Returns the first parenthetical qualifier of `tag`, if any.
pub fn work_of(tag: &str) -> Option<&str> {
    WORK_QUALIFIER
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Reads the first column of `input` and returns the distinct work titles, sorted.
pub fn extract_works(input: &Path, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    let mut works = BTreeSet::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("Failed to read row from {}", input.display()))?;
        if let Some(work) = row.get(0).and_then(work_of) {
            works.insert(work.to_string());
        }
    }
    Ok(works.into_iter().collect())
}

/// Writes one title per line, without a trailing newline.
pub fn write_works(path: &Path, works: &[String]) -> Result<()> {
    fs::write(path, works.join("\n"))
        .with_context(|| format!("Failed to write works file: {}", path.display()))
}
