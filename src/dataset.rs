use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::Record;

/// Reads a JSON array of records from disk. Rows that are not records are
/// skipped.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<Value> = serde_json::from_reader(reader)?;
    let records = records_from_rows(rows);
    debug!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

pub fn parse_records(input: &str) -> Result<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<Value> = serde_json::from_str(trimmed)?;
    Ok(records_from_rows(rows))
}

fn records_from_rows(rows: Vec<Value>) -> Vec<Record> {
    let total = rows.len();
    let records: Vec<Record> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| match Record::deserialize(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(row, %err, "skipping malformed record");
                None
            }
        })
        .collect();
    if records.len() != total {
        debug!(kept = records.len(), total, "dropped malformed rows");
    }
    records
}
