//! File readers for record exports and the alias table.

use crate::errors::{AppError, AppResult};
use crate::ingest::raw::RawRecord;
use crate::models::alias::{AliasTable, TimezoneAlias};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read an export file: a JSON array of records, or a CSV with one record per row.
pub fn read_records(path: &Path) -> AppResult<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        "csv" => {
            let mut rdr = csv::Reader::from_path(path)?;
            let mut out = Vec::new();
            for row in rdr.deserialize() {
                out.push(row?);
            }
            Ok(out)
        }
        _ => Err(AppError::InvalidInputFormat(format!(
            "{} is not a json or csv file",
            path.display()
        ))),
    }
}

/// Read the `tz,alias` table. A missing or unreadable table is fatal.
pub fn read_alias_table(path: &Path) -> AppResult<AliasTable> {
    if !path.is_file() {
        return Err(AppError::MissingAliasTable(format!(
            "{} is not a valid file",
            path.display()
        )));
    }

    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| AppError::MissingAliasTable(format!("{}: {e}", path.display())))?;

    rdr.deserialize::<TimezoneAlias>()
        .collect::<Result<AliasTable, _>>()
        .map_err(|e| AppError::MissingAliasTable(format!("{}: {e}", path.display())))
}
