// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Rows as one pretty-printed JSON array.
pub(crate) fn export_json<T: Serialize>(label: &str, rows: &[T], path: &Path) -> AppResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.flush()?;

    done(label, rows.len(), path);
    Ok(())
}

/// Rows as CSV, header taken from the serde field names.
pub(crate) fn export_csv<T: Serialize>(label: &str, rows: &[T], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for item in rows {
        wtr.serialize(item)?;
    }

    wtr.flush()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;

    done(label, rows.len(), path);
    Ok(())
}

fn done(label: &str, rows: usize, path: &Path) {
    debug!(rows, path = %path.display(), "{label} written");
    success(format!("{label} export completed: {}", path.display()));
}
