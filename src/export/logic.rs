// src/export/logic.rs

use crate::core::Estimation;
use crate::errors::AppResult;
use crate::export::fs_utils::{ensure_dir, ensure_writable};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::{DayRow, ExportFormat, RecordRow};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version stamped on every day-table row.
pub const ESTIMATE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct ExportLogic;

impl ExportLogic {
    pub fn day_rows(estimation: &Estimation) -> Vec<DayRow> {
        estimation
            .days
            .iter()
            .map(|d| DayRow::from_day(d, ESTIMATE_VERSION))
            .collect()
    }

    pub fn record_rows(estimation: &Estimation) -> Vec<RecordRow> {
        estimation.records.iter().map(RecordRow::from).collect()
    }

    /// Write the annotated records to `<output_dir>/<stem>.<ext>` and, when a
    /// day-series directory is given, the day table to
    /// `<day_dir>/<stem>-daySeries.<ext>`. Returns the written paths.
    pub fn export(
        estimation: &Estimation,
        format: ExportFormat,
        output_dir: &Path,
        day_dir: Option<&Path>,
        stem: &str,
        force: bool,
    ) -> AppResult<Vec<PathBuf>> {
        let records_path = output_dir.join(format!("{stem}.{}", format.as_str()));
        let day_path = day_dir.map(|dir| {
            dir.join(format!(
                "{}-daySeries.{}",
                day_series_stem(stem),
                format.as_str()
            ))
        });

        let targets: Vec<PathBuf> = std::iter::once(records_path.clone())
            .chain(day_path.clone())
            .collect();
        ensure_writable(&targets, force)?;

        ensure_dir(output_dir)?;
        write("Records", &Self::record_rows(estimation), format, &records_path)?;

        if let (Some(dir), Some(path)) = (day_dir, &day_path) {
            ensure_dir(dir)?;
            write("Day series", &Self::day_rows(estimation), format, path)?;
        }

        Ok(targets)
    }
}

fn write<T: Serialize>(label: &str, rows: &[T], format: ExportFormat, path: &Path) -> AppResult<()> {
    match format {
        ExportFormat::Csv => export_csv(label, rows, path),
        ExportFormat::Json => export_json(label, rows, path),
    }
}

/// Day tables never carry the `PHI-` prefix of protected input files.
fn day_series_stem(stem: &str) -> &str {
    stem.strip_prefix("PHI-").unwrap_or(stem)
}
