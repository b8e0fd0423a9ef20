use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Core, Estimation};
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::ingest::{Normalizer, read_alias_table, read_records};
use crate::models::estimate::EstimateType;
use crate::ui::messages::{header, info, warning};
use crate::utils::date::{parse_date, today};
use crate::utils::path::{expand_tilde, output_stem};
use crate::utils::table::{Column, Table};
use std::path::{Path, PathBuf};
use tracing::info_span;

/// Handle the `estimate` subcommand: one input file per user, processed in turn.
pub fn handle(cmd: &Commands, cfg: &Config, config_path: &Path) -> AppResult<()> {
    if let Commands::Estimate {
        inputs,
        aliases,
        output,
        day_series,
        no_day_series,
        start_date,
        end_date,
        format,
        summary,
        force,
    } = cmd
    {
        let alias_path = aliases
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(|| cfg.alias_table_path(config_path));
        let alias_table = read_alias_table(&alias_path)?;
        if alias_table.is_empty() {
            warning(format!(
                "Alias table {} has no rows, timezone names are used as found",
                alias_path.display()
            ));
        }
        info(format!(
            "Loaded {} timezone aliases from {}",
            alias_table.len(),
            alias_path.display()
        ));

        let start = match start_date {
            Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => cfg.start()?,
        };
        let end = match end_date {
            Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => cfg.end()?.unwrap_or_else(today),
        };
        if end < start {
            return Err(AppError::InvalidDate(format!(
                "end date {end} before start date {start}"
            )));
        }

        let normalizer = Normalizer::new(&alias_table).with_date_range(Some(start), Some(end));

        let output_dir = expand_tilde(output.as_deref().unwrap_or(&cfg.output_dir));
        let day_dir: Option<PathBuf> = if *no_day_series {
            None
        } else {
            day_series
                .as_deref()
                .or(cfg.day_series_dir.as_deref())
                .map(expand_tilde)
        };
        let format = format.unwrap_or(cfg.output_format);

        let mut skipped = 0usize;
        for input in inputs {
            let path = expand_tilde(input);
            let _span = info_span!("user", input = %path.display()).entered();

            header(format!("Estimating local time: {}", path.display()));

            let raw = read_records(&path)?;
            let estimation = match Core::estimate_raw(&raw, &normalizer) {
                Ok(e) => e,
                Err(AppError::InsufficientData(reason)) => {
                    warning(format!("Skipping {}: {reason}", path.display()));
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            ExportLogic::export(
                &estimation,
                format,
                &output_dir,
                day_dir.as_deref(),
                &output_stem(&path),
                *force,
            )?;

            if *summary {
                print_summary(&path, &estimation);
            }
        }

        if skipped > 0 {
            warning(format!("{skipped} input(s) skipped for insufficient data"));
        }
    }

    Ok(())
}

fn print_summary(path: &Path, estimation: &Estimation) {
    let mut table = Table::new(vec![Column::left("TYPE", 10), Column::right("DAYS", 6)]);

    for kind in [
        EstimateType::Upload,
        EstimateType::Device,
        EstimateType::Impute,
        EstimateType::Uncertain,
    ] {
        table.add_row(vec![
            kind.as_str().to_string(),
            estimation.count(kind).to_string(),
        ]);
    }

    println!(
        "{}: {} days, home timezone {}, {} device defect day(s)",
        path.display(),
        estimation.days.len(),
        estimation.home.map(|tz| tz.name()).unwrap_or("unknown"),
        estimation.device_defects()
    );
    print!("{}", table.render());
}
