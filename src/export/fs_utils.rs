// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Check that every output of one user may be written.
///
/// Files that already exist are overwritten with `force`; otherwise the user
/// is asked once for all of them. Without a terminal to ask on, the export
/// is refused.
pub(crate) fn ensure_writable(paths: &[PathBuf], force: bool) -> AppResult<()> {
    let existing: Vec<&PathBuf> = paths.iter().filter(|p| p.exists()).collect();
    if existing.is_empty() || force {
        return Ok(());
    }

    for p in &existing {
        warning(format!("The file '{}' already exists.", p.display()));
    }

    let refused = || {
        AppError::Export(format!(
            "{} existing file(s) not overwritten (use --force)",
            existing.len()
        ))
    };

    if !io::stdin().is_terminal() {
        return Err(refused());
    }

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => {
            info("Existing files will be overwritten.");
            Ok(())
        }
        _ => Err(refused()),
    }
}

/// Create the output directory when missing.
pub(crate) fn ensure_dir(dir: &Path) -> AppResult<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
