use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        if *print_config {
            print(cfg, path)?;
        }

        if *edit_config {
            edit(path, editor.as_deref())?;
            success(format!("Configuration file edited: {}", path.display()));
        }
    }

    Ok(())
}

/// Effective configuration: file values merged over defaults.
fn print(cfg: &Config, path: &Path) -> AppResult<()> {
    let source = if path.exists() { "file" } else { "defaults, no file" };
    println!("📄 Configuration ({}, {source}):\n", path.display());
    println!("{}", serde_yaml::to_string(cfg)?);
    Ok(())
}

/// Open the file in `editor`, then `$EDITOR`, then nano. The file is created
/// with defaults first so the editor never starts on an empty buffer.
fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
    Config::init_all(path)?;

    let ed = editor
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "nano".into());

    let status = Command::new(&ed)
        .arg(path)
        .status()
        .map_err(|e| AppError::Config(format!("cannot run {ed}: {e}")))?;

    if !status.success() {
        return Err(AppError::Config(format!("{ed} exited with {status}")));
    }

    // reject edits that no longer parse
    Config::load_from(path).map(|_| ())
}
