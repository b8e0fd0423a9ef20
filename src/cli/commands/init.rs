use crate::config::Config;
use crate::errors::AppResult;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file with default values
pub fn handle(config_path: &Path) -> AppResult<()> {
    println!("⚙️  Initializing rLocalTime…");
    Config::init_all(config_path)?;

    let cfg = Config::load_from(config_path)?;
    println!("🗺️  Alias table : {}", cfg.alias_table_path(config_path).display());
    println!("📂 Output dir  : {}", cfg.output_dir);

    println!("🎉 rLocalTime initialization completed!");
    Ok(())
}
