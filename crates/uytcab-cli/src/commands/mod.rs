//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod pipeline;
pub mod process;

use std::path::Path;

use uytcab_core::LocatorConfig;

/// Load the config from `--config`, else the user config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LocatorConfig> {
    let config = if let Some(path) = config_path {
        LocatorConfig::from_file(Path::new(path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            LocatorConfig::from_file(&default_path)?
        } else {
            LocatorConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}
