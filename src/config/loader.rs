// src/config/loader.rs

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::cli::{self, CliArgs};
use crate::config::model::ConfigFile;
use crate::errors::Result;

/// Load a configuration file from a given path.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file, falling back to defaults when it does not
/// exist.
///
/// A missing file is the normal first-run state and is not an error; a file
/// that exists but cannot be read or parsed is.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(contents) => {
            info!("reading options from {}", path.display());
            let config: ConfigFile = toml::from_str(&contents)?;
            Ok(config)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(err) => Err(err.into()),
    }
}

/// Write the resolved options back to the config file as pretty TOML.
pub fn save_to_path(config: &ConfigFile, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    info!("saving options to {}", path.display());
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Default config path: `Watchrun.toml` in the current working directory.
///
/// This is also the default of the CLI's `--config` flag.
pub fn default_config_path() -> &'static str {
    "Watchrun.toml"
}

/// Resolve the effective `{directory, patterns, command}` triple.
///
/// Values come from the config file (defaults when it is missing) and are
/// overridden field-wise by whatever the CLI provided. With `--save`, the
/// merged result is written back before it is returned.
pub fn resolve(args: &CliArgs) -> Result<ConfigFile> {
    let mut config = load_or_default(&args.config)?;

    if let Some(dir) = &args.dir {
        config.directory = dir.clone();
    }

    if let Some(raw) = &args.pattern {
        let patterns = cli::split_patterns(raw);
        if !patterns.is_empty() {
            config.patterns = patterns;
        }
    }

    if !args.command.is_empty() {
        config.command = args.command.clone();
    }

    if args.save {
        save_to_path(&config, &args.config)?;
    }

    Ok(config)
}
