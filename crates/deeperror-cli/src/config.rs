//! Report configuration discovery for the CLI.
//!
//! The first source that exists wins:
//! 1. `--config PATH`
//! 2. the `DEEPERROR_CONFIG` environment variable
//! 3. `deeperror/config.toml` under the working directory
//! 4. `config.toml` in the platform config directory
//!
//! An explicitly named file must exist; discovered locations are optional.
//! With no file at all the library defaults apply.
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "WARN"
//!
//! [trace]
//! max_bytes = 2048
//! ```

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use deeperror::config::ReportConfig;

use crate::CliError;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "DEEPERROR_CONFIG";

/// Failure to load a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML configuration {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Load the report configuration for this run.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if an explicitly named file does
/// not exist, and [`ConfigError::Read`] or [`ConfigError::Parse`] for any
/// file that exists but cannot be used.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<ReportConfig, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from --config");
        return Ok(read_config(path)?);
    }

    if let Some(path) = env::var_os(CONFIG_ENV) {
        let path = PathBuf::from(path);
        info!(path = path.display().to_string(); "Loading configuration from {CONFIG_ENV}");
        return Ok(read_config(&path)?);
    }

    for path in discovered_paths() {
        match read_config(&path) {
            Ok(config) => {
                info!(path = path.display().to_string(); "Loaded discovered configuration");
                return Ok(config);
            }
            Err(ConfigError::MissingFile(_)) => {
                debug!(path = path.display().to_string(); "No configuration file here");
            }
            Err(err) => return Err(err.into()),
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(ReportConfig::default())
}

/// Optional locations, in lookup order.
fn discovered_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("deeperror/config.toml")];
    match ProjectDirs::from("com", "deeperror", "deeperror") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

fn read_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConfigError::MissingFile(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
