//! Loading of the sidebar configuration file.
//!
//! The file is JSON with every field optional; see `SidebarConfig` for the
//! layout. Its path comes from the command line or, failing that, from the
//! `SIDENAV_CONFIG` environment variable.

use crate::error::SidenavError;
use sidenav_sidebar::SidebarConfig;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "SIDENAV_CONFIG";

/// Picks the configuration file: an explicit path wins over the environment.
pub fn resolve_config_path(explicit: Option<&Path>, env_value: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// Loads the configuration, falling back to defaults when no file is named.
pub fn load_config(explicit: Option<&Path>) -> Result<SidebarConfig, SidenavError> {
    match resolve_config_path(explicit, std::env::var_os(CONFIG_ENV)) {
        Some(path) => read_config_file(&path),
        None => {
            log::debug!("No configuration file given; using defaults");
            Ok(SidebarConfig::default())
        }
    }
}

/// Reads and validates a configuration file. Selectors are compiled here so
/// mistakes surface before any page is touched.
pub fn read_config_file(path: &Path) -> Result<SidebarConfig, SidenavError> {
    let text = fs::read_to_string(path).map_err(|e| SidenavError::io(path, e))?;
    let config: SidebarConfig =
        serde_json::from_str(&text).map_err(|source| SidenavError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.compile()?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}
