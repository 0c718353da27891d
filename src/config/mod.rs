//! Configuration management
//!
//! Settings come from three layers: built-in defaults, an optional
//! ConfigParser-style INI file, and command-line overrides.

mod error;
pub mod ini;
pub mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use error::ConfigError;
pub use settings::{BannerSettings, FontSpec, Overrides};

use crate::common::constants::paths;
use ini::IniDocument;

/// Where configuration comes from and which section to read
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub explicit: Option<PathBuf>,
    pub heading: String,
    pub overrides: Overrides,
}

/// Per-user configuration file under the XDG config directory
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join(paths::APP_DIR)
            .join(paths::USER_CONFIG_FILENAME)
    })
}

/// Pick the configuration file to read.
///
/// An explicit path must exist. Without one, the system-wide file is
/// preferred over the per-user file; having neither is not an error.
pub fn discover(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let system = PathBuf::from(paths::SYSTEM_CONFIG);
    discover_in(explicit, &[Some(system), user_config_path()])
}

fn discover_in(
    explicit: Option<&Path>,
    candidates: &[Option<PathBuf>],
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(Some(path.to_path_buf()))
        } else {
            Err(ConfigError::MissingFile(path.to_path_buf()))
        };
    }

    let found = candidates
        .iter()
        .flatten()
        .find(|candidate| candidate.is_file())
        .cloned();
    if found.is_none() {
        debug!("No configuration file found, using defaults");
    }
    Ok(found)
}

/// Merge the chosen section of `text` into `settings`
pub fn apply_file(settings: &mut BannerSettings, text: &str, heading: &str) -> Result<(), ConfigError> {
    let doc = IniDocument::parse(text, heading)?;
    let section = doc
        .section(heading)
        .ok_or_else(|| ConfigError::MissingSection(heading.to_string()))?;
    settings.apply_section(&section)
}

/// Resolve the effective settings: defaults, then the file, then overrides
pub fn load(source: &ConfigSource) -> Result<BannerSettings, ConfigError> {
    let mut settings = BannerSettings::default();

    if let Some(path) = discover(source.explicit.as_deref())? {
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        apply_file(&mut settings, &text, &source.heading)?;
        info!(path = %path.display(), heading = %source.heading, "Loaded configuration file");
    }

    settings.apply_overrides(&source.overrides)?;
    Ok(settings)
}
