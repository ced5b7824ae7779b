use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::version::error::RestrictionError;
use crate::version::policy::{Policy, VersionRestriction, compile_ignore_patterns};

// =============================================================================
// Network-related constants
// =============================================================================

/// Timeout for fetch operations (30 seconds)
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Slice size fed to the digests while streaming a distfile (8 KiB)
pub const HASH_CHUNK_SIZE: usize = 8192;

/// User-Agent sent by every profile without a dedicated one
pub const USER_AGENT: &str = concat!("livecheck/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid setting for {catpkg}: {source}")]
    Restriction {
        catpkg: String,
        #[source]
        source: RestrictionError,
    },

    #[error("Invalid regex {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("URI template missing @PV@ or @SHA@: {0}")]
    MissingPlaceholder(String),
}

/// Per-package settings, keyed by catpkg
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Accept development versions
    pub development: HashMap<String, bool>,
    /// Version restriction spec: `major`, `minor`, `prefix:..`, `regex:..`
    /// or a semver requirement
    pub restrict_version: HashMap<String, String>,
    /// Disable semver narrowing with `false`
    pub semver: HashMap<String, bool>,
    /// Regexes of tags to never consider
    pub ignore: HashMap<String, Vec<String>>,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load settings from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the resolution policy for one package
    pub fn policy_for(&self, catpkg: &str) -> Result<Policy, ConfigError> {
        let restriction_error = |source: RestrictionError| ConfigError::Restriction {
            catpkg: catpkg.to_string(),
            source,
        };

        let restriction = self
            .restrict_version
            .get(catpkg)
            .map(|spec| spec.parse::<VersionRestriction>())
            .transpose()
            .map_err(restriction_error)?;

        let ignore = match self.ignore.get(catpkg) {
            Some(patterns) => compile_ignore_patterns(patterns).map_err(restriction_error)?,
            None => Vec::new(),
        };

        Ok(Policy {
            development_allowed: self.development.get(catpkg).copied().unwrap_or(false),
            restriction,
            semver: self.semver.clone(),
            ignore,
        })
    }
}

/// Returns the path to the config directory for livecheck.
/// Uses $XDG_CONFIG_HOME/livecheck if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/livecheck,
/// or ./livecheck if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Returns the path to the credentials file.
pub fn credentials_path() -> PathBuf {
    config_dir().join("credentials.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("livecheck")
}
