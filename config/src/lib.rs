//! Configuration for the `magic` command.
//!
//! Read from `$MAGIC_CONFIG` when set, otherwise `~/.magic/config.toml`.
//! A missing file is not an error; every field has a default.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "MAGIC_CONFIG";

const DEFAULT_LOG_FILTER: &str = "info";

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct MagicConfig {
    pub output: Option<OutputConfig>,
    pub log: Option<LogConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Pretty-print JSON output. Default: true.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
        }
    }
}

/// Which projection of the bag the command prints.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Stored attributes overlaid with computed ones.
    #[default]
    Debug,
    /// Stored attributes as plain JSON, readable back as input.
    Json,
    /// Stored attribute names, one per line.
    Keys,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Json => "json",
            Self::Keys => "keys",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown output format {0:?} (expected debug, json or keys)")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "json" => Ok(Self::Json),
            "keys" => Ok(Self::Keys),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `"magic_core=trace"`. `RUST_LOG` wins.
    pub filter: Option<String>,
}

impl MagicConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load from an explicit path. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .map(|output| output.format)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pretty(&self) -> bool {
        self.output.as_ref().is_none_or(|output| output.pretty)
    }

    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|log| log.filter.as_deref())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|path| !path.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".magic").join("config.toml"))
}
