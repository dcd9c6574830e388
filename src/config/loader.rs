//! Locating, reading, and validating the dance definition.

use crate::config::schema::{DanceConfig, ValidationError};
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a dance definition file.
pub const CONFIG_ENV: &str = "KEYMAP_PATCHER_CONFIG";

/// Where a dance definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from a string handed to [`load_from_str`]
    Inline,
    /// Named on the command line
    File(PathBuf),
    /// Named by [`CONFIG_ENV`]
    Env(PathBuf),
    /// Nothing configured; the double-tap space dance
    BuiltIn,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::File(path) | ConfigSource::Env(path) => Some(path),
            ConfigSource::Inline | ConfigSource::BuiltIn => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Inline => f.write_str("inline dance definition"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Env(path) => write!(f, "{} (from {CONFIG_ENV})", path.display()),
            ConfigSource::BuiltIn => f.write_str("built-in dance"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read dance definition {origin}: {source}")]
    Read {
        origin: ConfigSource,
        #[source]
        source: io::Error,
    },

    #[error("malformed dance definition in {origin}: {source}")]
    Parse {
        origin: ConfigSource,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("invalid dance definition in {origin}:\n{source}")]
    Invalid {
        origin: ConfigSource,
        #[source]
        source: ValidationError,
    },

    #[error("KEYMAP_PATCHER_CONFIG points at {path}, which does not exist")]
    EnvPathMissing { path: PathBuf },
}

impl ConfigError {
    pub fn origin(&self) -> Option<&ConfigSource> {
        match self {
            ConfigError::Read { origin, .. }
            | ConfigError::Parse { origin, .. }
            | ConfigError::Invalid { origin, .. } => Some(origin),
            ConfigError::EnvPathMissing { .. } => None,
        }
    }
}

fn parse(input: &str, origin: ConfigSource) -> Result<DanceConfig, ConfigError> {
    let config: DanceConfig = match toml_edit::de::from_str(input) {
        Ok(config) => config,
        Err(source) => return Err(ConfigError::Parse { origin, source }),
    };
    match config.validate() {
        Ok(()) => Ok(config),
        Err(source) => Err(ConfigError::Invalid { origin, source }),
    }
}

fn read(origin: ConfigSource) -> Result<DanceConfig, ConfigError> {
    let Some(path) = origin.path() else {
        return Ok(DanceConfig::default());
    };
    match fs::read_to_string(path) {
        Ok(contents) => parse(&contents, origin),
        Err(source) => Err(ConfigError::Read { origin, source }),
    }
}

/// Parse and validate a dance definition. Missing keys take their defaults.
pub fn load_from_str(input: &str) -> Result<DanceConfig, ConfigError> {
    parse(input, ConfigSource::Inline)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<DanceConfig, ConfigError> {
    read(ConfigSource::File(path.as_ref().to_path_buf()))
}

/// Pick the dance definition for a run.
///
/// Priority order:
/// 1. `explicit`, usually the `--config` flag
/// 2. the file named by `KEYMAP_PATCHER_CONFIG`, which must exist when set
/// 3. the built-in double-tap space dance
pub fn resolve(explicit: Option<&Path>) -> Result<(DanceConfig, ConfigSource), ConfigError> {
    resolve_from(explicit, env::var_os(CONFIG_ENV))
}

fn resolve_from(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
) -> Result<(DanceConfig, ConfigSource), ConfigError> {
    let origin = match (explicit, env_value) {
        (Some(path), _) => ConfigSource::File(path.to_path_buf()),
        (None, Some(value)) if !value.is_empty() => {
            let path = PathBuf::from(value);
            if !path.exists() {
                return Err(ConfigError::EnvPathMissing { path });
            }
            ConfigSource::Env(path)
        }
        _ => ConfigSource::BuiltIn,
    };
    let config = read(origin.clone())?;
    Ok((config, origin))
}
