//! User configuration.

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use log::*;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::geometry::{LogicalSize, Spacing};

/// Configuration supplied by the user.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Size of the logical grid, as `[width, height]`.
    #[serde(deserialize_with = "validate_inner_size")]
    pub inner_size: [u32; 2],

    /// Extra cells between logical units, as `[x, y]`.
    #[serde(deserialize_with = "validate_spacing")]
    pub spacing: Spacing,
}

impl Config {
    pub fn inner_size(&self) -> LogicalSize {
        let [width, height] = self.inner_size;
        LogicalSize::new(width, height)
    }

    /// Read the configuration from a file path. If no path is supplied, the default configuration
    /// is returned.
    pub fn read(path: Option<PathBuf>) -> anyhow::Result<Config> {
        // If the file doesn't exist, return the default config.
        let path = match path {
            Some(path) => path,
            None => {
                info!("could not determine config directory");
                return Ok(Config::default());
            }
        };

        info!("reading config from {}", path.display());

        let config = match fs::read(&path) {
            Ok(bytes) => toml::from_slice(&bytes)
                .with_context(|| format!("invalid config file {}", path.display()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("config file not found");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("could not read config file {}", path.display()));
            }
        };

        Ok(config)
    }

    /// Returns the path of the config file.
    ///
    /// Respects `XDG_CONFIG_HOME`.
    pub fn config_path() -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;

        Some(config_dir.join("textframe/config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inner_size: [20, 20],
            spacing: Spacing::default(),
        }
    }
}

/// Largest accepted logical width or height.
pub const MAX_INNER_SIZE: u32 = 1 << 16;

pub(crate) fn validate_inner_size<'de, D>(deserializer: D) -> Result<[u32; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let size = <[u32; 2]>::deserialize(deserializer)?;
    for &value in &size {
        if value > MAX_INNER_SIZE {
            return Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(u64::from(value)),
                &"a grid dimension of at most 65536",
            ));
        }
    }

    Ok(size)
}

pub(crate) fn validate_spacing<'de, D>(deserializer: D) -> Result<Spacing, D::Error>
where
    D: Deserializer<'de>,
{
    let spacing = Spacing::deserialize(deserializer)?;
    for &value in &[spacing.x, spacing.y] {
        if !(value >= 0.0) {
            return Err(de::Error::invalid_value(
                de::Unexpected::Float(value),
                &"a non-negative spacing",
            ));
        }
    }

    Ok(spacing)
}
