//! Calculator settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{DEFAULT_HISTORY_CAP, DEFAULT_HISTORY_KEY};
use crate::errors::{Error, Result};

pub const ENV_HISTORY_CAP: &str = "DEVQUOTE_HISTORY_CAP";
pub const ENV_HISTORY_KEY: &str = "DEVQUOTE_HISTORY_KEY";
pub const ENV_DATA_DIR: &str = "DEVQUOTE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Maximum number of quotes kept in history; `None` keeps all of them.
    pub history_cap: Option<usize>,
    /// Blob-store key of the history snapshot.
    pub history_key: String,
    /// Directory with `plans.json` and `services.json`; `None` uses the bundled catalog.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_cap: Some(DEFAULT_HISTORY_CAP),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let history_cap = match lookup(ENV_HISTORY_CAP) {
            Some(raw) => parse_history_cap(&raw)?,
            None => defaults.history_cap,
        };

        let history_key = lookup(ENV_HISTORY_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or(defaults.history_key);

        let data_dir = lookup(ENV_DATA_DIR)
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            history_cap,
            history_key,
            data_dir,
        })
    }
}

fn parse_history_cap(raw: &str) -> Result<Option<usize>> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("unbounded") || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match value.parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(cap) => Ok(Some(cap)),
        Err(_) => Err(Error::InvalidConfigValue(format!(
            "{} must be a non-negative integer or 'unbounded', got '{}'",
            ENV_HISTORY_CAP, raw
        ))),
    }
}
