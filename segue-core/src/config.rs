use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PlaybackError, Result};

pub const ENV_COUNTDOWN_SECONDS: &str = "SEGUE_COUNTDOWN_SECONDS";
pub const ENV_TICK_INTERVAL_MS: &str = "SEGUE_TICK_INTERVAL_MS";

/// Knobs for the continuation engine.
///
/// All fields carry defaults so a host can supply a partial TOML table, or
/// nothing at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds shown on the countdown overlay before the decision executes.
    pub countdown_seconds: u32,
    /// Length of one countdown tick in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 5,
            tick_interval_ms: 1_000,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional TOML file, then apply `SEGUE_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, std::env::vars())
    }

    /// File first, then `vars`, then validation.
    pub fn load_with<I, K, V>(path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|err| {
                    PlaybackError::Config(format!(
                        "failed to read {}: {err}",
                        path.display()
                    ))
                })?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SEGUE_*` overrides from any key/value source.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_COUNTDOWN_SECONDS => {
                    self.countdown_seconds = parse_var(ENV_COUNTDOWN_SECONDS, value)?;
                }
                ENV_TICK_INTERVAL_MS => {
                    self.tick_interval_ms = parse_var(ENV_TICK_INTERVAL_MS, value)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.countdown_seconds == 0 {
            return Err(PlaybackError::Config(
                "countdown_seconds must be at least 1".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(PlaybackError::Config(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PlaybackError::Config(format!("{key} has invalid value {value:?}")))
}
