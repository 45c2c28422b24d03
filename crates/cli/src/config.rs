//! Journey configuration sources.
//!
//! Precedence, lowest first: built-in defaults, the `--config` TOML file,
//! command-line flags and environment, then per-request overrides.

use std::path::{Path, PathBuf};

use careline_core::{JourneyConfig, JourneyError};
use log::debug;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("error reading '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] JourneyError),
}

/// Defaults, overlaid with the TOML file when one is given.
pub(crate) fn load(path: Option<&Path>) -> Result<JourneyConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(JourneyConfig::default());
    };
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: JourneyConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Values that replace the loaded configuration when present.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) weeks: Option<u32>,
}

impl Overrides {
    pub(crate) fn apply(self, mut config: JourneyConfig) -> Result<JourneyConfig, JourneyError> {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careline_core::{DriftPolicy, ExhaustionStrategy};
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(load(None).unwrap(), JourneyConfig::default());
    }

    #[test]
    fn toml_overlays_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "weeks = 12\nseed = 9\nexhaustion = \"stamp\"\ndrift = \"always\""
        )
        .unwrap();
        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.weeks, 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.exhaustion, ExhaustionStrategy::Stamp);
        assert_eq!(config.drift, DriftPolicy::Always);
        assert_eq!(config.diagnostic_interval, 12);
    }

    #[test]
    fn invalid_toml_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "check_in_probability = 2.0").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn overrides_win_and_are_validated() {
        let base = JourneyConfig::default();
        let config = Overrides {
            seed: Some(4),
            weeks: Some(6),
        }
        .apply(base.clone())
        .unwrap();
        assert_eq!((config.seed, config.weeks), (Some(4), 6));

        let err = Overrides {
            seed: None,
            weeks: Some(0),
        }
        .apply(base)
        .unwrap_err();
        assert!(err.to_string().contains("weeks"));
    }
}
