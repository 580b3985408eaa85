//! Fern configuration system.
//!
//! This crate provides centralized configuration for Fern, loading settings
//! from `fern.toml` as an alternative to hard-coded defaults. Every section
//! is fully defaulted so an absent or partial file is always valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main configuration structure for Fern.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FernConfig {
    /// Animation engine settings.
    pub animation: AnimationConfig,
}

/// Animation engine configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration applied when a descriptor does not specify one, ms.
    pub default_duration_ms: f64,
    /// Damping ratio for spring-curve animations.
    pub spring_damping: f64,
    /// Initial velocity for spring-curve animations.
    pub spring_velocity: f64,
    /// Substitute for a requested scale factor of exactly zero; some native
    /// transform representations are singular at 0.
    pub zero_scale_epsilon: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 300.0,
            spring_damping: 0.2,
            spring_velocity: 0.0,
            zero_scale_epsilon: 1e-6,
        }
    }
}

impl FernConfig {
    /// Load configuration from a specific TOML file.
    ///
    /// Returns the defaults when the file does not exist or fails to parse.
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "config parse error, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from `fern.toml` in the current directory, falling
    /// back to defaults when absent.
    pub fn load() -> Self {
        Self::load_from_path(&Self::default_path())
    }

    /// The conventional configuration file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from("fern.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FernConfig::default();
        assert_eq!(config.animation.default_duration_ms, 300.0);
        assert_eq!(config.animation.spring_damping, 0.2);
        assert_eq!(config.animation.spring_velocity, 0.0);
        assert_eq!(config.animation.zero_scale_epsilon, 1e-6);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FernConfig = toml::from_str(
            r#"
            [animation]
            default_duration_ms = 450.0
            "#,
        )
        .unwrap();
        assert_eq!(config.animation.default_duration_ms, 450.0);
        assert_eq!(config.animation.spring_damping, 0.2);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = FernConfig::load_from_path(Path::new("/nonexistent/fern.toml"));
        assert_eq!(config.animation.default_duration_ms, 300.0);
    }
}
