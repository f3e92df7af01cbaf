// config.rs — slider ranges and runtime options
//
// Resolution order for the config file:
//   1) --config <path>
//   2) SPHERICAL_VIZ_CONFIG
//   3) <exe_dir>/assets/config.json, then ./assets/config.json
// An explicitly named file must load; the default locations are optional.
//
// Language: --lang <code>, then SPHERICAL_VIZ_LANG, then the config file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sweep::FanClosure;

pub const CONFIG_ENV: &str = "SPHERICAL_VIZ_CONFIG";
pub const LANG_ENV: &str = "SPHERICAL_VIZ_LANG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("slider '{name}' has invalid range [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("axis length must be positive and finite, got {0}")]
    InvalidAxisLength(f32),
}

/// Closed range of a slider widget.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Finite, ordered, and inside `[lo, hi]`.
    fn validate(&self, name: &'static str, lo: f32, hi: f32) -> Result<(), ConfigError> {
        let ordered = self.min.is_finite() && self.max.is_finite() && self.min <= self.max;
        if !ordered || self.min < lo || self.max > hi {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub radius: SliderRange,
    pub theta: SliderRange,
    pub phi: SliderRange,
    pub transparency: SliderRange,
    pub fan_closure: FanClosure,
    pub axis_length: f32,
    pub language: String,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            radius: SliderRange::new(0.0, 5.0),
            theta: SliderRange::new(0.0, 360.0),
            phi: SliderRange::new(0.0, 180.0),
            transparency: SliderRange::new(0.0, 0.5),
            fan_closure: FanClosure::DuplicateFirst,
            axis_length: 5.0,
            language: "en".to_string(),
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // θ is capped at one full turn so each fan fits the 180° sweep buffers.
        self.radius.validate("radius", 0.0, f32::MAX)?;
        self.theta.validate("theta", 0.0, 360.0)?;
        self.phi.validate("phi", 0.0, 180.0)?;
        self.transparency.validate("transparency", 0.0, 1.0)?;
        if !(self.axis_length.is_finite() && self.axis_length > 0.0) {
            return Err(ConfigError::InvalidAxisLength(self.axis_length));
        }
        Ok(())
    }

    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Resolve the config from CLI args and environment.
    pub fn resolve(args: &[String]) -> Result<Self, ConfigError> {
        let explicit = flag_value(args, "--config")
            .map(PathBuf::from)
            .or_else(|| env_value(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                let config = Self::load(&path)?;
                log::info!("loaded config from {}", path.display());
                config
            }
            None => match find_default_config() {
                Some(path) => match Self::load(&path) {
                    Ok(config) => {
                        log::info!("loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("{e}; using built-in defaults");
                        Self::default()
                    }
                },
                None => Self::default(),
            },
        };

        if let Some(lang) = flag_value(args, "--lang").or_else(|| env_value(LANG_ENV)) {
            config.language = lang;
        }

        Ok(config)
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == flag {
            return it.next().cloned();
        }
        if let Some(v) = a.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
            return Some(v.to_string());
        }
    }
    None
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Search `<exe_dir>/<rel>` then `./<rel>`.
pub fn find_asset(rel: &Path) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join(rel);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from(rel);
    if p.exists() {
        return Some(p);
    }

    None
}

fn find_default_config() -> Option<PathBuf> {
    find_asset(&Path::new("assets").join("config.json"))
}
