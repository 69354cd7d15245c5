//! Layered application configuration.
//!
//! Sources, lowest priority first:
//! 1. `application.yaml`
//! 2. `application-{profile}.yaml`
//! 3. `.env` and `.env.{profile}` (loaded into the process environment,
//!    never overriding variables that are already set)
//! 4. environment variables, `OPENAPI_TITLE` → `openapi.title`
//!
//! The profile is `OPENROUTE_PROFILE` if set, else the argument to
//! [`AppConfig::load`].

mod loader;
pub mod value;

use std::path::{Path, PathBuf};

use tracing::debug;

pub use value::{ConfigValue, FromConfigValue};

/// Errors raised while loading or reading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No value under this key.
    NotFound(String),
    /// The value exists but does not convert to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// A source file could not be read or parsed.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const PROFILE_ENV: &str = "OPENROUTE_PROFILE";

#[derive(Debug, Clone)]
pub struct AppConfig {
    values: loader::Values,
    profile: String,
}

impl AppConfig {
    /// Load from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(".", profile)
    }

    /// Load from `dir`, overlaying the process environment.
    pub fn load_from(dir: impl AsRef<Path>, profile: &str) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());
        let mut values = loader::Values::new();

        for file in [
            PathBuf::from("application.yaml"),
            PathBuf::from(format!("application-{profile}.yaml")),
        ] {
            if loader::merge_yaml_file(&dir.join(&file), &mut values)? {
                debug!(file = %file.display(), "loaded configuration file");
            }
        }

        // Missing .env files are expected.
        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{profile}")));

        loader::overlay_env(std::env::vars(), &mut values);

        Ok(Self { values, profile })
    }

    /// Build from YAML text only; no files, no environment.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = loader::Values::new();
        loader::merge_yaml_str(yaml, &mut values)?;
        Ok(Self {
            values,
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        Self {
            values: loader::Values::new(),
            profile: "test".to_string(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Read and convert the value at a dot-separated key.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Like [`get`](Self::get), falling back to `default` on any error.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Like [`get`](Self::get), but a missing key is `Ok(None)`.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.values.get(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }
}
