mod loader;
pub mod secrets;
pub mod typed;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use secrets::{DefaultSecretResolver, SecretResolver};
pub use typed::ConfigProperties;
pub use value::{ConfigValue, FromConfigValue};

/// Env var that overrides the profile passed to [`SeeConfig::load`].
pub const PROFILE_ENV: &str = "SEE_PROFILE";

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from YAML files, `.env` files, and environment variables.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` and `.env.{profile}` (loaded into the process environment,
///    never overwriting variables that are already set)
/// 4. Environment variables (`DATABASE_URL` overrides `database.url`; keys
///    declared in a file with underscores, like `database.max_connections`,
///    are reached through `DATABASE_MAX_CONNECTIONS`)
///
/// `${...}` placeholders in string values are resolved after the files are
/// read and before the environment overlay.
#[derive(Debug, Clone)]
pub struct SeeConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl SeeConfig {
    /// Load configuration for `profile` from the current working directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."), profile, &DefaultSecretResolver)
    }

    /// Load configuration from `dir` with a custom secret resolver.
    pub fn load_from(
        dir: &Path,
        profile: &str,
        resolver: &dyn SecretResolver,
    ) -> Result<Self, ConfigError> {
        let active_profile = std::env::var(PROFILE_ENV).unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();
        loader::load_yaml_file(&dir.join("application.yaml"), &mut values)?;
        loader::load_yaml_file(
            &dir.join(format!("application-{active_profile}.yaml")),
            &mut values,
        )?;

        let _ = dotenvy::from_path(dir.join(".env"));
        let _ = dotenvy::from_path(dir.join(format!(".env.{active_profile}")));

        resolve_string_values(&mut values, resolver)?;

        // `DATABASE_MAX_CONNECTIONS` must reach `database.max_connections`, so
        // keys that already contain `_` are matched in their underscored form.
        let underscored: HashMap<String, String> = values
            .keys()
            .filter(|key| key.contains('_'))
            .map(|key| (key.replace('.', "_"), key.clone()))
            .collect();
        for (env_key, env_val) in std::env::vars() {
            let env_key = env_key.to_lowercase();
            let config_key = underscored
                .get(&env_key)
                .cloned()
                .unwrap_or_else(|| env_key.replace('_', "."));
            values.insert(config_key, ConfigValue::String(env_val));
        }

        tracing::debug!(profile = %active_profile, keys = values.len(), "configuration loaded");

        Ok(SeeConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string. No files or env vars are read.
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(SeeConfig {
            values,
            profile: profile.to_string(),
        })
    }

    pub fn empty() -> Self {
        SeeConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Set a value programmatically.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Get a typed value, returning `default` if the key is missing or malformed.
    pub fn get_or<V: FromConfigValue>(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Build a typed section from this config.
    pub fn section<C: ConfigProperties>(&self) -> Result<C, ConfigError> {
        C::from_config(self)
    }
}

fn resolve_string_values(
    values: &mut HashMap<String, ConfigValue>,
    resolver: &dyn SecretResolver,
) -> Result<(), ConfigError> {
    for value in values.values_mut() {
        if let ConfigValue::String(s) = value {
            if s.contains("${") {
                *s = secrets::resolve_placeholders(s, resolver)?;
            }
        }
    }
    Ok(())
}
