//! Configuration loader
//!
//! Handles loading configuration from TOML files, environment variables,
//! and default values through Figment.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use persist_domain::error::{Error, Result};

use crate::config::{AppConfig, RegistryConfig, ServiceBinding};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix, nested keys separated by `__`
    ///    (e.g., `PERSIST_LOGGING__LEVEL`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let path = self
            .config_path
            .clone()
            .or_else(Self::find_default_config_path);
        if let Some(config_path) = path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(&config_path));
                log_config_loaded(&config_path, true);
            } else {
                log_config_loaded(&config_path, false);
            }
        }

        figment = figment
            .merge(Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    validate_registry_config(&config.registry)?;

    let cache = &config.metadata.cache;
    if cache.stores_entries() && cache.ttl_secs == 0 {
        return Err(Error::configuration(
            "Metadata cache TTL cannot be 0 when the cache is enabled",
        ));
    }
    if cache.stores_entries() && cache.max_capacity == 0 {
        return Err(Error::configuration(
            "Metadata cache capacity cannot be 0 when the cache is enabled",
        ));
    }
    Ok(())
}

fn validate_registry_config(config: &RegistryConfig) -> Result<()> {
    validate_bindings("connection", &config.connections, &config.default_connection)?;
    validate_bindings("manager", &config.managers, &config.default_manager)?;

    let mut aliases = HashSet::new();
    for binding in &config.aliases {
        if binding.alias.is_empty() || binding.alias.contains(':') {
            return Err(Error::configuration(format!(
                "Invalid namespace alias '{}'",
                binding.alias
            )));
        }
        if !aliases.insert(binding.alias.as_str()) {
            return Err(Error::configuration(format!(
                "Namespace alias '{}' is declared twice",
                binding.alias
            )));
        }
    }
    Ok(())
}

fn validate_bindings(kind: &str, bindings: &[ServiceBinding], default: &str) -> Result<()> {
    let mut names = HashSet::new();
    for binding in bindings {
        if !names.insert(binding.name.as_str()) {
            return Err(Error::configuration(format!(
                "The {kind} name '{}' is declared twice",
                binding.name
            )));
        }
    }
    if !names.contains(default) {
        return Err(Error::configuration(format!(
            "Default {kind} '{default}' is not a registered {kind}"
        )));
    }
    Ok(())
}
