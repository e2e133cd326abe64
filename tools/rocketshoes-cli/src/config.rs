//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["rocketshoes.toml", ".rocketshoes.toml", "rocketshoes.json"];

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "ROCKETSHOES_API_URL";
/// Overrides `storage.path`.
pub const ENV_STORAGE_PATH: &str = "ROCKETSHOES_STORAGE_PATH";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply overrides from an environment lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH).filter(|v| !v.is_empty()) {
            self.storage.path = path;
        }
        self
    }

    /// Check the config, returning `(errors, warnings)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let url = self.api.base_url.trim();
        if url.is_empty() {
            errors.push("api.base_url is required".to_string());
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("api.base_url '{}' must start with http:// or https://", url));
        }

        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be greater than 0".to_string());
        } else if self.api.timeout_ms > 60_000 {
            warnings.push(format!("api.timeout_ms {} is unusually long", self.api.timeout_ms));
        }

        if self.storage.path.trim().is_empty() {
            errors.push("storage.path is required".to_string());
        }

        (errors, warnings)
    }
}

/// Catalog API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `products/:id` and `stock/:id`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding local storage, relative to the config file's directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    ".rocketshoes/storage.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Generate a default rocketshoes.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# RocketShoes cart configuration

[api]
# Server exposing products/:id and stock/:id
base_url = "{base_url}"
timeout_ms = {timeout_ms}

[storage]
# Where the cart is kept between runs
path = "{path}"
"#,
        base_url = default_base_url(),
        timeout_ms = default_timeout_ms(),
        path = default_storage_path(),
    )
}
