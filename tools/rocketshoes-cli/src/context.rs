//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use rocketshoes_cache::FileStore;
use rocketshoes_commerce::catalog::HttpCatalog;
use rocketshoes_commerce::notify::RecordingNotifier;
use rocketshoes_commerce::CartStore;
use rocketshoes_data::FetchClient;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Cart store as wired up by the CLI.
pub type CliCartStore = CartStore<HttpCatalog, FileStore, Arc<RecordingNotifier>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the config was loaded from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve(&cwd, path)),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok());

        tracing::debug!(
            config = ?config_path,
            base_url = %config.api.base_url,
            "configuration loaded"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory relative paths in the config resolve against.
    pub fn base_dir(&self) -> &Path {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd)
    }

    /// Absolute path of the storage file.
    pub fn storage_path(&self) -> PathBuf {
        resolve(self.base_dir(), &self.config.storage.path)
    }

    /// Build the cart store from configuration.
    ///
    /// Refuses to build from a config that fails validation.
    pub fn cart_store(&self, notifier: Arc<RecordingNotifier>) -> Result<CliCartStore> {
        let (errors, _) = self.config.validate();
        if !errors.is_empty() {
            bail!("Invalid configuration: {}", errors.join("; "));
        }

        let client = FetchClient::new()
            .with_base_url(self.config.api.base_url.clone())
            .with_timeout(self.config.api.timeout())
            .with_default_header("Accept", "application/json");
        let storage_path = self.storage_path();
        let storage = FileStore::open(&storage_path)
            .with_context(|| format!("Failed to open storage: {}", storage_path.display()))?;

        Ok(CartStore::load(HttpCatalog::new(client), storage, notifier))
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
