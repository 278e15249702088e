//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_cart::CartStore;
use turbo_kv::FileStore;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names, searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Config file the settings came from, if any.
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

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, Path::new(path));
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        tracing::debug!(config = ?config_path, "loaded cli config");
        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the cart is persisted in.
    ///
    /// Relative paths are taken from the config file's directory, or the
    /// working directory when no config file was found.
    pub fn storage_dir(&self) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd);
        resolve(base, Path::new(&self.config.storage.dir))
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<Arc<CartStore>> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        Ok(CartStore::open(store, &self.config.cart))
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.exists() {
                match CliConfig::load(&path) {
                    Ok(config) => return Some((config, path)),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable config"),
                }
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(".cart.toml"), "[storage]\ndir = \"state\"\n").unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = find_config(&nested).unwrap();
        assert_eq!(config.storage.dir, "state");
        assert_eq!(path, root.path().join(".cart.toml"));
    }

    #[test]
    fn test_storage_dir_is_relative_to_config() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: Some(root.path().join("cart.toml")),
            output: Output::new(false, true),
            cwd: root.path().join("sub"),
        };
        assert_eq!(ctx.storage_dir(), root.path().join(".cart"));
    }

    #[test]
    fn test_open_cart_persists_between_opens() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: root.path().to_path_buf(),
        };

        let cart = ctx.open_cart().unwrap();
        cart.add_item(turbo_cart::LineItemCandidate::new(
            "p1",
            "Mug",
            turbo_cart::Money::new(250, turbo_cart::Currency::USD),
        ));
        drop(cart);

        assert_eq!(ctx.open_cart().unwrap().snapshot().total_items, 1);
    }
}
