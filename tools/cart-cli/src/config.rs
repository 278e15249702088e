//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_cart::CartConfig;

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted cart, relative to the config file.
    #[serde(default = "default_dir")]
    pub dir: String,
}

fn default_dir() -> String {
    ".cart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    r#"# Cart configuration

[cart]
# Bump the suffix when the persisted record shape changes.
storage_key = "turbo-cart:v1"
currency = "USD"

[storage]
dir = ".cart"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_cart::Currency;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_sections_are_optional() {
        let config: CliConfig = toml::from_str("[cart]\ncurrency = \"EUR\"\n").unwrap();
        assert_eq!(config.cart.currency, Currency::EUR);
        assert_eq!(config.cart.storage_key, "turbo-cart:v1");
        assert_eq!(config.storage.dir, ".cart");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.storage.dir = "state".into();
        config.cart = config.cart.with_storage_key("shop:v2");

        for name in ["cart.toml", "cart.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(CliConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "[cart\n").unwrap();
        assert!(CliConfig::load(&path).is_err());
    }
}
