//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::money::Currency;

/// Default storage key. Bump the version suffix whenever the persisted
/// record shape changes incompatibly.
pub const DEFAULT_STORAGE_KEY: &str = "turbo-cart:v1";

/// Settings for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key the line-item list is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Currency every amount in the cart is denominated in.
    #[serde(default)]
    pub currency: Currency,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency: Currency::default(),
        }
    }
}

impl CartConfig {
    /// Load config from a TOML or JSON file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CartError::Config(format!("{}: {e}", path.display())))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Parse config from a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, CartError> {
        Ok(toml::from_str(content)?)
    }

    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}
