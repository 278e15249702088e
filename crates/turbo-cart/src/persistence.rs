//! Durable storage of the cart's line list.
//!
//! The list is stored as one JSON array under a single versioned key.
//! Loading never fails: a missing key, unparseable bytes or any record
//! without a string `productId`, numeric `unitPrice` and numeric `quantity`
//! yields an empty cart. Writes that fail are logged and dropped; the
//! in-memory list stays authoritative.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use turbo_kv::{Cache, KvStore};

use crate::cart::{CartLineItem, Customization};
use crate::error::CartError;
use crate::ids::{ItemIdentity, ProductId};
use crate::money::{Currency, Money};

/// One line as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedLineItem {
    product_id: String,
    #[serde(default)]
    display_name: String,
    unit_price: f64,
    #[serde(deserialize_with = "lenient_quantity")]
    quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customization: Option<Customization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customization_cost: Option<f64>,
}

/// Accept any JSON number for a quantity; fractions are truncated.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    // `as` saturates and maps NaN to 0.
    Ok(raw.trunc() as i64)
}

impl PersistedLineItem {
    fn from_item(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            display_name: item.display_name.clone(),
            unit_price: item.unit_price.to_decimal(),
            quantity: item.quantity,
            image_ref: item.image_ref.clone(),
            customization: (!item.customization.is_empty()).then(|| item.customization.clone()),
            customization_cost: item.customization_cost.map(|c| c.to_decimal()),
        }
    }

    fn into_item(self, currency: Currency) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(self.product_id),
            display_name: self.display_name,
            image_ref: self.image_ref,
            unit_price: Money::from_decimal(self.unit_price, currency).non_negative(),
            quantity: self.quantity,
            customization: self.customization.unwrap_or_default(),
            customization_cost: self
                .customization_cost
                .map(|c| Money::from_decimal(c, currency).non_negative()),
        }
    }
}

/// Loads and saves the canonical line list.
pub struct PersistenceAdapter {
    cache: Cache<Arc<dyn KvStore>>,
    key: String,
    currency: Currency,
}

impl PersistenceAdapter {
    /// Adapter over `store`, persisting under `key`.
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>, currency: Currency) -> Self {
        Self {
            cache: Cache::new(store),
            key: key.into(),
            currency,
        }
    }

    /// The storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted list, falling back to an empty one.
    ///
    /// The result satisfies every line invariant: quantities are positive,
    /// prices non-negative and identities unique (duplicates are merged).
    pub fn load(&self) -> Vec<CartLineItem> {
        match self.try_load() {
            Ok(Some(records)) => self.normalize(records),
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted cart; starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "persisted cart unreadable; starting empty");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Vec<PersistedLineItem>>, CartError> {
        Ok(self.cache.get(&self.key)?)
    }

    fn normalize(&self, records: Vec<PersistedLineItem>) -> Vec<CartLineItem> {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(records.len());
        let mut positions: HashMap<ItemIdentity, usize> = HashMap::new();

        for record in records {
            let item = record.into_item(self.currency);
            if item.quantity < 1 {
                tracing::warn!(
                    product_id = %item.product_id,
                    quantity = item.quantity,
                    "dropping persisted line with non-positive quantity"
                );
                continue;
            }
            let identity = item.identity();
            match positions.get(&identity) {
                Some(&index) => {
                    let existing = &mut items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => {
                    positions.insert(identity, items.len());
                    items.push(item);
                }
            }
        }
        items
    }

    /// Write the full list. Returns whether the write succeeded.
    pub fn save(&self, items: &[CartLineItem]) -> bool {
        match self.try_save(items) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    lines = items.len(),
                    "failed to persist cart; keeping in-memory state"
                );
                false
            }
        }
    }

    fn try_save(&self, items: &[CartLineItem]) -> Result<(), CartError> {
        let records: Vec<PersistedLineItem> =
            items.iter().map(PersistedLineItem::from_item).collect();
        self.cache.set(&self.key, &records)?;
        Ok(())
    }
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("key", &self.key)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}
