//! The authoritative cart.
//!
//! One `CartStore` exists per storefront session and is shared (via `Arc`)
//! by every view. Each mutation is applied under a single lock, written to
//! storage, and only then broadcast, so listeners never see state that has
//! not at least been offered to persistence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use turbo_kv::{KvStore, MemoryStore};

use crate::cart::{identity, CartLineItem, CartSnapshot, Customization, LineItemCandidate};
use crate::config::CartConfig;
use crate::ids::ItemIdentity;
use crate::money::Currency;
use crate::persistence::PersistenceAdapter;
use crate::subscription::{Subscription, SubscriptionBus};

struct CartState {
    items: Vec<CartLineItem>,
    version: u64,
}

impl CartState {
    fn position(&self, identity: &ItemIdentity) -> Option<usize> {
        self.items.iter().position(|item| &item.identity() == identity)
    }
}

/// Outcome of a mutation closure.
enum Applied {
    Changed,
    Unchanged,
}

/// Shared cart state engine.
///
/// # Example
///
/// ```
/// use turbo_cart::prelude::*;
///
/// let cart = CartStore::in_memory();
/// let mug = LineItemCandidate::new("p1", "Mug", Money::from_decimal(250.0, Currency::USD));
/// cart.add_item(mug.clone());
/// cart.add_item(mug.with_quantity(2));
///
/// let snapshot = cart.snapshot();
/// assert_eq!(snapshot.unique_item_count(), 1);
/// assert_eq!(snapshot.total_items, 3);
/// assert_eq!(snapshot.total_price.to_decimal(), 750.0);
/// ```
pub struct CartStore {
    state: Mutex<CartState>,
    persistence: PersistenceAdapter,
    bus: SubscriptionBus,
    currency: Currency,
}

impl CartStore {
    /// Hydrate a store from `store` using `config`.
    ///
    /// Never fails: unreadable storage yields an empty cart.
    pub fn open(store: impl KvStore + 'static, config: &CartConfig) -> Arc<Self> {
        let persistence =
            PersistenceAdapter::new(Arc::new(store), config.storage_key.clone(), config.currency);
        let items = persistence.load();
        tracing::debug!(
            key = persistence.key(),
            lines = items.len(),
            "cart hydrated"
        );

        Arc::new(Self {
            state: Mutex::new(CartState { items, version: 0 }),
            persistence,
            bus: SubscriptionBus::new(),
            currency: config.currency,
        })
    }

    /// A store backed by fresh in-process storage.
    pub fn in_memory() -> Arc<Self> {
        Self::open(MemoryStore::new(), &CartConfig::default())
    }

    /// Currency all amounts are expressed in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(&self, state: &CartState) -> Arc<CartSnapshot> {
        Arc::new(CartSnapshot::new(
            state.items.clone(),
            self.currency,
            state.version,
        ))
    }

    /// Apply `f` atomically; on change, persist then broadcast.
    fn mutate<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce(&mut Vec<CartLineItem>) -> Applied,
    {
        let snapshot = {
            let mut state = self.lock();
            if let Applied::Unchanged = f(&mut state.items) {
                tracing::trace!(op, "cart mutation was a no-op");
                return;
            }
            state.version += 1;
            // Written under the lock so storage sees mutations in order.
            self.persistence.save(&state.items);
            self.snapshot_of(&state)
        };

        tracing::debug!(
            op,
            version = snapshot.version,
            lines = snapshot.items.len(),
            total_items = snapshot.total_items,
            "cart mutated"
        );
        self.bus.notify(&snapshot);
    }

    /// Add a candidate, merging into an existing line with the same identity.
    ///
    /// A quantity below 1 counts as 1 and a negative price as 0. Returns the
    /// identity of the line that now holds the candidate.
    pub fn add_item(&self, candidate: LineItemCandidate) -> ItemIdentity {
        let identity = candidate.identity();
        let added = candidate.quantity.max(1);
        let currency = self.currency;
        let key = identity.clone();

        self.mutate("add_item", move |items| {
            if let Some(existing) = items.iter_mut().find(|item| item.identity() == key) {
                existing.quantity = existing.quantity.saturating_add(added);
                return Applied::Changed;
            }

            if candidate.unit_price.currency != currency {
                tracing::warn!(
                    product_id = %candidate.product_id,
                    given = %candidate.unit_price.currency,
                    cart = %currency,
                    "candidate price in foreign currency; relabelling"
                );
            }
            items.push(CartLineItem {
                product_id: candidate.product_id,
                display_name: candidate.display_name,
                image_ref: candidate.image_ref,
                unit_price: candidate.unit_price.relabel(currency).non_negative(),
                quantity: added,
                customization: candidate.customization.unwrap_or_default(),
                customization_cost: candidate
                    .customization_cost
                    .map(|cost| cost.relabel(currency).non_negative()),
            });
            Applied::Changed
        });
        identity
    }

    /// Drop the line stored under `identity`. No-op if absent.
    pub fn remove_item(&self, identity: &ItemIdentity) {
        self.mutate("remove_item", |items| {
            let before = items.len();
            items.retain(|item| &item.identity() != identity);
            if items.len() < before {
                Applied::Changed
            } else {
                Applied::Unchanged
            }
        });
    }

    /// Set a line's quantity. Zero or negative removes the line.
    pub fn update_quantity(&self, identity: &ItemIdentity, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(identity);
            return;
        }

        self.mutate("update_quantity", |items| {
            match items.iter_mut().find(|item| &item.identity() == identity) {
                Some(item) if item.quantity != quantity => {
                    item.quantity = quantity;
                    Applied::Changed
                }
                _ => Applied::Unchanged,
            }
        });
    }

    /// Replace a line's customization, moving it to its new identity.
    ///
    /// If another line already lives at the new identity the two are merged
    /// (quantities added, the moved line discarded). Returns the identity the
    /// line ends up under, or `None` if `identity` was not in the cart.
    pub fn update_customization(
        &self,
        identity: &ItemIdentity,
        customization: Customization,
    ) -> Option<ItemIdentity> {
        let mut target = None;

        self.mutate("update_customization", |items| {
            let Some(from) = items.iter().position(|item| &item.identity() == identity) else {
                return Applied::Unchanged;
            };

            let new_identity = identity_for(&items[from], &customization);
            target = Some(new_identity.clone());
            if &new_identity == identity {
                return Applied::Unchanged;
            }

            match items.iter().position(|item| item.identity() == new_identity) {
                Some(into) => {
                    let moved = items.remove(from);
                    // `remove` shifts later lines down by one.
                    let into = if into > from { into - 1 } else { into };
                    let existing = &mut items[into];
                    existing.quantity = existing.quantity.saturating_add(moved.quantity.max(1));
                }
                None => items[from].customization = customization,
            }
            Applied::Changed
        });

        target
    }

    /// Empty the cart. Always rewrites storage, even if already empty.
    pub fn clear(&self) {
        self.mutate("clear", |items| {
            items.clear();
            Applied::Changed
        });
    }

    /// Immutable copy of the current items and totals.
    pub fn snapshot(&self) -> Arc<CartSnapshot> {
        let state = self.lock();
        self.snapshot_of(&state)
    }

    /// Whether a line with `identity` exists.
    pub fn contains(&self, identity: &ItemIdentity) -> bool {
        self.lock().position(identity).is_some()
    }

    /// Quantity of the line stored under `identity`, if any.
    pub fn quantity_of(&self, identity: &ItemIdentity) -> Option<i64> {
        let state = self.lock();
        state.position(identity).map(|i| state.items[i].quantity)
    }

    /// Register a listener; it is called at once with the current snapshot
    /// and then after every mutation until the returned handle is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Arc<CartSnapshot>) + Send + Sync + 'static,
    {
        self.bus.subscribe_with(|| self.snapshot(), listener)
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

fn identity_for(item: &CartLineItem, customization: &Customization) -> ItemIdentity {
    identity(&item.product_id, Some(customization))
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CartStore")
            .field("lines", &state.items.len())
            .field("version", &state.version)
            .field("persistence", &self.persistence)
            .field("listeners", &self.bus.listener_count())
            .finish()
    }
}
