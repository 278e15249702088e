//! Shared cart state engine for TurboCommerce storefronts.
//!
//! Every surface that shows or edits the cart (header badge, product page,
//! mini-cart drawer, checkout summary) works against one [`CartStore`] per
//! session:
//!
//! - **Identity**: a line is keyed by product id plus a canonical form of its
//!   customization, so re-adding the same configuration merges quantities.
//! - **Totals**: item count and price are recomputed for every snapshot.
//! - **Persistence**: the line list survives reloads through a
//!   [`turbo_kv::KvStore`]; damaged storage loads as an empty cart.
//! - **Subscriptions**: every mutation is broadcast to all listeners, and
//!   [`ViewBinding`]s keep each surface's projection current.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use turbo_cart::prelude::*;
//! use turbo_kv::MemoryStore;
//!
//! let session_storage = MemoryStore::new();
//! let cart = CartStore::open(session_storage.clone(), &CartConfig::default());
//!
//! // Two surfaces share the same cart.
//! let product_page = ViewBinding::attach(Arc::clone(&cart));
//! let header_badge = ViewBinding::attach(Arc::clone(&cart));
//!
//! let tee = LineItemCandidate::new("tee", "T-Shirt", Money::from_decimal(20.0, Currency::USD))
//!     .with_customization(Customization::new().with("size", "M"));
//! product_page.add_item(tee);
//! assert_eq!(header_badge.snapshot().total_items, 1);
//!
//! // A reload hydrates from the same storage.
//! let reloaded = CartStore::open(session_storage, &CartConfig::default());
//! assert_eq!(reloaded.snapshot().items, cart.snapshot().items);
//! ```

pub mod binding;
pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod persistence;
pub mod subscription;

pub use binding::ViewBinding;
pub use cart::{CartLineItem, CartSnapshot, CartStore, Customization, LineItemCandidate};
pub use config::CartConfig;
pub use error::CartError;
pub use ids::{ItemIdentity, ProductId};
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::binding::ViewBinding;
    pub use crate::cart::{
        identity, CartLineItem, CartSnapshot, CartStore, Customization, LineItemCandidate,
    };
    pub use crate::config::CartConfig;
    pub use crate::error::CartError;
    pub use crate::ids::{ItemIdentity, ProductId};
    pub use crate::money::{Currency, Money};
    pub use crate::subscription::Subscription;
}
