//! Shopping cart module.
//!
//! Contains line items, identity resolution, totals, snapshots and the
//! shared store.

mod line_item;
mod resolver;
mod snapshot;
mod store;
pub mod totals;

pub use line_item::{CartLineItem, LineItemCandidate};
pub use resolver::{identity, Customization};
pub use snapshot::CartSnapshot;
pub use store::CartStore;
