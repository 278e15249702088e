//! Per-surface view of the shared cart.
//!
//! A `ViewBinding` is what a header badge, a mini-cart drawer or a checkout
//! summary holds. It keeps the latest snapshot it was handed, forwards every
//! mutation to the shared [`CartStore`], and stops listening when detached or
//! dropped. It never owns cart data of its own.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cart::{CartSnapshot, CartStore, Customization, LineItemCandidate};
use crate::ids::ItemIdentity;
use crate::subscription::Subscription;

/// Re-render hook, called with each new snapshot.
pub type ChangeHandler = dyn Fn(&CartSnapshot) + Send + Sync;

#[derive(Default)]
struct ViewState {
    latest: Option<Arc<CartSnapshot>>,
    on_change: Option<Arc<ChangeHandler>>,
}

/// A UI surface's handle on the cart.
pub struct ViewBinding {
    store: Arc<CartStore>,
    view: Arc<Mutex<ViewState>>,
    subscription: Subscription,
}

fn lock(view: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ViewBinding {
    /// Attach to `store`. The binding is loaded as soon as this returns.
    pub fn attach(store: Arc<CartStore>) -> Self {
        Self::build(store, None)
    }

    /// Attach with a re-render hook that also receives the initial snapshot.
    pub fn attach_with<F>(store: Arc<CartStore>, on_change: F) -> Self
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        Self::build(store, Some(Arc::new(on_change)))
    }

    fn build(store: Arc<CartStore>, on_change: Option<Arc<ChangeHandler>>) -> Self {
        let view = Arc::new(Mutex::new(ViewState {
            latest: None,
            on_change,
        }));

        let sink = Arc::clone(&view);
        let subscription = store.subscribe(move |snapshot| {
            let handler = {
                let mut state = lock(&sink);
                // A nested mutation can deliver a newer snapshot before an
                // older broadcast reaches this view; keep the newest.
                if state
                    .latest
                    .as_ref()
                    .is_some_and(|current| current.version > snapshot.version)
                {
                    return;
                }
                state.latest = Some(Arc::clone(snapshot));
                state.on_change.clone()
            };
            if let Some(handler) = handler {
                handler(snapshot);
            }
        });

        Self {
            store,
            view,
            subscription,
        }
    }

    /// Replace the re-render hook. It fires on the next mutation.
    pub fn on_change<F>(&self, on_change: F)
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        lock(&self.view).on_change = Some(Arc::new(on_change));
    }

    /// Whether the first snapshot has arrived.
    pub fn loaded(&self) -> bool {
        lock(&self.view).latest.is_some()
    }

    /// Latest snapshot this view has received.
    pub fn snapshot(&self) -> Arc<CartSnapshot> {
        match &lock(&self.view).latest {
            Some(snapshot) => Arc::clone(snapshot),
            None => self.store.snapshot(),
        }
    }

    /// The shared store behind this view.
    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }

    pub fn add_item(&self, candidate: LineItemCandidate) -> ItemIdentity {
        self.store.add_item(candidate)
    }

    pub fn remove_item(&self, identity: &ItemIdentity) {
        self.store.remove_item(identity);
    }

    pub fn update_quantity(&self, identity: &ItemIdentity, quantity: i64) {
        self.store.update_quantity(identity, quantity);
    }

    pub fn update_customization(
        &self,
        identity: &ItemIdentity,
        customization: Customization,
    ) -> Option<ItemIdentity> {
        self.store.update_customization(identity, customization)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Stop listening. Same as dropping the binding.
    pub fn detach(self) {}
}

impl std::fmt::Debug for ViewBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBinding")
            .field("loaded", &self.loaded())
            .field("subscription", &self.subscription)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mug() -> LineItemCandidate {
        LineItemCandidate::new("p1", "Mug", Money::new(250, Currency::USD))
    }

    #[test]
    fn test_attach_loads_immediately() {
        let store = CartStore::in_memory();
        store.add_item(mug());

        let view = ViewBinding::attach(Arc::clone(&store));
        assert!(view.loaded());
        assert_eq!(view.snapshot().total_items, 1);
    }

    #[test]
    fn test_views_never_diverge() {
        let store = CartStore::in_memory();
        let header = ViewBinding::attach(Arc::clone(&store));
        let drawer = ViewBinding::attach(Arc::clone(&store));

        let id = header.add_item(mug());
        drawer.update_quantity(&id, 4);

        assert_eq!(header.snapshot(), drawer.snapshot());
        assert_eq!(header.snapshot().total_items, 4);
        assert_eq!(*header.snapshot(), *store.snapshot());
    }

    #[test]
    fn test_on_change_fires_for_each_mutation() {
        let store = CartStore::in_memory();
        let renders = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&renders);
        let view = ViewBinding::attach_with(Arc::clone(&store), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(renders.load(Ordering::SeqCst), 1);

        let id = view.add_item(mug());
        view.update_customization(&id, Customization::new().with("color", "red"));
        view.clear();
        assert_eq!(renders.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_replacing_hook() {
        let store = CartStore::in_memory();
        let view = ViewBinding::attach(Arc::clone(&store));
        let last_total = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&last_total);
        view.on_change(move |s| *sink.lock().unwrap() = s.total_items);

        store.add_item(mug().with_quantity(3));
        assert_eq!(*last_total.lock().unwrap(), 3);
    }

    #[test]
    fn test_detach_unsubscribes() {
        let store = CartStore::in_memory();
        let view = ViewBinding::attach(Arc::clone(&store));
        let other = ViewBinding::attach(Arc::clone(&store));
        assert_eq!(store.listener_count(), 2);

        view.detach();
        drop(other);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_remove_via_binding() {
        let store = CartStore::in_memory();
        let view = ViewBinding::attach(Arc::clone(&store));
        let id = view.add_item(mug());
        view.remove_item(&id);
        assert!(view.snapshot().is_empty());
    }
}
