//! Observer registry for cart snapshots.
//!
//! Listeners are called in registration order with a shared, immutable
//! snapshot. The registry lock is never held while a listener runs, so a
//! listener may subscribe, unsubscribe or mutate the cart from inside its
//! callback.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::cart::CartSnapshot;

/// Callback receiving every snapshot the bus broadcasts.
pub type Listener = dyn Fn(&Arc<CartSnapshot>) + Send + Sync;

#[derive(Default)]
struct Registry {
    next_id: u64,
    // Ids only grow, so key order is registration order.
    listeners: BTreeMap<u64, Arc<Listener>>,
}

/// Broadcasts snapshots to registered listeners.
#[derive(Clone, Default)]
pub struct SubscriptionBus {
    registry: Arc<Mutex<Registry>>,
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `listener` and immediately hand it `current`.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, current: &Arc<CartSnapshot>, listener: F) -> Subscription
    where
        F: Fn(&Arc<CartSnapshot>) + Send + Sync + 'static,
    {
        self.subscribe_with(|| Arc::clone(current), listener)
    }

    /// Like [`subscribe`](Self::subscribe), but the initial snapshot is taken
    /// only after the listener is registered, so no broadcast can fall
    /// between the two.
    pub fn subscribe_with<C, F>(&self, current: C, listener: F) -> Subscription
    where
        C: FnOnce() -> Arc<CartSnapshot>,
        F: Fn(&Arc<CartSnapshot>) + Send + Sync + 'static,
    {
        let listener: Arc<Listener> = Arc::new(listener);
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.insert(id, Arc::clone(&listener));
            id
        };
        tracing::trace!(listener = id, "cart listener subscribed");

        invoke(id, &listener, &current());

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Hand `snapshot` to every listener, in registration order.
    ///
    /// A listener that panics is logged and skipped; the rest still run.
    pub fn notify(&self, snapshot: &Arc<CartSnapshot>) {
        let listeners: Vec<(u64, Arc<Listener>)> = self
            .lock()
            .listeners
            .iter()
            .map(|(id, l)| (*id, Arc::clone(l)))
            .collect();

        for (id, listener) in &listeners {
            invoke(*id, listener, snapshot);
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

fn invoke(id: u64, listener: &Arc<Listener>, snapshot: &Arc<CartSnapshot>) {
    if catch_unwind(AssertUnwindSafe(|| listener(snapshot))).is_err() {
        tracing::error!(
            listener = id,
            version = snapshot.version,
            "cart listener panicked; continuing with remaining listeners"
        );
    }
}

/// Handle to a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Registration id, unique per bus.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&self.id);
            tracing::trace!(listener = self.id, "cart listener unsubscribed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot(version: u64) -> Arc<CartSnapshot> {
        Arc::new(CartSnapshot::new(Vec::new(), Currency::USD, version))
    }

    #[test]
    fn test_subscribe_delivers_current_snapshot() {
        let bus = SubscriptionBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = bus.subscribe(&snapshot(7), move |s| sink.lock().unwrap().push(s.version));

        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_notify_in_registration_order() {
        let bus = SubscriptionBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|n| {
                let order = Arc::clone(&order);
                bus.subscribe(&snapshot(0), move |s| {
                    if s.version > 0 {
                        order.lock().unwrap().push(n);
                    }
                })
            })
            .collect();

        bus.notify(&snapshot(1));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn test_unsubscribe_and_drop_remove_listener() {
        let bus = SubscriptionBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let a = bus.subscribe(&snapshot(0), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&calls);
        let b = bus.subscribe(&snapshot(0), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(bus.listener_count(), 2);
        assert_ne!(a.id(), b.id());

        a.unsubscribe();
        drop(b);
        assert_eq!(bus.listener_count(), 0);

        calls.store(0, Ordering::SeqCst);
        bus.notify(&snapshot(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_listener_does_not_starve_others() {
        let bus = SubscriptionBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let _bad = bus.subscribe(&snapshot(0), |s| {
            if s.version > 0 {
                panic!("render failed");
            }
        });
        let counter = Arc::clone(&calls);
        let _good = bus.subscribe(&snapshot(0), move |s| {
            if s.version > 0 {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        bus.notify(&snapshot(1));
        bus.notify(&snapshot(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notify() {
        let bus = SubscriptionBus::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&slot);
        let sub = bus.subscribe(&snapshot(0), move |s| {
            if s.version > 0 {
                inner.lock().unwrap().take();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        bus.notify(&snapshot(1));
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_bus_is_harmless() {
        let bus = SubscriptionBus::new();
        let sub = bus.subscribe(&snapshot(0), |_| {});
        drop(bus);
        drop(sub);
    }
}
