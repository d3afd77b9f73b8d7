//! Change notifications for cart and filter state.
//!
//! An [`EventBus`] is created explicitly and handed to the services that
//! publish on it. Dispatch is synchronous: `publish` calls every listener that
//! is registered at that moment, in registration order, before returning.
//! Nothing is queued, so a listener registered after an event misses it, and a
//! listener unsubscribed by an earlier listener in the same dispatch is skipped.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use gamershop_storefront::events::{EventBus, StoreEvent};
//!
//! let bus = EventBus::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let subscription = bus.subscribe(move |event: &StoreEvent| {
//!     sink.lock().unwrap().push(event.name());
//! });
//!
//! bus.publish(&StoreEvent::CartUpdated);
//! drop(subscription);
//! bus.publish(&StoreEvent::CartUpdated);
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["cartUpdated"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use gamershop_core::FilterState;

/// Browser event name for cart changes.
pub const CART_UPDATED: &str = "cartUpdated";

/// Browser event name for filter changes.
pub const FILTERS_UPDATED: &str = "filtersUpdated";

/// A state change worth telling other components about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The cart changed. Listeners re-read the cart themselves.
    CartUpdated,
    /// The filters changed; carries the complete new state.
    FiltersUpdated(FilterState),
}

impl StoreEvent {
    /// Event name as seen by the browser.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CartUpdated => CART_UPDATED,
            Self::FiltersUpdated(_) => FILTERS_UPDATED,
        }
    }
}

type Listener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// Synchronous publish/subscribe hub.
///
/// Cheap to clone; clones share the same listeners.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// Create a bus with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or cancelled.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Arc::new(listener));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every current listener in registration order.
    pub fn publish(&self, event: &StoreEvent) {
        // Snapshot first so listeners can (un)subscribe without deadlocking.
        let listeners: Vec<(u64, Listener)> = self
            .lock()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        tracing::debug!(
            event = event.name(),
            listeners = listeners.len(),
            "Publishing store event"
        );

        for (id, listener) in listeners {
            if self.lock().listeners.contains_key(&id) {
                listener(event);
            }
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration guard returned by [`EventBus::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&self.id);
        }
    }
}
