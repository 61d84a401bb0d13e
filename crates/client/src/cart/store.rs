//! The cart store: single writer of [`CartState`].
//!
//! Readers never touch the state directly; they hold a
//! [`watch::Receiver`] obtained from [`CartStore::subscribe`] and see a new
//! snapshot after every transition that changed something. Every changed
//! state is written through the persistence boundary before it is broadcast.

use tokio::sync::watch;
use tracing::{debug, warn};

use shopfront_core::ProductId;

use super::action::{CartAction, CartProduct};
use super::state::{CartState, Transition};
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, PersistOutcome};

/// Storage key of the persisted cart record.
pub const CART_STORAGE_KEY: &str = "cart";

/// What happened when an action was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether the state changed.
    pub transition: Transition,
    /// Result of persisting the new state; `None` when nothing changed.
    pub persistence: Option<PersistOutcome>,
}

/// Owns the cart and persists it after every change.
pub struct CartStore<S> {
    storage: S,
    state: watch::Sender<CartState>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the store, restoring the last persisted cart.
    ///
    /// Missing, unreadable, or corrupt records yield an empty cart.
    pub fn open(storage: S) -> Self {
        let restored = restore(&storage);
        debug!(
            item_count = restored.item_count(),
            total = %restored.total(),
            "Cart restored"
        );
        let (state, _) = watch::channel(restored);
        Self { storage, state }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Subscribe to cart snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Apply an action, persist the result, then broadcast it.
    ///
    /// Persistence failures are logged and reported in the outcome; the new
    /// in-memory state is kept regardless.
    pub fn dispatch(&mut self, action: CartAction) -> DispatchOutcome {
        let name = action.name();
        match action.product_id() {
            Some(id) => add_breadcrumb("cart", name, Some(&[("product_id", id.as_str())])),
            None => add_breadcrumb("cart", name, None),
        }

        let mut next = self.snapshot();
        let transition = next.apply(action);
        if !transition.is_changed() {
            debug!(action = name, "Cart action was a no-op");
            return DispatchOutcome {
                transition,
                persistence: None,
            };
        }

        let persistence = self.persist(&next);
        debug!(
            action = name,
            item_count = next.item_count(),
            total = %next.total(),
            persisted = persistence.is_persisted(),
            "Cart updated"
        );
        self.state.send_replace(next);

        DispatchOutcome {
            transition,
            persistence: Some(persistence),
        }
    }

    /// Add one unit of a product.
    pub fn add_item(&mut self, product: CartProduct) -> DispatchOutcome {
        self.dispatch(CartAction::AddItem(product))
    }

    /// Remove a line.
    pub fn remove_item(&mut self, id: ProductId) -> DispatchOutcome {
        self.dispatch(CartAction::RemoveItem(id))
    }

    /// Set a line's quantity.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> DispatchOutcome {
        self.dispatch(CartAction::UpdateQuantity { id, quantity })
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> DispatchOutcome {
        self.dispatch(CartAction::Clear)
    }

    fn persist(&self, state: &CartState) -> PersistOutcome {
        let result = state
            .to_record()
            .map_err(|e| e.to_string())
            .and_then(|record| {
                self.storage
                    .set(CART_STORAGE_KEY, &record)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => PersistOutcome::Persisted,
            Err(reason) => {
                warn!(error = %reason, "Failed to persist cart; keeping in-memory state");
                PersistOutcome::Failed { reason }
            }
        }
    }
}

fn restore<S: KeyValueStore>(storage: &S) -> CartState {
    let raw = match storage.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::empty(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart; starting empty");
            return CartState::empty();
        }
    };

    CartState::from_record(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding corrupt cart record; starting empty");
        CartState::empty()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    /// Storage whose writes always fail (full quota, blocked storage).
    struct BlockedStore;

    impl KeyValueStore for BlockedStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("blocked".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("blocked".to_string()))
        }
    }

    fn product(id: &str, price: i64) -> CartProduct {
        CartProduct::new(id, id.to_uppercase(), Decimal::new(price, 0), "")
    }

    #[test]
    fn test_open_without_record_is_empty() {
        let store = CartStore::open(MemoryStore::new());
        assert_eq!(store.snapshot(), CartState::empty());
    }

    #[test]
    fn test_dispatch_persists_changes() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(Arc::clone(&storage));

        let outcome = store.add_item(product("a", 10));
        assert_eq!(outcome.transition, Transition::Changed);
        assert_eq!(outcome.persistence, Some(PersistOutcome::Persisted));

        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(CartState::from_record(&raw).unwrap(), store.snapshot());
    }

    #[test]
    fn test_reopen_restores_previous_cart() {
        let storage = Arc::new(MemoryStore::new());
        {
            let mut store = CartStore::open(Arc::clone(&storage));
            store.add_item(product("a", 10));
            store.add_item(product("a", 10));
            store.add_item(product("b", 5));
            store.update_quantity(ProductId::new("b"), 3);
        }

        let reopened = CartStore::open(Arc::clone(&storage));
        let cart = reopened.snapshot();
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), Decimal::new(35, 0));
    }

    #[test]
    fn test_corrupt_record_falls_back_to_empty() {
        let storage = MemoryStore::new();
        storage.set(CART_STORAGE_KEY, "{\"items\": [").unwrap();

        let store = CartStore::open(storage);
        assert_eq!(store.snapshot(), CartState::empty());
    }

    #[test]
    fn test_noop_is_not_persisted_or_broadcast() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(Arc::clone(&storage));
        let rx = store.subscribe();

        let outcome = store.remove_item(ProductId::new("ghost"));

        assert_eq!(outcome.transition, Transition::Unchanged);
        assert_eq!(outcome.persistence, None);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_subscribers_see_new_snapshot() {
        let mut store = CartStore::open(MemoryStore::new());
        let mut rx = store.subscribe();

        store.add_item(product("a", 10));

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.item_count(), 1);
        assert_eq!(seen.items()[0].id, ProductId::new("a"));
    }

    #[test]
    fn test_persistence_failure_keeps_in_memory_state() {
        let mut store = CartStore::open(BlockedStore);
        assert!(store.snapshot().is_empty());

        let outcome = store.add_item(product("a", 10));

        assert_eq!(outcome.transition, Transition::Changed);
        assert!(matches!(
            outcome.persistence,
            Some(PersistOutcome::Failed { ref reason }) if reason.contains("quota")
        ));
        assert_eq!(store.snapshot().item_count(), 1);
        assert_eq!(store.snapshot().total(), Decimal::new(10, 0));
    }

    #[test]
    fn test_clear_persists_empty_record() {
        let storage = Arc::new(MemoryStore::new());
        let mut store = CartStore::open(Arc::clone(&storage));
        store.add_item(product("a", 10));

        store.clear();

        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        assert_eq!(CartState::from_record(&raw).unwrap(), CartState::empty());
    }
}
