use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::cart::storage::DynCartStorage;
use crate::domain::aggregates::{Cart, CartAction, CartItem};

/// Namespace under which carts are persisted.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Bumped when the persisted shape changes incompatibly.
const CART_STORAGE_VERSION: u32 = 0;

pub fn storage_key(session: Uuid) -> String {
    format!("{CART_STORAGE_KEY}:{session}")
}

/// What reaches storage: the items only, never UI flags.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    version: u32,
}

/// A cart bound to its storage key.
///
/// Every mutation is applied in memory first and then mirrored to storage.
/// Storage failures are logged and otherwise ignored, so none of the cart
/// operations can fail.
pub struct CartStore {
    storage: DynCartStorage,
    key: String,
    cart: Cart,
    is_open: bool,
}

impl CartStore {
    /// Rehydrates the cart stored under `key`. Missing or unreadable blobs
    /// start an empty cart. The panel always starts closed.
    pub async fn load(storage: DynCartStorage, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match storage.get(&key).await {
            Ok(Some(blob)) => match serde_json::from_str::<PersistedCart>(&blob) {
                Ok(persisted) => Cart::from_items(persisted.items),
                Err(err) => {
                    warn!("Discarding unreadable cart {}: {}", key, err);
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!("Failed to load cart {}: {}", key, err);
                Cart::new()
            }
        };
        Self { storage, key, cart, is_open: false }
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn items(&self) -> &[CartItem] { self.cart.items() }
    pub fn is_open(&self) -> bool { self.is_open }
    pub fn open(&mut self) { self.is_open = true; }
    pub fn close(&mut self) { self.is_open = false; }

    pub async fn dispatch(&mut self, action: CartAction) {
        if matches!(action, CartAction::Add(_)) {
            self.is_open = true;
        }
        self.cart.apply(action);
        self.persist().await;
    }

    pub async fn add_item(&mut self, item: CartItem) { self.dispatch(CartAction::Add(item)).await }

    pub async fn remove_item(&mut self, variant_id: i64) { self.dispatch(CartAction::Remove { variant_id }).await }

    pub async fn update_quantity(&mut self, variant_id: i64, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity { variant_id, quantity }).await
    }

    pub async fn clear_cart(&mut self) { self.dispatch(CartAction::Clear).await }

    async fn persist(&self) {
        let persisted = PersistedCart { items: self.cart.items().to_vec(), version: CART_STORAGE_VERSION };
        let blob = match serde_json::to_string(&persisted) {
            Ok(blob) => blob,
            Err(err) => {
                warn!("Failed to serialize cart {}: {}", self.key, err);
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &blob).await {
            warn!("Failed to persist cart {}: {}", self.key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::storage::{CartStorage, MemoryCartStorage};
    use crate::domain::aggregates::cart::tests::item;
    use crate::errors::StorageError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct BrokenStorage;

    #[async_trait]
    impl CartStorage for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Sqlx(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_items_survive_reload_but_panel_does_not() {
        let storage: DynCartStorage = Arc::new(MemoryCartStorage::new());
        let mut store = CartStore::load(storage.clone(), CART_STORAGE_KEY).await;
        store.add_item(item(Some(5), 1, "12.00")).await;
        store.add_item(item(Some(5), 1, "12.00")).await;
        assert!(store.is_open());
        store.close();
        assert!(!store.is_open());
        store.open();

        let reloaded = CartStore::load(storage.clone(), CART_STORAGE_KEY).await;
        assert!(!reloaded.is_open());
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].quantity.value(), 2);

        let blob = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        assert!(!blob.contains("is_open"));
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let storage: DynCartStorage = Arc::new(MemoryCartStorage::new());
        let mut store = CartStore::load(storage.clone(), "k").await;
        store.add_item(item(Some(1), 3, "1.00")).await;
        store.update_quantity(1, -2).await;
        assert_eq!(store.items()[0].quantity.value(), 0);
        store.clear_cart().await;
        assert!(CartStore::load(storage, "k").await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_blob_loads_empty() {
        let storage: DynCartStorage = Arc::new(MemoryCartStorage::new());
        storage.set("k", "{not json").await.unwrap();
        assert!(CartStore::load(storage, "k").await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_blob_without_version_is_readable() {
        let storage: DynCartStorage = Arc::new(MemoryCartStorage::new());
        let blob = r#"{"items":[{"product":{"id":1,"name":"Tee","price":"10.00","images":[]},"variant":{"id":4,"color":"Red","size":"S","cost":"3.00","image":null},"quantity":2}]}"#;
        storage.set("k", blob).await.unwrap();
        let store = CartStore::load(storage, "k").await;
        assert_eq!(store.cart().subtotal().to_string(), "20.00");
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_break_operations() {
        let mut store = CartStore::load(Arc::new(BrokenStorage), "k").await;
        store.add_item(item(Some(1), 1, "5.00")).await;
        store.remove_item(42).await;
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_storage_key_is_namespaced() {
        let session = Uuid::nil();
        assert_eq!(storage_key(session), "cart-storage:00000000-0000-0000-0000-000000000000");
    }
}
