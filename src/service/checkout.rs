use tracing::{info, warn};
use uuid::Uuid;

use crate::cart::{storage_key, CartStore, DynCartStorage};
use crate::domain::requests::{CheckoutRequest, CreateOrderRequest};
use crate::errors::ServiceError;
use crate::service::OrderService;

/// Turns a stored cart into an order.
///
/// The cart is cleared only after the order is committed; any failure leaves
/// it as it was so the shopper can retry.
#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderService,
    storage: DynCartStorage,
}

impl CheckoutService {
    pub fn new(orders: OrderService, storage: DynCartStorage) -> Self {
        Self { orders, storage }
    }

    pub async fn checkout(&self, session: Uuid, customer: CheckoutRequest) -> Result<i64, ServiceError> {
        let mut store = CartStore::load(self.storage.clone(), storage_key(session)).await;
        if store.cart().is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let req = CreateOrderRequest {
            customer_name: customer.customer_name,
            customer_email: customer.customer_email,
            total: store.cart().subtotal().to_string(),
            items: store.items().to_vec(),
            shipping_address: customer.shipping_address,
        };

        match self.orders.place_order(&req).await {
            Ok(order_id) => {
                store.clear_cart().await;
                info!("Checkout of {} completed as order {}", store.key(), order_id);
                Ok(order_id)
            }
            Err(err) => {
                warn!("Checkout of {} failed, keeping cart: {}", store.key(), err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MemoryCartStorage;
    use crate::domain::aggregates::cart::tests::item;
    use crate::publisher::NoopPublisher;
    use crate::repository::MemoryOrderStore;
    use crate::service::OrderService;
    use std::sync::Arc;

    async fn setup() -> (CheckoutService, DynCartStorage, Arc<MemoryOrderStore>) {
        let store = Arc::new(MemoryOrderStore::new());
        store.add_product(1, "Tee").await;
        store.add_variant(1, 1, "Black", "M").await;
        let storage: DynCartStorage = Arc::new(MemoryCartStorage::new());
        let orders = OrderService::new(store.clone(), Arc::new(NoopPublisher));
        (CheckoutService::new(orders, storage.clone()), storage, store)
    }

    fn customer() -> CheckoutRequest {
        CheckoutRequest { customer_name: "Ada".into(), customer_email: "ada@example.com".into(), shipping_address: None }
    }

    #[tokio::test]
    async fn test_success_clears_cart_and_uses_subtotal() {
        let (checkout, storage, store) = setup().await;
        let session = Uuid::new_v4();
        let mut cart = CartStore::load(storage.clone(), storage_key(session)).await;
        cart.add_item(item(Some(1), 3, "12.50")).await;

        let order_id = checkout.checkout(session, customer()).await.unwrap();

        let detail = crate::repository::OrderRepositoryTrait::find_by_id(store.as_ref(), order_id).await.unwrap().unwrap();
        assert_eq!(detail.total.to_string(), "37.50");
        assert!(CartStore::load(storage, storage_key(session)).await.cart().is_empty());
    }

    #[tokio::test]
    async fn test_failure_preserves_cart() {
        let (checkout, storage, store) = setup().await;
        let session = Uuid::new_v4();
        let mut cart = CartStore::load(storage.clone(), storage_key(session)).await;
        cart.add_item(item(Some(404), 1, "9.00")).await;

        let err = checkout.checkout(session, customer()).await.unwrap_err();
        assert!(matches!(err, ServiceError::OrderCreation));
        assert_eq!(store.order_count().await, 0);
        assert_eq!(CartStore::load(storage, storage_key(session)).await.items().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let (checkout, _, _) = setup().await;
        assert!(matches!(checkout.checkout(Uuid::new_v4(), customer()).await, Err(ServiceError::EmptyCart)));
    }
}
