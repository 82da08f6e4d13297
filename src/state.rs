use sqlx::PgPool;
use std::sync::Arc;

use crate::cart::{DynCartStorage, PgCartStorage};
use crate::publisher::DynEventPublisher;
use crate::repository::{DashboardRepository, DynDashboardRepository, DynOrderRepository, OrderRepository};
use crate::service::{CheckoutService, DashboardService, OrderService};

#[derive(Clone)]
pub struct AppState {
    pub cart_storage: DynCartStorage,
    pub orders: OrderService,
    pub checkout: CheckoutService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(
        cart_storage: DynCartStorage,
        order_repository: DynOrderRepository,
        dashboard_repository: DynDashboardRepository,
        publisher: DynEventPublisher,
    ) -> Self {
        let orders = OrderService::new(order_repository, publisher);
        let checkout = CheckoutService::new(orders.clone(), cart_storage.clone());
        let dashboard = DashboardService::new(dashboard_repository);
        Self { cart_storage, orders, checkout, dashboard }
    }

    /// Wires every backend to the same PostgreSQL pool.
    pub fn postgres(db: PgPool, publisher: DynEventPublisher) -> Self {
        Self::new(
            Arc::new(PgCartStorage::new(db.clone())),
            Arc::new(OrderRepository::new(db.clone())),
            Arc::new(DashboardRepository::new(db)),
            publisher,
        )
    }
}
