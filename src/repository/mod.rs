//! Persistence seams for orders and dashboard queries.
//!
//! PostgreSQL backs the running service; [`memory::MemoryOrderStore`] keeps the
//! same transaction and foreign key rules in process.

pub mod dashboard;
pub mod memory;
pub mod order;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::aggregates::{NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::requests::{DateRange, Pagination};
use crate::domain::responses::{DailySales, SalesSummary, TopProduct};
use crate::errors::RepositoryError;

pub use dashboard::DashboardRepository;
pub use memory::MemoryOrderStore;
pub use order::OrderRepository;

pub type DynOrderRepository = Arc<dyn OrderRepositoryTrait + Send + Sync>;
pub type DynDashboardRepository = Arc<dyn DashboardRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderRepositoryTrait {
    /// Writes the order and all of its items as one unit. Returns the new order id.
    async fn create_order(&self, order: &NewOrder) -> Result<i64, RepositoryError>;
    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, RepositoryError>;
    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError>;
    async fn find_all(&self, page: &Pagination) -> Result<(Vec<Order>, i64), RepositoryError>;
}

#[async_trait]
pub trait DashboardRepositoryTrait {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, RepositoryError>;
    /// Product name of the variant with the most units sold.
    async fn top_selling_product(&self, range: &DateRange) -> Result<Option<String>, RepositoryError>;
    async fn daily_sales(&self, range: &DateRange) -> Result<Vec<DailySales>, RepositoryError>;
    async fn top_products(&self, range: &DateRange, limit: i64) -> Result<Vec<TopProduct>, RepositoryError>;
}
