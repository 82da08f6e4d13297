use tracing::{error, info};
use validator::Validate;

use crate::domain::aggregates::{NewOrder, Order, OrderStatus};
use crate::domain::events::OrderEvent;
use crate::domain::requests::{CreateOrderRequest, ListOrdersQuery, Pagination};
use crate::domain::responses::{OrderDetail, Paginated};
use crate::domain::value_objects::{Money, MoneyError};
use crate::errors::{RepositoryError, ServiceError};
use crate::publisher::DynEventPublisher;
use crate::repository::DynOrderRepository;

#[derive(Clone)]
pub struct OrderService {
    repository: DynOrderRepository,
    publisher: DynEventPublisher,
}

impl OrderService {
    pub fn new(repository: DynOrderRepository, publisher: DynEventPublisher) -> Self {
        Self { repository, publisher }
    }

    /// Places an order from a cart snapshot in one transaction.
    ///
    /// The caller's total is stored as given. Persistence failures of any kind
    /// come back as [`ServiceError::OrderCreation`].
    pub async fn place_order(&self, req: &CreateOrderRequest) -> Result<i64, ServiceError> {
        let total = Self::validate(req)?;
        let order = NewOrder::from_snapshot(
            req.customer_name.trim(),
            req.customer_email.trim(),
            total,
            req.shipping_address.clone(),
            &req.items,
        );

        let dropped = req.items.len() - order.items.len();
        if dropped > 0 {
            info!("Dropping {} cart lines without a variant id", dropped);
        }

        let order_id = self.repository.create_order(&order).await.map_err(|err| {
            error!("❌ Failed to create order for {}: {}", order.customer_email, err);
            ServiceError::OrderCreation
        })?;

        info!("✅ Placed order {} for {} (total {})", order_id, order.customer_email, order.total);
        self.publisher
            .publish(OrderEvent::Placed { order_id, total: order.total, item_count: order.items.len() })
            .await;
        Ok(order_id)
    }

    /// Sets any status from any status. Items are never touched.
    pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> Result<(), ServiceError> {
        self.repository.update_status(order_id, status).await.map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repo(other),
        })?;

        info!("Order {} is now {}", order_id, status);
        self.publisher.publish(OrderEvent::StatusChanged { order_id, status }).await;
        Ok(())
    }

    pub async fn get_order(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let order = self.repository.find_by_id(order_id).await?.ok_or(ServiceError::NotFound)?;
        let items = self.repository.find_items(order_id).await?;
        Ok(OrderDetail { order, items })
    }

    pub async fn list_orders(&self, query: &ListOrdersQuery) -> Result<Paginated<Order>, ServiceError> {
        let page = Pagination::from(query);
        let (data, total) = self.repository.find_all(&page).await?;
        Ok(Paginated { data, total, page: page.page, per_page: page.per_page })
    }

    fn validate(req: &CreateOrderRequest) -> Result<Money, ServiceError> {
        req.validate()?;
        if let Some(address) = &req.shipping_address {
            address.validate()?;
        }
        let total: Money = req
            .total
            .parse()
            .map_err(|e: MoneyError| ServiceError::Validation(vec![format!("total: {e}")]))?;
        if total.is_negative() {
            return Err(ServiceError::Validation(vec!["total: must not be negative".into()]));
        }
        Ok(total)
    }
}
