//! Domain events
use serde::Serialize;
use crate::domain::aggregates::OrderStatus;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: i64, total: Money, item_count: usize },
    StatusChanged { order_id: i64, status: OrderStatus },
}

impl OrderEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Placed { .. } => "storefront.orders.placed",
            Self::StatusChanged { .. } => "storefront.orders.status_changed",
        }
    }
}
