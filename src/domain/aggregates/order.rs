//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;
use crate::domain::aggregates::cart::CartItem;
use crate::domain::value_objects::Money;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: Option<ShippingAddress>,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted order line, resolved against the catalog where it still exists.
/// `price` is the unit price captured at purchase.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub variant_id: i64,
    pub quantity: i32,
    pub price: Money,
    pub product_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Money { self.price.multiply(self.quantity.max(0) as u32) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[validate(length(min = 1, message = "address line is required"))]
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[validate(length(min = 1, message = "postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Processing, Shipped, Delivered, Cancelled }

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = OrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }
}

/// Everything the order transaction writes, already filtered and priced.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub shipping_address: Option<ShippingAddress>,
    pub total: Money,
    pub items: Vec<NewOrderItem>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderItem { pub variant_id: i64, pub quantity: i32, pub price: Money }

impl NewOrder {
    /// Builds the order from a cart snapshot. Lines without a variant id, or
    /// with the unset id `0`, are dropped; each kept line is priced at the
    /// snapshot's product price.
    /// The caller's total is kept as given.
    pub fn from_snapshot(
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        total: Money,
        shipping_address: Option<ShippingAddress>,
        items: &[CartItem],
    ) -> Self {
        let items = items
            .iter()
            .filter_map(|item| {
                item.variant.id.filter(|id| *id != 0).map(|variant_id| NewOrderItem {
                    variant_id,
                    quantity: item.quantity.as_i32(),
                    price: item.product.price,
                })
            })
            .collect();
        Self { customer_name: customer_name.into(), customer_email: customer_email.into(), shipping_address, total, items }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum OrderError { UnknownStatus(String) }
impl std::error::Error for OrderError {}
impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::UnknownStatus(s) => write!(f, "unknown order status '{s}'") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::cart::tests::item;
    use crate::domain::value_objects::Quantity;

    #[test]
    fn test_snapshot_drops_lines_without_variant() {
        let items = vec![item(Some(1), 2, "10.00"), item(None, 4, "3.00"), item(Some(2), 1, "25.00")];
        let order = NewOrder::from_snapshot("Ada", "ada@example.com", "45.00".parse().unwrap(), None, &items);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0], NewOrderItem { variant_id: 1, quantity: 2, price: "10.00".parse().unwrap() });
        assert_eq!(order.items[1], NewOrderItem { variant_id: 2, quantity: 1, price: "25.00".parse().unwrap() });
        assert_eq!(order.total.to_string(), "45.00");
    }

    #[test]
    fn test_zero_variant_id_counts_as_missing() {
        let items = vec![item(Some(0), 1, "5.00"), item(Some(3), 1, "5.00")];
        let order = NewOrder::from_snapshot("Ada", "ada@example.com", "10.00".parse().unwrap(), None, &items);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].variant_id, 3);
    }

    #[test]
    fn test_largest_quantity_is_stored_exactly() {
        let line = item(Some(1), Quantity::MAX, "1.00");
        let order = NewOrder::from_snapshot("Ada", "ada@example.com", line.line_total(), None, &[line.clone()]);
        assert_eq!(i64::from(order.items[0].quantity), i64::from(line.quantity.value()));
    }

    #[test]
    fn test_total_is_not_recomputed() {
        let items = vec![item(Some(1), 2, "10.00")];
        let order = NewOrder::from_snapshot("Ada", "ada@example.com", "1.00".parse().unwrap(), None, &items);
        assert_eq!(order.total.to_string(), "1.00");
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for s in ["pending", "processing", "shipped", "delivered", "cancelled"] {
            assert_eq!(s.parse::<OrderStatus>().unwrap().as_str(), s);
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_address_validation() {
        let mut addr = ShippingAddress { line1: "1 Main St".into(), city: "Lagos".into(), postal_code: "100001".into(), country: "NG".into(), ..Default::default() };
        assert!(addr.validate().is_ok());
        addr.city.clear();
        assert!(addr.validate().is_err());
    }
}
