use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::aggregates::{Cart, CartItem, Order, OrderItem};
use crate::domain::value_objects::Money;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub item_count: usize,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self { items: cart.items().to_vec(), subtotal: cart.subtotal(), item_count: cart.item_count() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub order_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sales: Money,
    pub total_orders: i64,
    pub average_order_value: Money,
    pub top_selling_product: String,
}

/// Order totals for a range, as the repository reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesSummary {
    pub total_sales: Money,
    pub total_orders: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: Money,
    pub orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPoint { pub date: NaiveDate, pub sales: Money }

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdersPoint { pub date: NaiveDate, pub orders: i64 }

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub sales_data: Vec<SalesPoint>,
    pub orders_data: Vec<OrdersPoint>,
}

impl From<Vec<DailySales>> for ChartData {
    fn from(days: Vec<DailySales>) -> Self {
        let sales_data = days.iter().map(|d| SalesPoint { date: d.date, sales: d.sales }).collect();
        let orders_data = days.iter().map(|d| OrdersPoint { date: d.date, orders: d.orders }).collect();
        Self { sales_data, orders_data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub units_sold: i64,
    pub revenue: Money,
}
