//! In-process order store.
//!
//! Mirrors the PostgreSQL schema closely enough to exercise the services without
//! a database: order items must reference a registered variant, and an order is
//! only visible once all of its rows have been written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

use crate::domain::aggregates::{NewOrder, Order, OrderItem, OrderStatus};
use crate::domain::requests::{DateRange, Pagination};
use crate::domain::responses::{DailySales, SalesSummary, TopProduct};
use crate::domain::value_objects::Money;
use crate::errors::RepositoryError;
use crate::repository::{DashboardRepositoryTrait, OrderRepositoryTrait};

#[derive(Debug, Clone)]
struct VariantRow { product_id: i64, color: String, size: String }

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<i64, String>,
    variants: HashMap<i64, VariantRow>,
    orders: BTreeMap<i64, Order>,
    items: Vec<OrderItem>,
    next_order_id: i64,
    next_item_id: i64,
}

impl Tables {
    fn resolve(&self, variant_id: i64) -> (Option<String>, Option<&VariantRow>) {
        let variant = self.variants.get(&variant_id);
        let name = variant.and_then(|v| self.products.get(&v.product_id)).cloned();
        (name, variant)
    }

    fn items_in_range<'a>(&'a self, range: &'a DateRange) -> impl Iterator<Item = &'a OrderItem> + 'a {
        self.items.iter().filter(move |i| self.orders.get(&i.order_id).is_some_and(|o| range.contains(o.created_at)))
    }
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    tables: Mutex<Tables>,
}

impl MemoryOrderStore {
    pub fn new() -> Self { Self::default() }

    pub async fn add_product(&self, id: i64, name: impl Into<String>) {
        self.tables.lock().await.products.insert(id, name.into());
    }

    pub async fn add_variant(&self, id: i64, product_id: i64, color: impl Into<String>, size: impl Into<String>) {
        let row = VariantRow { product_id, color: color.into(), size: size.into() };
        self.tables.lock().await.variants.insert(id, row);
    }

    /// Overrides an order's creation time, for range queries.
    pub async fn set_created_at(&self, order_id: i64, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        let order = tables.orders.get_mut(&order_id).ok_or(RepositoryError::NotFound)?;
        order.created_at = at;
        Ok(())
    }

    pub async fn order_count(&self) -> usize { self.tables.lock().await.orders.len() }
    pub async fn item_count(&self) -> usize { self.tables.lock().await.items.len() }
}

#[async_trait]
impl OrderRepositoryTrait for MemoryOrderStore {
    async fn create_order(&self, order: &NewOrder) -> Result<i64, RepositoryError> {
        let mut tables = self.tables.lock().await;

        // Validate every row before writing any of them.
        if let Some(missing) = order.items.iter().find(|i| !tables.variants.contains_key(&i.variant_id)) {
            return Err(RepositoryError::ForeignKey(format!("variant {} does not exist", missing.variant_id)));
        }

        tables.next_order_id += 1;
        let order_id = tables.next_order_id;
        let now = Utc::now();
        let stored = Order {
            id: order_id,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            shipping_address: order.shipping_address.clone(),
            total: order.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(order_id, stored);

        for item in &order.items {
            tables.next_item_id += 1;
            let id = tables.next_item_id;
            tables.items.push(OrderItem {
                id,
                order_id,
                variant_id: item.variant_id,
                quantity: item.quantity,
                price: item.price,
                product_name: None,
                color: None,
                size: None,
            });
        }
        Ok(order_id)
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        let order = tables.orders.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.lock().await.orders.get(&id).cloned())
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| {
                let (product_name, variant) = tables.resolve(i.variant_id);
                OrderItem {
                    product_name,
                    color: variant.map(|v| v.color.clone()),
                    size: variant.map(|v| v.size.clone()),
                    ..i.clone()
                }
            })
            .collect())
    }

    async fn find_all(&self, page: &Pagination) -> Result<(Vec<Order>, i64), RepositoryError> {
        let tables = self.tables.lock().await;
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = orders.len() as i64;
        let data = orders
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok((data, total))
    }
}

#[async_trait]
impl DashboardRepositoryTrait for MemoryOrderStore {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, RepositoryError> {
        let tables = self.tables.lock().await;
        let in_range: Vec<&Order> = tables.orders.values().filter(|o| range.contains(o.created_at)).collect();
        Ok(SalesSummary {
            total_sales: in_range.iter().map(|o| o.total).sum(),
            total_orders: in_range.len() as i64,
        })
    }

    async fn top_selling_product(&self, range: &DateRange) -> Result<Option<String>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut units: BTreeMap<i64, i64> = BTreeMap::new();
        for item in tables.items_in_range(range) {
            *units.entry(item.variant_id).or_default() += i64::from(item.quantity);
        }
        // Highest quantity wins, lowest variant id breaks ties.
        let top = units.into_iter().max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));
        Ok(top.and_then(|(variant_id, _)| tables.resolve(variant_id).0))
    }

    async fn daily_sales(&self, range: &DateRange) -> Result<Vec<DailySales>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut days: BTreeMap<chrono::NaiveDate, (Money, i64)> = BTreeMap::new();
        for order in tables.orders.values().filter(|o| range.contains(o.created_at)) {
            let entry = days.entry(order.created_at.date_naive()).or_default();
            entry.0 = entry.0.add(&order.total);
            entry.1 += 1;
        }
        Ok(days.into_iter().map(|(date, (sales, orders))| DailySales { date, sales, orders }).collect())
    }

    async fn top_products(&self, range: &DateRange, limit: i64) -> Result<Vec<TopProduct>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut by_product: BTreeMap<i64, (i64, Money)> = BTreeMap::new();
        for item in tables.items_in_range(range) {
            let Some(variant) = tables.variants.get(&item.variant_id) else { continue };
            let entry = by_product.entry(variant.product_id).or_default();
            entry.0 += i64::from(item.quantity);
            entry.1 = entry.1.add(&item.line_total());
        }
        let mut ranked: Vec<TopProduct> = by_product
            .into_iter()
            .filter_map(|(id, (units_sold, revenue))| {
                tables.products.get(&id).map(|name| TopProduct { id, name: name.clone(), units_sold, revenue })
            })
            .collect();
        ranked.sort_by(|a, b| b.units_sold.cmp(&a.units_sold).then(a.id.cmp(&b.id)));
        ranked.truncate(limit.max(0) as usize);
        Ok(ranked)
    }
}
