use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use crate::domain::aggregates::{NewOrder, Order, OrderItem, OrderStatus, ShippingAddress};
use crate::domain::requests::Pagination;
use crate::errors::RepositoryError;
use crate::repository::OrderRepositoryTrait;

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, total, status, \
    shipping_address_line1, shipping_address_line2, shipping_city, shipping_state, \
    shipping_postal_code, shipping_country, created_at, updated_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    customer_email: String,
    total: Decimal,
    status: String,
    shipping_address_line1: Option<String>,
    shipping_address_line2: Option<String>,
    shipping_city: Option<String>,
    shipping_state: Option<String>,
    shipping_postal_code: Option<String>,
    shipping_country: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::Corrupt(format!("order {}: {e}", row.id)))?;
        let shipping_address = row.shipping_address_line1.map(|line1| ShippingAddress {
            line1,
            line2: row.shipping_address_line2,
            city: row.shipping_city.unwrap_or_default(),
            state: row.shipping_state.unwrap_or_default(),
            postal_code: row.shipping_postal_code.unwrap_or_default(),
            country: row.shipping_country.unwrap_or_default(),
        });
        Ok(Order {
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            shipping_address,
            total: row.total.into(),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    variant_id: i64,
    quantity: i32,
    price: Decimal,
    product_name: Option<String>,
    color: Option<String>,
    size: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            variant_id: row.variant_id,
            quantity: row.quantity,
            price: row.price.into(),
            product_name: row.product_name,
            color: row.color,
            size: row.size,
        }
    }
}

pub struct OrderRepository {
    db: PgPool,
}

impl OrderRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    async fn create_order(&self, order: &NewOrder) -> Result<i64, RepositoryError> {
        // Dropping `tx` before commit rolls everything back.
        let mut tx = self.db.begin().await.map_err(RepositoryError::from_sqlx)?;

        let address = order.shipping_address.as_ref();
        let (order_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO orders (customer_name, customer_email, total, status,
                shipping_address_line1, shipping_address_line2, shipping_city,
                shipping_state, shipping_postal_code, shipping_country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(order.total.amount())
        .bind(OrderStatus::Pending.as_str())
        .bind(address.map(|a| a.line1.as_str()))
        .bind(address.and_then(|a| a.line2.as_deref()))
        .bind(address.map(|a| a.city.as_str()))
        .bind(address.map(|a| a.state.as_str()))
        .bind(address.map(|a| a.postal_code.as_str()))
        .bind(address.map(|a| a.country.as_str()))
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to insert order for {}: {:?}", order.customer_email, err);
            RepositoryError::from_sqlx(err)
        })?;

        if !order.items.is_empty() {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO order_items (order_id, variant_id, quantity, price) ");
            builder.push_values(order.items.iter(), |mut row, item| {
                row.push_bind(order_id)
                    .push_bind(item.variant_id)
                    .push_bind(item.quantity)
                    .push_bind(item.price.amount());
            });
            builder.build().execute(&mut *tx).await.map_err(|err| {
                error!("❌ Failed to insert items for order {}: {:?}", order_id, err);
                RepositoryError::from_sqlx(err)
            })?;
        }

        tx.commit().await.map_err(RepositoryError::from_sqlx)?;

        info!("✅ Created order {} with {} items", order_id, order.items.len());
        Ok(order_id)
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.db)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        row.map(Order::try_from).transpose()
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.variant_id, oi.quantity, oi.price,
                   p.name AS product_name, v.color, v.size
            FROM order_items oi
            LEFT JOIN variants v ON v.id = oi.variant_id
            LEFT JOIN products p ON p.id = v.product_id
            WHERE oi.order_id = $1
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn find_all(&self, page: &Pagination) -> Result<(Vec<Order>, i64), RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.per_page))
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.db)
            .await
            .map_err(RepositoryError::from_sqlx)?;

        let orders = rows.into_iter().map(Order::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok((orders, total))
    }
}
