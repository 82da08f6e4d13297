use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::domain::requests::DateRange;
use crate::domain::responses::{DailySales, SalesSummary, TopProduct};
use crate::errors::RepositoryError;
use crate::repository::DashboardRepositoryTrait;

// $1 / $2 are the half-open bounds from `DateRange::bounds`; NULL leaves that end open.
const IN_RANGE: &str = "($1::timestamptz IS NULL OR o.created_at >= $1) \
    AND ($2::timestamptz IS NULL OR o.created_at < $2)";

#[derive(Debug, FromRow)]
struct DailyRow {
    day: NaiveDate,
    sales: Decimal,
    orders: i64,
}

#[derive(Debug, FromRow)]
struct TopProductRow {
    id: i64,
    name: String,
    units_sold: i64,
    revenue: Decimal,
}

pub struct DashboardRepository {
    db: PgPool,
}

impl DashboardRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DashboardRepositoryTrait for DashboardRepository {
    async fn sales_summary(&self, range: &DateRange) -> Result<SalesSummary, RepositoryError> {
        let (from, to) = range.bounds();
        let (total_sales, total_orders): (Decimal, i64) = sqlx::query_as(&format!(
            "SELECT COALESCE(SUM(o.total), 0), COUNT(o.id) FROM orders o WHERE {IN_RANGE}"
        ))
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(SalesSummary { total_sales: total_sales.into(), total_orders })
    }

    async fn top_selling_product(&self, range: &DateRange) -> Result<Option<String>, RepositoryError> {
        let (from, to) = range.bounds();
        let row: Option<(String,)> = sqlx::query_as(&format!(
            r#"
            SELECT p.name
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN variants v ON v.id = oi.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE {IN_RANGE}
            GROUP BY oi.variant_id, p.name
            ORDER BY SUM(oi.quantity) DESC, oi.variant_id
            LIMIT 1
            "#
        ))
        .bind(from)
        .bind(to)
        .fetch_optional(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(row.map(|(name,)| name))
    }

    async fn daily_sales(&self, range: &DateRange) -> Result<Vec<DailySales>, RepositoryError> {
        let (from, to) = range.bounds();
        let rows = sqlx::query_as::<_, DailyRow>(&format!(
            r#"
            SELECT (o.created_at AT TIME ZONE 'UTC')::date AS day,
                   SUM(o.total) AS sales,
                   COUNT(o.id) AS orders
            FROM orders o
            WHERE {IN_RANGE}
            GROUP BY day
            ORDER BY day
            "#
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|r| DailySales { date: r.day, sales: r.sales.into(), orders: r.orders })
            .collect())
    }

    async fn top_products(&self, range: &DateRange, limit: i64) -> Result<Vec<TopProduct>, RepositoryError> {
        let (from, to) = range.bounds();
        let rows = sqlx::query_as::<_, TopProductRow>(&format!(
            r#"
            SELECT p.id, p.name,
                   SUM(oi.quantity)::BIGINT AS units_sold,
                   SUM(oi.quantity * oi.price) AS revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN variants v ON v.id = oi.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE {IN_RANGE}
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC, p.id
            LIMIT $3
            "#
        ))
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|r| TopProduct { id: r.id, name: r.name, units_sold: r.units_sold, revenue: r.revenue.into() })
            .collect())
    }
}
