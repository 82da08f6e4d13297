use crate::domain::requests::DateRange;
use crate::domain::responses::{ChartData, DashboardStats, TopProduct};
use crate::errors::ServiceError;
use crate::repository::DynDashboardRepository;

const NO_TOP_SELLER: &str = "N/A";
const DEFAULT_TOP_PRODUCTS: i64 = 5;
const MAX_TOP_PRODUCTS: i64 = 50;

#[derive(Clone)]
pub struct DashboardService {
    repository: DynDashboardRepository,
}

impl DashboardService {
    pub fn new(repository: DynDashboardRepository) -> Self {
        Self { repository }
    }

    pub async fn stats(&self, range: &DateRange) -> Result<DashboardStats, ServiceError> {
        let summary = self.repository.sales_summary(range).await?;
        let top = self.repository.top_selling_product(range).await?;

        Ok(DashboardStats {
            total_sales: summary.total_sales,
            total_orders: summary.total_orders,
            average_order_value: summary.total_sales.average_over(summary.total_orders),
            top_selling_product: top.unwrap_or_else(|| NO_TOP_SELLER.to_string()),
        })
    }

    pub async fn chart(&self, range: &DateRange) -> Result<ChartData, ServiceError> {
        Ok(self.repository.daily_sales(range).await?.into())
    }

    pub async fn top_products(&self, range: &DateRange, limit: Option<i64>) -> Result<Vec<TopProduct>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS).clamp(1, MAX_TOP_PRODUCTS);
        Ok(self.repository.top_products(range, limit).await?)
    }
}
