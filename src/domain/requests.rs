use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::aggregates::{CartItem, OrderStatus, ShippingAddress};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(custom = "not_blank")]
    pub customer_name: String,
    #[validate(email(message = "customer email is invalid"))]
    pub customer_email: String,
    pub items: Vec<CartItem>,
    /// Decimal string computed by the caller from the cart snapshot.
    pub total: String,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("customer name is required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn offset(&self) -> i64 { i64::from(self.page - 1) * i64::from(self.per_page) }
}

impl From<&ListOrdersQuery> for Pagination {
    fn from(q: &ListOrdersQuery) -> Self {
        Self {
            page: q.page.unwrap_or(1).max(1),
            per_page: q.per_page.unwrap_or(20).clamp(1, Self::MAX_PER_PAGE),
        }
    }
}

/// Calendar-day range over order creation time, both ends inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self { Self { from, to } }

    /// Half-open UTC bounds `[start, end)`.
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start_of = |d: NaiveDate| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN));
        (self.from.map(start_of), self.to.map(|d| start_of(d) + Duration::days(1)))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        start.map_or(true, |s| at >= s) && end.map_or(true, |e| at < e)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl DashboardQuery {
    pub fn range(&self) -> DateRange { DateRange::new(self.from, self.to) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_name_is_rejected() {
        let req = CreateOrderRequest {
            customer_name: " \t ".into(),
            customer_email: "ada@example.com".into(),
            items: vec![],
            total: "0".into(),
            shipping_address: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("customer_name"));
        assert!(CreateOrderRequest { customer_name: " Ada ".into(), ..req }.validate().is_ok());
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::from(&ListOrdersQuery { page: Some(0), per_page: Some(500) });
        assert_eq!(p, Pagination { page: 1, per_page: 100 });
        assert_eq!(Pagination { page: 3, per_page: 20 }.offset(), 40);
    }

    #[test]
    fn test_date_range_includes_whole_last_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let range = DateRange::new(Some(day), Some(day));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap()));
        assert!(DateRange::default().contains(Utc::now()));
    }
}
