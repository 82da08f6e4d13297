mod checkout;
mod dashboard;
mod order;

pub use self::checkout::CheckoutService;
pub use self::dashboard::DashboardService;
pub use self::order::OrderService;
