//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{ProductImage, ProductSnapshot, VariantSnapshot};
pub use order::{NewOrder, NewOrderItem, Order, OrderError, OrderItem, OrderStatus, ShippingAddress};
pub use cart::{Cart, CartAction, CartItem};
