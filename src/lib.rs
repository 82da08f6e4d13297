//! Storefront Cart & Orders
//!
//! Server side of a direct-to-consumer clothing store.
//!
//! ## Features
//! - Persisted shopper carts with merge-on-add line items
//! - Transactional order placement with price-at-purchase line items
//! - Order status administration
//! - Sales dashboard aggregates over an optional date range

pub mod cart;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handler;
pub mod publisher;
pub mod repository;
pub mod service;
pub mod state;

pub use domain::aggregates::{Cart, CartAction, CartItem, Order, OrderItem, OrderStatus, ProductSnapshot, VariantSnapshot};
pub use domain::value_objects::{Money, Quantity};
pub use errors::{HttpError, RepositoryError, ServiceError, StorageError};
pub use state::AppState;
