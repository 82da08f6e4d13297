//! Shopper cart store and its storage backends.

pub mod storage;
pub mod store;

pub use storage::{CartStorage, DynCartStorage, MemoryCartStorage, PgCartStorage};
pub use store::{storage_key, CartStore, CART_STORAGE_KEY};
