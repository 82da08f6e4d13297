pub mod aggregates;
pub mod events;
pub mod requests;
pub mod responses;
pub mod value_objects;
