//! Business-isolated key/value storage abstractions.

pub mod business_store;

pub use business_store::{BusinessStore, InMemoryBusinessStore};
