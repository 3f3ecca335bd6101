//! Products domain module.
//!
//! This crate contains the catalog record and its business rules (validation,
//! stock levels, search), implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod catalog;
pub mod product;

pub use catalog::{low_stock, search, sort_by_name};
pub use product::{
    LOW_STOCK_THRESHOLD, NewProduct, Product, ProductId, ProductPatch, StockOperation,
};
