//! Application services over the hosted data backend.
//!
//! The backend is reached through two async ports, [`ProductCatalog`] and
//! [`SalesRepository`]. Services are plain values constructed with the port they
//! use and passed to whoever needs them; there is no shared global instance.

pub mod catalog;
pub mod dashboard;
pub mod product_service;
pub mod sales_repository;
pub mod sales_service;

pub use catalog::{InMemoryProductCatalog, ProductCatalog};
pub use dashboard::DashboardSummary;
pub use product_service::ProductService;
pub use sales_repository::{InMemorySalesRepository, SalesRepository};
pub use sales_service::SalesService;
