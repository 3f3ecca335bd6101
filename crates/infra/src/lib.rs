//! Infrastructure layer: service ports, in-memory adapters, config, and the
//! application services that tie the domain crates together.

pub mod checkout;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod settings;
pub mod store;

pub use checkout::{CheckoutError, CheckoutService, TicketSummary};
pub use config::{ConfigError, PosConfig};
pub use error::ServiceError;
pub use services::{
    DashboardSummary, InMemoryProductCatalog, InMemorySalesRepository, ProductCatalog,
    ProductService, SalesRepository, SalesService,
};
pub use session::PosSession;
pub use settings::{InMemorySettingsStore, Settings, StoreSettings, TaxRate, TaxSettings, Theme};
pub use store::{BusinessStore, InMemoryBusinessStore};
