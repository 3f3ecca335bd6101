//! Sales domain module.
//!
//! Finalized sale records, the checkout payload built from a ticket, and the
//! history views (period filters, totals, search). Pure logic: persistence
//! lives in `ticketpos-infra`.

pub mod history;
pub mod sale;

pub use history::{SalesPeriod, SalesSummary, filter_period, recent, search, summarize};
pub use sale::{NewSale, PaymentMethod, Sale, SaleId, SaleItem, SaleStatus};
