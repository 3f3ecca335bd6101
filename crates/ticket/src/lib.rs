//! Ticket (cart) domain module.
//!
//! Holds the in-progress sale for one session: product snapshots keyed by
//! product id, with derived item count and amount. Pure in-memory state, no IO.

pub mod store;

pub use store::{MAX_QUANTITY, TicketEntry, TicketStore};
