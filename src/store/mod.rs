//! Persistence module
//!
//! Store structs wrapping the connection pool. Each operation is a single
//! round-trip; atomicity is the database's.

mod accounts;
mod notifications;

pub use accounts::AccountStore;
pub use notifications::NotificationStore;
