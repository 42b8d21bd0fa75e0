//! Domain module
//!
//! Core domain types and business logic.

pub mod account;
pub mod notification;

pub use account::{Account, AccountRole, StatusPatch, DEFAULT_SUSPENSION_REASON};
pub use notification::{Notification, Recipient, TargetType, ALL_ROLES_TOKEN};
