//! Command Handlers module
//!
//! Handlers that orchestrate domain checks against the stores. Each
//! operation is request-scoped: load, decide, write, return the touched
//! fields.

mod lifecycle_handler;
mod notification_handler;

#[cfg(test)]
mod tests;

pub use lifecycle_handler::{
    AccountLifecycleHandler, ActivationResult, SuspendAccountCommand, SuspensionResult,
    UnlockResult,
};
pub use notification_handler::{MarkAllReadResult, NotificationAudienceHandler};
