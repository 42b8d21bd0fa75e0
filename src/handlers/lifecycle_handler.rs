//! Account Lifecycle Handler
//!
//! The five account-status operations: activate, deactivate, suspend,
//! unsuspend, unlock. Each is a read-check-write: load the account,
//! evaluate the role guard, write exactly one field group.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Account, StatusPatch};
use crate::error::{AppError, AppResult};
use crate::store::AccountStore;

// =========================================================================
// Commands
// =========================================================================

/// Command to suspend an account
#[derive(Debug, Clone)]
pub struct SuspendAccountCommand {
    pub account_id: Uuid,
    pub reason: Option<String>,
}

impl SuspendAccountCommand {
    pub fn new(account_id: Uuid) -> Self {
        Self {
            account_id,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: String) -> Self {
        self.reason = Some(reason);
        self
    }
}

// =========================================================================
// Results — each carries only the fields the operation touched
// =========================================================================

/// Result of activate / deactivate
#[derive(Debug, Clone)]
pub struct ActivationResult {
    pub account_id: Uuid,
    pub is_active: bool,
}

/// Result of suspend / unsuspend
#[derive(Debug, Clone)]
pub struct SuspensionResult {
    pub account_id: Uuid,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
}

/// Result of unlock
#[derive(Debug, Clone)]
pub struct UnlockResult {
    pub account_id: Uuid,
    pub locked_until: Option<DateTime<Utc>>,
    pub failed_login_attempts: i32,
}

// =========================================================================
// AccountLifecycleHandler
// =========================================================================

/// Handler for account-status transitions
pub struct AccountLifecycleHandler {
    accounts: AccountStore,
}

impl AccountLifecycleHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountStore::new(pool),
        }
    }

    async fn load(&self, account_id: Uuid) -> AppResult<Account> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))
    }

    /// Mark an account active
    pub async fn activate(&self, account_id: Uuid) -> AppResult<ActivationResult> {
        let account = self.load(account_id).await?;
        let patch = account.activate()?;
        self.accounts.apply(account_id, &patch).await?;

        Ok(ActivationResult {
            account_id,
            is_active: true,
        })
    }

    /// Mark an account inactive
    pub async fn deactivate(&self, account_id: Uuid) -> AppResult<ActivationResult> {
        let account = self.load(account_id).await?;
        let patch = account.deactivate()?;
        self.accounts.apply(account_id, &patch).await?;

        Ok(ActivationResult {
            account_id,
            is_active: false,
        })
    }

    /// Suspend an account, recording the (possibly defaulted) reason
    pub async fn suspend(&self, command: SuspendAccountCommand) -> AppResult<SuspensionResult> {
        let account = self.load(command.account_id).await?;
        let patch = account.suspend(command.reason)?;
        self.accounts.apply(command.account_id, &patch).await?;

        let suspension_reason = match &patch {
            StatusPatch::Suspension {
                suspension_reason, ..
            } => suspension_reason.clone(),
            _ => None,
        };

        Ok(SuspensionResult {
            account_id: command.account_id,
            is_suspended: true,
            suspension_reason,
        })
    }

    /// Lift a suspension
    pub async fn unsuspend(&self, account_id: Uuid) -> AppResult<SuspensionResult> {
        let account = self.load(account_id).await?;
        let patch = account.unsuspend()?;
        self.accounts.apply(account_id, &patch).await?;

        Ok(SuspensionResult {
            account_id,
            is_suspended: false,
            suspension_reason: None,
        })
    }

    /// Clear the login lockout state
    pub async fn unlock(&self, account_id: Uuid) -> AppResult<UnlockResult> {
        let account = self.load(account_id).await?;
        let patch = account.unlock()?;
        self.accounts.apply(account_id, &patch).await?;

        Ok(UnlockResult {
            account_id,
            locked_until: None,
            failed_login_attempts: 0,
        })
    }
}
