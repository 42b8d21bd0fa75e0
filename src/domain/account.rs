//! Account domain types
//!
//! Account status transitions and the privileged-role guard.
//! Status is four independent dimensions (active, suspended, locked,
//! failed-login counter); operations write exactly one of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Reason recorded when an operator suspends an account without giving one
pub const DEFAULT_SUSPENSION_REASON: &str = "Suspended by administrator";

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Superadmin,
    Admin,
    Editor,
    Member,
}

impl AccountRole {
    /// Superadmin accounts are exempt from every status mutation.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Superadmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Member => "member",
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "member" => Ok(Self::Member),
            other => Err(AppError::Internal(format!("Unknown account role: {}", other))),
        }
    }
}

/// Account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub locked_until: Option<DateTime<Utc>>,
    pub failed_login_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The one field group a lifecycle operation is allowed to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPatch {
    /// activate / deactivate
    Active { is_active: bool },
    /// suspend / unsuspend
    Suspension {
        is_suspended: bool,
        suspension_reason: Option<String>,
    },
    /// unlock: locked_until = NULL, failed_login_attempts = 0
    LockCleared,
}

impl Account {
    /// Privileged accounts are immutable to lifecycle operations.
    /// Evaluated before any other rule; there is no override.
    fn ensure_unprivileged(&self) -> Result<(), AppError> {
        if self.role.is_privileged() {
            return Err(AppError::Forbidden(
                "Cannot modify a superadmin account".to_string(),
            ));
        }
        Ok(())
    }

    /// Mark the account active. A no-op transition is not an error.
    pub fn activate(&self) -> Result<StatusPatch, AppError> {
        self.ensure_unprivileged()?;
        Ok(StatusPatch::Active { is_active: true })
    }

    /// Mark the account inactive (soft disable)
    pub fn deactivate(&self) -> Result<StatusPatch, AppError> {
        self.ensure_unprivileged()?;
        Ok(StatusPatch::Active { is_active: false })
    }

    /// Suspend the account. Blank reasons collapse to the default message.
    pub fn suspend(&self, reason: Option<String>) -> Result<StatusPatch, AppError> {
        self.ensure_unprivileged()?;

        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_SUSPENSION_REASON.to_string());

        Ok(StatusPatch::Suspension {
            is_suspended: true,
            suspension_reason: Some(reason),
        })
    }

    /// Lift a suspension, clearing the recorded reason
    pub fn unsuspend(&self) -> Result<StatusPatch, AppError> {
        self.ensure_unprivileged()?;
        Ok(StatusPatch::Suspension {
            is_suspended: false,
            suspension_reason: None,
        })
    }

    /// Clear the login lockout state
    pub fn unlock(&self) -> Result<StatusPatch, AppError> {
        self.ensure_unprivileged()?;
        Ok(StatusPatch::LockCleared)
    }

    /// Apply a patch to an in-memory copy. Mirrors what the store writes;
    /// only the patch's field group is touched.
    pub fn apply(mut self, patch: &StatusPatch) -> Self {
        match patch {
            StatusPatch::Active { is_active } => {
                self.is_active = *is_active;
            }
            StatusPatch::Suspension {
                is_suspended,
                suspension_reason,
            } => {
                self.is_suspended = *is_suspended;
                self.suspension_reason = suspension_reason.clone();
            }
            StatusPatch::LockCleared => {
                self.locked_until = None;
                self.failed_login_attempts = 0;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn account(role: AccountRole) -> Account {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Account {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role,
            is_active: true,
            is_suspended: false,
            suspension_reason: None,
            locked_until: None,
            failed_login_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_superadmin_is_privileged() {
        assert!(AccountRole::Superadmin.is_privileged());
        assert!(!AccountRole::Admin.is_privileged());
        assert!(!AccountRole::Editor.is_privileged());
        assert!(!AccountRole::Member.is_privileged());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            AccountRole::Superadmin,
            AccountRole::Admin,
            AccountRole::Editor,
            AccountRole::Member,
        ] {
            assert_eq!(role.as_str().parse::<AccountRole>().unwrap(), role);
        }
        assert!("root".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_every_operation_forbidden_for_superadmin() {
        let acct = account(AccountRole::Superadmin);

        assert!(matches!(acct.activate(), Err(AppError::Forbidden(_))));
        assert!(matches!(acct.deactivate(), Err(AppError::Forbidden(_))));
        assert!(matches!(
            acct.suspend(Some("spam".to_string())),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(acct.unsuspend(), Err(AppError::Forbidden(_))));
        assert!(matches!(acct.unlock(), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_activate_is_idempotent() {
        let acct = account(AccountRole::Member);
        assert!(acct.is_active);

        // Activating an already-active account succeeds and changes nothing
        let patch = acct.activate().unwrap();
        let acct = acct.apply(&patch);
        assert!(acct.is_active);

        let patch = acct.activate().unwrap();
        let acct = acct.apply(&patch);
        assert!(acct.is_active);
    }

    #[test]
    fn test_deactivate() {
        let acct = account(AccountRole::Editor);

        let patch = acct.deactivate().unwrap();
        assert_eq!(patch, StatusPatch::Active { is_active: false });

        let acct = acct.apply(&patch);
        assert!(!acct.is_active);
    }

    #[test]
    fn test_suspend_with_reason() {
        let acct = account(AccountRole::Member);

        let patch = acct.suspend(Some("payment chargeback".to_string())).unwrap();
        let acct = acct.apply(&patch);

        assert!(acct.is_suspended);
        assert_eq!(
            acct.suspension_reason.as_deref(),
            Some("payment chargeback")
        );
    }

    #[test]
    fn test_suspend_without_reason_uses_default() {
        let acct = account(AccountRole::Member);

        let patch = acct.suspend(None).unwrap();
        let acct = acct.apply(&patch);

        assert!(acct.is_suspended);
        assert_eq!(
            acct.suspension_reason.as_deref(),
            Some(DEFAULT_SUSPENSION_REASON)
        );
    }

    #[test]
    fn test_suspend_with_blank_reason_uses_default() {
        let acct = account(AccountRole::Member);

        let patch = acct.suspend(Some("   ".to_string())).unwrap();
        let acct = acct.apply(&patch);

        assert_eq!(
            acct.suspension_reason.as_deref(),
            Some(DEFAULT_SUSPENSION_REASON)
        );
    }

    #[test]
    fn test_unsuspend_clears_reason() {
        let mut acct = account(AccountRole::Member);
        acct.is_suspended = true;
        acct.suspension_reason = Some("spam".to_string());

        let patch = acct.unsuspend().unwrap();
        let acct = acct.apply(&patch);

        assert!(!acct.is_suspended);
        assert_eq!(acct.suspension_reason, None);
    }

    #[test]
    fn test_unlock_clears_lock_state() {
        let mut acct = account(AccountRole::Member);
        acct.locked_until = Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        acct.failed_login_attempts = 5;

        let patch = acct.unlock().unwrap();
        let acct = acct.apply(&patch);

        assert_eq!(acct.locked_until, None);
        assert_eq!(acct.failed_login_attempts, 0);
    }

    #[test]
    fn test_unlock_already_unlocked() {
        let acct = account(AccountRole::Member);

        let patch = acct.unlock().unwrap();
        let acct = acct.apply(&patch);

        assert_eq!(acct.locked_until, None);
        assert_eq!(acct.failed_login_attempts, 0);
    }

    #[test]
    fn test_suspend_does_not_touch_other_dimensions() {
        // Dimensions are orthogonal: a suspended account can stay active
        let mut acct = account(AccountRole::Member);
        acct.locked_until = Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        acct.failed_login_attempts = 3;

        let patch = acct.suspend(None).unwrap();
        let acct = acct.apply(&patch);

        assert!(acct.is_active);
        assert!(acct.is_suspended);
        assert!(acct.locked_until.is_some());
        assert_eq!(acct.failed_login_attempts, 3);
    }

    #[test]
    fn test_deactivate_does_not_touch_suspension() {
        let mut acct = account(AccountRole::Member);
        acct.is_suspended = true;
        acct.suspension_reason = Some("spam".to_string());

        let patch = acct.deactivate().unwrap();
        let acct = acct.apply(&patch);

        assert!(!acct.is_active);
        assert!(acct.is_suspended);
        assert_eq!(acct.suspension_reason.as_deref(), Some("spam"));
    }
}
