//! Notification domain types
//!
//! Targeting model and the audience predicate: deciding which notifications
//! a given recipient can see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Role token matching every role-targeted bucket
pub const ALL_ROLES_TOKEN: &str = "all";

/// Notification targeting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Addressed to one account via `user_id`
    User,
    /// Addressed to every account holding a role listed in `target_roles`
    Role,
    /// Addressed to every account
    All,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for TargetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "role" => Ok(Self::Role),
            "all" => Ok(Self::All),
            other => Err(AppError::Internal(format!(
                "Unknown notification target type: {}",
                other
            ))),
        }
    }
}

/// Notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub target_type: TargetType,
    /// Present iff `target_type` is `User`
    pub user_id: Option<Uuid>,
    /// Comma-separated role names, present iff `target_type` is `Role`
    pub target_roles: Option<String>,
    pub is_read: bool,
    /// Set exactly when `is_read` flips true
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Recipient descriptor for audience resolution.
/// At least one of the two fields must be populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recipient {
    pub user_id: Option<Uuid>,
    pub role: Option<String>,
}

impl Recipient {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            role: None,
        }
    }

    pub fn for_role(role: impl Into<String>) -> Self {
        Self {
            user_id: None,
            role: Some(role.into()),
        }
    }

    /// An empty descriptor addresses nobody and is rejected before any
    /// storage access.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.user_id.is_none() && self.role.is_none() {
            return Err(AppError::InvalidRecipient);
        }
        Ok(())
    }

    /// Role term used against `target_roles`. A user-scoped request with no
    /// explicit role still picks up buckets tagged "all", nothing narrower.
    pub fn effective_role(&self) -> &str {
        self.role.as_deref().unwrap_or(ALL_ROLES_TOKEN)
    }

    /// The audience predicate: does this notification address this
    /// recipient? Already-read notifications are never in the audience.
    pub fn matches(&self, notification: &Notification) -> bool {
        if notification.is_read {
            return false;
        }

        match notification.target_type {
            TargetType::All => true,
            TargetType::User => {
                self.user_id.is_some() && notification.user_id == self.user_id
            }
            TargetType::Role => notification
                .target_roles
                .as_deref()
                .is_some_and(|roles| roles_contain(roles, self.effective_role())),
        }
    }
}

/// Comma-separated token membership. Exact tokens only: "admin" is not a
/// member of "superadmin".
pub fn roles_contain(target_roles: &str, role: &str) -> bool {
    target_roles.split(',').any(|r| r.trim() == role)
}
