//! Inbound query model.
//!
//! A [`ChatQuery`] is immutable once constructed: the caller produces
//! it, the orchestrator consumes it, and nothing downstream mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of the authenticated user issuing a query.
///
/// The role drives two access decisions:
/// - which policy passages are eligible for retrieval
///   (via [`Role::access_level`]), and
/// - whether context assembly may include records belonging to other
///   employees (via [`Role::is_administrative`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    HrAdmin,
}

impl Role {
    /// Numeric access level used to pre-filter retrieval candidates.
    ///
    /// Passages carry a minimum access level; a query may only match
    /// passages at or below the caller's level. The filter is applied
    /// in the search request, before scoring, so restricted content
    /// can never surface even as a low-rank result.
    pub fn access_level(&self) -> u8 {
        match self {
            Role::Employee => 1,
            Role::Manager => 2,
            Role::HrAdmin => 3,
        }
    }

    /// Whether this role may see records belonging to other employees.
    pub fn is_administrative(&self) -> bool {
        matches!(self, Role::HrAdmin)
    }

    /// Stable discriminator used in scoped cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::HrAdmin => "hr_admin",
        }
    }
}

/// A single user query, as received by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatQuery {
    /// Raw message text, untrimmed.
    pub raw_text: String,
    /// Identifier of the authenticated user.
    pub user_id: String,
    /// Role of the authenticated user.
    pub role: Role,
    /// When the query was received.
    pub timestamp: DateTime<Utc>,
}

impl ChatQuery {
    /// Creates a query stamped with the current time.
    pub fn new(raw_text: impl Into<String>, user_id: impl Into<String>, role: Role) -> Self {
        Self {
            raw_text: raw_text.into(),
            user_id: user_id.into(),
            role,
            timestamp: Utc::now(),
        }
    }

    /// The message text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.raw_text.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_ordered_by_privilege() {
        assert!(Role::Employee.access_level() < Role::Manager.access_level());
        assert!(Role::Manager.access_level() < Role::HrAdmin.access_level());
    }

    #[test]
    fn only_hr_admin_is_administrative() {
        assert!(!Role::Employee.is_administrative());
        assert!(!Role::Manager.is_administrative());
        assert!(Role::HrAdmin.is_administrative());
    }
}
