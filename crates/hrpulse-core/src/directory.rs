//! Read-only accessor over employee HR records.
//!
//! The HRMS database itself is an external collaborator; this trait is
//! the narrow, read-only view the assistant needs to ground
//! personal-data answers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;

/// Attendance summary for the current period.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub days_present: u32,
    pub days_absent: u32,
    pub late_arrivals: u32,
}

/// Leave balances by category, in days.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub annual_remaining: u32,
    pub sick_remaining: u32,
    pub pending_requests: u32,
}

/// Most recent performance review outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Rating on the company's 1..=5 scale.
    pub rating: u8,
    pub review_period: String,
    pub goals_met: u32,
    pub goals_total: u32,
}

/// The per-employee view the context store reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    pub employee_id: String,
    pub display_name: String,
    pub department: String,
    pub attendance: AttendanceSummary,
    pub leave: LeaveBalance,
    pub performance: PerformanceSummary,
}

/// Read-only employee record accessor.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Fetches the snapshot for one employee, `None` if unknown.
    async fn snapshot(&self, employee_id: &str) -> Result<Option<EmployeeSnapshot>, AssistantError>;
}
