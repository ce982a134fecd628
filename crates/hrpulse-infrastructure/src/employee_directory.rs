//! In-memory employee directory.
//!
//! Stands in for the HRMS database accessor: a read-only map of
//! employee snapshots. The demo seed mirrors the record shape the real
//! system exposes (attendance, leave, performance per employee).

use async_trait::async_trait;
use hrpulse_core::directory::{
    AttendanceSummary, EmployeeDirectory, EmployeeSnapshot, LeaveBalance, PerformanceSummary,
};
use hrpulse_core::error::AssistantError;
use std::collections::HashMap;

/// Read-only, in-memory [`EmployeeDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeDirectory {
    records: HashMap<String, EmployeeSnapshot>,
}

impl InMemoryEmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot; builder-style for seeding.
    pub fn with_snapshot(mut self, snapshot: EmployeeSnapshot) -> Self {
        self.records.insert(snapshot.employee_id.clone(), snapshot);
        self
    }

    /// Demo dataset used by the server's local mode and by tests.
    pub fn seeded() -> Self {
        Self::new()
            .with_snapshot(EmployeeSnapshot {
                employee_id: "emp-001".to_string(),
                display_name: "Asha Rao".to_string(),
                department: "Engineering".to_string(),
                attendance: AttendanceSummary {
                    days_present: 21,
                    days_absent: 1,
                    late_arrivals: 2,
                },
                leave: LeaveBalance {
                    annual_remaining: 12,
                    sick_remaining: 6,
                    pending_requests: 1,
                },
                performance: PerformanceSummary {
                    rating: 4,
                    review_period: "2026-H1".to_string(),
                    goals_met: 5,
                    goals_total: 6,
                },
            })
            .with_snapshot(EmployeeSnapshot {
                employee_id: "emp-002".to_string(),
                display_name: "Daniel Mensah".to_string(),
                department: "Finance".to_string(),
                attendance: AttendanceSummary {
                    days_present: 22,
                    days_absent: 0,
                    late_arrivals: 0,
                },
                leave: LeaveBalance {
                    annual_remaining: 8,
                    sick_remaining: 10,
                    pending_requests: 0,
                },
                performance: PerformanceSummary {
                    rating: 5,
                    review_period: "2026-H1".to_string(),
                    goals_met: 4,
                    goals_total: 4,
                },
            })
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn snapshot(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeSnapshot>, AssistantError> {
        Ok(self.records.get(employee_id).cloned())
    }
}
