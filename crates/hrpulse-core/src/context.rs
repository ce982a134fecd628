//! Context bundle model.

use serde::{Deserialize, Serialize};

/// The grounding material assembled for one intent category.
///
/// A bundle is what the orchestrator hands to the prompt builder:
/// schema facts describe what data exists, security rules state what
/// the model must refuse, example queries steer the answer format, and
/// business notes carry HR-specific conventions (cutoff dates, accrual
/// rules, escalation contacts).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextBundle {
    pub schema_facts: Vec<String>,
    pub security_rules: Vec<String>,
    pub example_queries: Vec<String>,
    pub business_notes: Vec<String>,
}

impl ContextBundle {
    /// True when the bundle carries nothing usable for prompting.
    pub fn is_empty(&self) -> bool {
        self.schema_facts.is_empty()
            && self.security_rules.is_empty()
            && self.example_queries.is_empty()
            && self.business_notes.is_empty()
    }
}
