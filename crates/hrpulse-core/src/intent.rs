//! Intent classification model.
//!
//! Intent categories form a closed enumeration: adding a category is a
//! compile-time-checked change, and every dispatch site matches
//! exhaustively. String-keyed branching is deliberately avoided.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The classified purpose of a user query.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentCategory {
    /// A plain greeting with no request attached ("hello", "gud mrng").
    GreetingSimple,
    /// A greeting followed by an actual request.
    GreetingWithRequest,
    /// A question about the caller's own attendance records.
    PersonalDataAttendance,
    /// A question about the caller's own leave balance or requests.
    PersonalDataLeave,
    /// A question about the caller's own performance reviews.
    PersonalDataPerformance,
    /// A question about company HR policy documents.
    PolicyQuery,
    /// A request for data the caller's role does not permit.
    UnauthorizedAccess,
    /// Anything the assistant does not handle.
    OutOfScope,
}

impl IntentCategory {
    /// Whether answering this intent requires policy-document retrieval.
    pub fn needs_retrieval(&self) -> bool {
        matches!(self, IntentCategory::PolicyQuery)
    }

    /// Whether answering this intent requires the caller's own records.
    pub fn needs_personal_context(&self) -> bool {
        matches!(
            self,
            IntentCategory::PersonalDataAttendance
                | IntentCategory::PersonalDataLeave
                | IntentCategory::PersonalDataPerformance
        )
    }

    /// Whether this intent is answered from templates alone, without
    /// invoking the generation model.
    pub fn is_templated(&self) -> bool {
        matches!(
            self,
            IntentCategory::GreetingSimple
                | IntentCategory::UnauthorizedAccess
                | IntentCategory::OutOfScope
        )
    }
}

/// Result of classifying a single query.
///
/// Not persisted beyond the request lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub category: IntentCategory,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    /// Short human-readable explanation of the decision.
    pub reasoning: String,
}

impl Intent {
    pub fn new(category: IntentCategory, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
        }
    }

    /// The conservative intent used when classification fails.
    pub fn fallback(category: IntentCategory, reason: impl Into<String>) -> Self {
        Self::new(category, 0.2, reason)
    }
}
