//! Context bundle assembly.
//!
//! Builds the grounding material for each intent category, scoped to
//! the requesting user. The scoping rule lives here, not in callers: a
//! non-administrative caller only ever sees facts derived from their
//! own records, whatever the orchestrator asks for.

use hrpulse_core::directory::{EmployeeDirectory, EmployeeSnapshot};
use hrpulse_core::context::ContextBundle;
use hrpulse_core::intent::IntentCategory;
use hrpulse_core::query::ChatQuery;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

struct CachedBundle {
    bundle: ContextBundle,
    created_at: Instant,
}

/// Assembles and caches [`ContextBundle`]s per intent category.
pub struct ContextStore {
    directory: Arc<dyn EmployeeDirectory>,
    cache: RwLock<HashMap<String, CachedBundle>>,
    ttl: Duration,
}

impl ContextStore {
    pub fn new(directory: Arc<dyn EmployeeDirectory>, ttl: Duration) -> Self {
        Self {
            directory,
            cache: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the bundle for one category and caller.
    ///
    /// Bundles for personal-data categories embed the caller's own
    /// record values, so their cache key carries the user and role
    /// discriminator; shared bundles (policy, greetings) are keyed by
    /// category alone.
    pub async fn get_context(&self, category: IntentCategory, query: &ChatQuery) -> ContextBundle {
        let key = if category.needs_personal_context() {
            format!("{category}|{}:{}", query.user_id, query.role.as_str())
        } else {
            category.to_string()
        };

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&key)
                && cached.created_at.elapsed() < self.ttl
            {
                return cached.bundle.clone();
            }
        }

        let bundle = self.assemble(category, query).await;

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CachedBundle {
                bundle: bundle.clone(),
                created_at: Instant::now(),
            },
        );
        bundle
    }

    async fn assemble(&self, category: IntentCategory, query: &ChatQuery) -> ContextBundle {
        let mut bundle = base_bundle(category);

        bundle.security_rules.push(format!(
            "Only disclose records belonging to user '{}'; refuse requests about anyone else.",
            query.user_id
        ));

        if category.needs_personal_context() {
            // Scoped to the caller's own snapshot. Administrative roles
            // query other employees through dedicated reporting flows,
            // not through this assistant's personal-data path.
            match self.directory.snapshot(&query.user_id).await {
                Ok(Some(snapshot)) => push_personal_facts(&mut bundle, category, &snapshot),
                Ok(None) => bundle
                    .schema_facts
                    .push("No records found for the requesting user.".to_string()),
                Err(err) => {
                    warn!(error = %err, user_id = %query.user_id, "employee lookup failed");
                    bundle
                        .schema_facts
                        .push("Employee records are temporarily unavailable.".to_string());
                }
            }
        }

        bundle
    }
}

fn base_bundle(category: IntentCategory) -> ContextBundle {
    let mut bundle = ContextBundle::default();
    match category {
        IntentCategory::PersonalDataAttendance => {
            bundle
                .schema_facts
                .push("Attendance records cover the current month.".to_string());
            bundle
                .example_queries
                .push("How many days was I late this month?".to_string());
        }
        IntentCategory::PersonalDataLeave => {
            bundle
                .schema_facts
                .push("Leave balances are tracked per calendar year.".to_string());
            bundle
                .example_queries
                .push("How many annual leave days do I have left?".to_string());
            bundle
                .business_notes
                .push("Up to 10 unused annual days carry over to next year.".to_string());
        }
        IntentCategory::PersonalDataPerformance => {
            bundle
                .schema_facts
                .push("Performance reviews run twice a year on a 1-5 scale.".to_string());
            bundle
                .example_queries
                .push("What was my last review rating?".to_string());
        }
        IntentCategory::PolicyQuery => {
            bundle
                .schema_facts
                .push("Answers must come from the retrieved policy excerpts.".to_string());
            bundle
                .example_queries
                .push("What is the notice period during probation?".to_string());
            bundle
                .business_notes
                .push("The HR policy handbook was last revised in January 2026.".to_string());
        }
        IntentCategory::GreetingSimple
        | IntentCategory::GreetingWithRequest
        | IntentCategory::UnauthorizedAccess
        | IntentCategory::OutOfScope => {}
    }
    bundle
}

fn push_personal_facts(
    bundle: &mut ContextBundle,
    category: IntentCategory,
    snapshot: &EmployeeSnapshot,
) {
    match category {
        IntentCategory::PersonalDataAttendance => {
            bundle.schema_facts.push(format!(
                "{}: {} days present, {} absent, {} late arrivals this period.",
                snapshot.display_name,
                snapshot.attendance.days_present,
                snapshot.attendance.days_absent,
                snapshot.attendance.late_arrivals
            ));
        }
        IntentCategory::PersonalDataLeave => {
            bundle.schema_facts.push(format!(
                "{}: {} annual and {} sick days remaining, {} request(s) pending.",
                snapshot.display_name,
                snapshot.leave.annual_remaining,
                snapshot.leave.sick_remaining,
                snapshot.leave.pending_requests
            ));
        }
        IntentCategory::PersonalDataPerformance => {
            bundle.schema_facts.push(format!(
                "{}: rated {}/5 for {}, {} of {} goals met.",
                snapshot.display_name,
                snapshot.performance.rating,
                snapshot.performance.review_period,
                snapshot.performance.goals_met,
                snapshot.performance.goals_total
            ));
        }
        _ => {}
    }
}
