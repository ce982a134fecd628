//! Intent classification.
//!
//! Classification is pattern-first: most HR queries are recognizable
//! from normalized keywords, and greetings must survive sloppy spelling
//! ("gud mrng" is a greeting, not noise). Only queries no local rule
//! recognizes are sent to the remote model, under a hard timeout; any
//! remote failure degrades to the configured fallback category instead
//! of reaching the caller.

use hrpulse_core::agent::GenerationAgent;
use hrpulse_core::intent::{Intent, IntentCategory};
use hrpulse_core::query::ChatQuery;
use regex::Regex;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::prompt::classification_prompt;

/// Standalone salutations, matched fuzzily (see [`squeeze`]).
const SALUTATION_WORDS: &[&str] = &["hello", "hi", "hey", "greetings", "namaste", "howdy"];

/// Time-of-day words that make a greeting out of "good ...". "good" on
/// its own is an ordinary adjective ("good performance review tips").
const TIME_OF_DAY_WORDS: &[&str] = &["morning", "afternoon", "evening", "day"];

const ATTENDANCE_WORDS: &[&str] = &["attendance", "present", "absent", "late", "clock"];
const LEAVE_WORDS: &[&str] = &["leave", "leaves", "vacation", "holiday", "sick", "pto", "balance"];
const PERFORMANCE_WORDS: &[&str] = &["performance", "review", "rating", "appraisal", "goals"];
const POLICY_WORDS: &[&str] = &[
    "policy",
    "policies",
    "rule",
    "rules",
    "entitled",
    "procedure",
    "process",
    "guideline",
    "probation",
    "notice",
    "salary",
    "payroll",
    "overtime",
    "allowed",
    "wfh",
];

/// Words that never name another employee even when followed by `'s`.
const POSSESSIVE_STOPLIST: &[&str] = &[
    "what", "who", "it", "that", "there", "here", "today", "tomorrow", "yesterday", "company",
];

/// Classifies user queries into the closed intent enumeration.
pub struct IntentClassifier {
    remote: Option<Arc<dyn GenerationAgent>>,
    remote_timeout: Duration,
    fallback_category: IntentCategory,
    possessive_re: Regex,
    third_party_re: Regex,
}

impl IntentClassifier {
    /// Creates a classifier without a remote fallback model: queries no
    /// rule recognizes go straight to the fallback category.
    pub fn rules_only(fallback_category: IntentCategory) -> Self {
        Self::build(None, Duration::from_secs(30), fallback_category)
    }

    /// Creates a classifier with a remote model behind the local rules.
    pub fn with_remote(
        remote: Arc<dyn GenerationAgent>,
        remote_timeout: Duration,
        fallback_category: IntentCategory,
    ) -> Self {
        Self::build(Some(remote), remote_timeout, fallback_category)
    }

    fn build(
        remote: Option<Arc<dyn GenerationAgent>>,
        remote_timeout: Duration,
        fallback_category: IntentCategory,
    ) -> Self {
        // ungreedy possessive: "<name>'s <sensitive record>"
        let possessive_re = Regex::new(
            r"\b([a-z]+)'s\s+(?:salary|pay|compensation|rating|performance|attendance|leave|record)",
        )
        .expect("possessive pattern is valid");
        let third_party_re = Regex::new(
            r"\b(?:another|other|someone else|a colleague|my colleague|coworker|co-worker|employee\s+[a-z]+-\d+)\b",
        )
        .expect("third-party pattern is valid");

        Self {
            remote,
            remote_timeout,
            fallback_category,
            possessive_re,
            third_party_re,
        }
    }

    /// Classifies a query. Never fails and never blocks past the
    /// remote timeout.
    pub async fn classify(&self, query: &ChatQuery) -> Intent {
        let text = query.trimmed().to_lowercase();
        let tokens: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .collect();

        // Access control outranks politeness: a restricted request is
        // unauthorized even behind a greeting prefix.
        if !query.role.is_administrative()
            && let Some(reason) = self.match_third_party(&text)
        {
            return Intent::new(IntentCategory::UnauthorizedAccess, 0.9, reason);
        }

        if let Some(intent) = self.match_greeting(&tokens) {
            return intent;
        }

        if let Some(intent) = match_keywords(&tokens) {
            return intent;
        }

        self.classify_remote(query.trimmed()).await
    }

    fn match_greeting(&self, tokens: &[&str]) -> Option<Intent> {
        let greeting_len = greeting_prefix_len(tokens);
        if greeting_len == 0 {
            return None;
        }

        if greeting_len == tokens.len() && tokens.len() <= 4 {
            return Some(Intent::new(
                IntentCategory::GreetingSimple,
                0.95,
                "message consists only of greeting words",
            ));
        }

        // Greeting prefix with real content after it.
        if greeting_len >= 1 && tokens.len() > greeting_len {
            return Some(Intent::new(
                IntentCategory::GreetingWithRequest,
                0.85,
                "greeting followed by a request",
            ));
        }

        None
    }

    fn match_third_party(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.possessive_re.captures(text) {
            let subject = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if !POSSESSIVE_STOPLIST.contains(&subject) && subject != "my" {
                return Some(format!("asks for records belonging to '{subject}'"));
            }
        }
        if self.third_party_re.is_match(text)
            && (contains_any(text, ATTENDANCE_WORDS)
                || contains_any(text, LEAVE_WORDS)
                || contains_any(text, PERFORMANCE_WORDS)
                || text.contains("salary")
                || text.contains("pay"))
        {
            return Some("asks for another employee's records".to_string());
        }
        None
    }

    async fn classify_remote(&self, query_text: &str) -> Intent {
        let Some(remote) = &self.remote else {
            return Intent::fallback(self.fallback_category, "no rule matched");
        };

        let prompt = classification_prompt(query_text);
        let outcome = tokio::time::timeout(self.remote_timeout, remote.generate(&prompt)).await;

        match outcome {
            Ok(Ok(raw)) => parse_remote_intent(&raw).unwrap_or_else(|| {
                warn!("remote classifier returned unparseable output");
                Intent::fallback(self.fallback_category, "remote classifier output unusable")
            }),
            Ok(Err(err)) => {
                warn!(error = %err, "remote classification failed");
                Intent::fallback(self.fallback_category, "remote classifier unavailable")
            }
            Err(_) => {
                // The outstanding call is abandoned, not cancelled; its
                // eventual result is discarded.
                warn!(timeout_secs = self.remote_timeout.as_secs(), "remote classification timed out");
                Intent::fallback(self.fallback_category, "remote classifier timed out")
            }
        }
    }
}

#[derive(Deserialize)]
struct RemoteIntent {
    category: String,
    confidence: f32,
    #[serde(default)]
    reasoning: String,
}

fn parse_remote_intent(raw: &str) -> Option<Intent> {
    let cleaned = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let parsed: RemoteIntent = serde_json::from_str(cleaned).ok()?;
    let category = IntentCategory::from_str(&parsed.category).ok()?;
    debug!(%category, confidence = parsed.confidence, "remote classification accepted");
    Some(Intent::new(category, parsed.confidence, parsed.reasoning))
}

fn match_keywords(tokens: &[&str]) -> Option<Intent> {
    let hit = |words: &[&str]| tokens.iter().any(|t| words.contains(t));

    if hit(ATTENDANCE_WORDS) {
        return Some(Intent::new(
            IntentCategory::PersonalDataAttendance,
            0.85,
            "attendance keywords present",
        ));
    }
    // Policy wording wins over bare leave keywords: "leave policy" is a
    // document question, "my leave balance" is a record question.
    if hit(POLICY_WORDS) {
        return Some(Intent::new(
            IntentCategory::PolicyQuery,
            0.85,
            "policy keywords present",
        ));
    }
    if hit(LEAVE_WORDS) {
        return Some(Intent::new(
            IntentCategory::PersonalDataLeave,
            0.85,
            "leave keywords present",
        ));
    }
    if hit(PERFORMANCE_WORDS) {
        return Some(Intent::new(
            IntentCategory::PersonalDataPerformance,
            0.85,
            "performance keywords present",
        ));
    }
    None
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Length of the leading run of greeting tokens. "good" (and its
/// misspellings) only counts together with a following time-of-day
/// word, consuming both.
fn greeting_prefix_len(tokens: &[&str]) -> usize {
    let mut len = 0;
    while len < tokens.len() {
        let token = tokens[len];
        if word_matches(token, SALUTATION_WORDS) {
            len += 1;
        } else if word_matches(token, &["good"])
            && tokens
                .get(len + 1)
                .is_some_and(|next| word_matches(next, TIME_OF_DAY_WORDS))
        {
            len += 2;
        } else {
            break;
        }
    }
    len
}

fn word_matches(token: &str, words: &[&str]) -> bool {
    let squeezed = squeeze(token);
    words.iter().any(|w| {
        // Skeletons shorter than two letters collide with ordinary
        // words ("he" vs "hi"), so those only match exactly.
        *w == token || (squeezed.len() >= 2 && squeeze(w) == squeezed)
    })
}

/// Collapses a word to its consonant skeleton: vowels dropped, repeated
/// letters deduplicated. "good" and "gud" both become "gd"; "morning"
/// and "mrng" both become "mrng".
fn squeeze(word: &str) -> String {
    let mut out = String::new();
    let mut last = '\0';
    for c in word.chars().filter(|c| c.is_ascii_alphabetic()) {
        if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') {
            continue;
        }
        if c != last {
            out.push(c);
        }
        last = c;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrpulse_core::query::Role;

    fn classifier() -> IntentClassifier {
        IntentClassifier::rules_only(IntentCategory::OutOfScope)
    }

    fn query(text: &str, role: Role) -> ChatQuery {
        ChatQuery::new(text, "emp-001", role)
    }

    #[tokio::test]
    async fn plain_greeting_is_greeting_simple() {
        let intent = classifier().classify(&query("Hello", Role::Employee)).await;
        assert_eq!(intent.category, IntentCategory::GreetingSimple);
        assert!(intent.confidence > 0.8);
    }

    #[tokio::test]
    async fn misspelled_greeting_still_matches() {
        for text in ["gud mrng", "helo", "gd evning", "hey hey"] {
            let intent = classifier().classify(&query(text, Role::Employee)).await;
            assert_eq!(
                intent.category,
                IntentCategory::GreetingSimple,
                "input: {text}"
            );
        }
    }

    #[tokio::test]
    async fn greeting_with_content_is_greeting_with_request() {
        let intent = classifier()
            .classify(&query("Hi, can you help me with something?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::GreetingWithRequest);
    }

    #[tokio::test]
    async fn own_leave_question_is_personal_data() {
        let intent = classifier()
            .classify(&query("How many leaves do I have left?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::PersonalDataLeave);
    }

    #[tokio::test]
    async fn policy_wording_beats_leave_keywords() {
        let intent = classifier()
            .classify(&query("What is the leave carry-over policy?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::PolicyQuery);
    }

    #[tokio::test]
    async fn greeting_prefix_does_not_mask_a_restricted_request() {
        let intent = classifier()
            .classify(&query("Hi, what is Daniel's salary?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::UnauthorizedAccess);
    }

    #[tokio::test]
    async fn good_as_plain_adjective_is_not_a_greeting() {
        let intent = classifier()
            .classify(&query("good performance review tips", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::PersonalDataPerformance);
    }

    #[tokio::test]
    async fn another_employees_salary_is_unauthorized_for_employees() {
        let intent = classifier()
            .classify(&query("What is Daniel's salary?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::UnauthorizedAccess);
        assert!(intent.confidence > 0.8);
    }

    #[tokio::test]
    async fn whats_contraction_is_not_a_possessive_hit() {
        let intent = classifier()
            .classify(&query("What's attendance looking like for me?", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::PersonalDataAttendance);
    }

    #[tokio::test]
    async fn admin_asking_about_others_is_not_unauthorized() {
        let intent = classifier()
            .classify(&query("Show me Daniel's attendance", Role::HrAdmin))
            .await;
        assert_ne!(intent.category, IntentCategory::UnauthorizedAccess);
    }

    #[tokio::test]
    async fn unrecognized_query_falls_back_without_remote() {
        let intent = classifier()
            .classify(&query("Tell me a joke about compilers", Role::Employee))
            .await;
        assert_eq!(intent.category, IntentCategory::OutOfScope);
        assert!(intent.confidence < 0.5);
    }

    #[test]
    fn remote_output_with_code_fences_parses() {
        let raw = "```json\n{\"category\": \"policy_query\", \"confidence\": 0.72, \"reasoning\": \"mentions rules\"}\n```";
        let intent = parse_remote_intent(raw).unwrap();
        assert_eq!(intent.category, IntentCategory::PolicyQuery);
        assert!((intent.confidence - 0.72).abs() < 1e-6);
    }

    #[test]
    fn remote_output_with_unknown_category_is_rejected() {
        assert!(parse_remote_intent(r#"{"category": "weather", "confidence": 0.9}"#).is_none());
    }
}
