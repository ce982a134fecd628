//! Canned responses and degraded-mode fallbacks.
//!
//! Recovery is an ordered list: first the per-category template, then
//! the guaranteed-safe default. The default is a plain constant so the
//! final step cannot itself fail.

use hrpulse_core::intent::IntentCategory;
use minijinja::{Environment, context};

/// The last-resort reply. No placeholders, cannot fail to render.
const SAFE_DEFAULT: &str =
    "I'm having trouble answering right now. Please try again in a moment, \
     or contact HR directly if it's urgent.";

const GREETING_TEMPLATE: &str =
    "Hello! I'm {{ assistant_name }}, your HR assistant. I can help with \
     attendance, leave balances, performance reviews, and company policy \
     questions. What can I do for you?";

const UNAUTHORIZED_TEMPLATE: &str =
    "I can only share records that belong to you. For information about \
     other employees, please contact HR directly.";

const OUT_OF_SCOPE_TEMPLATE: &str =
    "That's outside what I can help with. I'm {{ assistant_name }}, and I \
     cover attendance, leave, performance, and HR policy questions.";

const DEGRADED_TEMPLATE: &str =
    "Sorry, I'm responding slower than usual right now. Here's what I can \
     say: please retry in a moment, and I'll have a proper answer for you.";

/// Renders per-category canned responses.
pub struct FallbackLibrary {
    env: Environment<'static>,
    assistant_name: String,
}

impl FallbackLibrary {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.add_template("greeting", GREETING_TEMPLATE)
            .expect("greeting template is valid");
        env.add_template("unauthorized", UNAUTHORIZED_TEMPLATE)
            .expect("unauthorized template is valid");
        env.add_template("out_of_scope", OUT_OF_SCOPE_TEMPLATE)
            .expect("out_of_scope template is valid");
        env.add_template("degraded", DEGRADED_TEMPLATE)
            .expect("degraded template is valid");
        Self {
            env,
            assistant_name: assistant_name.into(),
        }
    }

    /// The canned primary answer for intents that never reach the
    /// model; `None` for intents that require generation.
    pub fn canned(&self, category: IntentCategory) -> Option<String> {
        let template = match category {
            IntentCategory::GreetingSimple => "greeting",
            IntentCategory::UnauthorizedAccess => "unauthorized",
            IntentCategory::OutOfScope => "out_of_scope",
            _ => return None,
        };
        Some(self.render(template))
    }

    /// The degraded reply used when generation fails or times out.
    /// Always produces text: canned answer first, apology otherwise.
    pub fn degraded(&self, category: IntentCategory) -> String {
        self.canned(category)
            .unwrap_or_else(|| self.render("degraded"))
    }

    fn render(&self, name: &str) -> String {
        self.env
            .get_template(name)
            .and_then(|t| t.render(context! { assistant_name => self.assistant_name }))
            .unwrap_or_else(|_| SAFE_DEFAULT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn greeting_mentions_the_assistant_name() {
        let library = FallbackLibrary::new("Pulse");
        let greeting = library.canned(IntentCategory::GreetingSimple).unwrap();
        assert!(greeting.contains("Pulse"));
    }

    #[test]
    fn generation_intents_have_no_canned_answer() {
        let library = FallbackLibrary::new("Pulse");
        assert!(library.canned(IntentCategory::PolicyQuery).is_none());
        assert!(library.canned(IntentCategory::PersonalDataLeave).is_none());
        assert!(library.canned(IntentCategory::GreetingWithRequest).is_none());
    }

    #[test]
    fn degraded_always_produces_text() {
        let library = FallbackLibrary::new("Pulse");
        for category in IntentCategory::iter() {
            assert!(!library.degraded(category).is_empty(), "empty for {category}");
        }
    }
}
