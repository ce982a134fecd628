//! Prompt construction.
//!
//! Prompts are rendered from minijinja templates and bounded: passage
//! and query text are truncated before rendering so a hostile or
//! rambling input cannot inflate the model call.

use hrpulse_core::context::ContextBundle;
use hrpulse_core::retrieval::RetrievedPassage;
use minijinja::{Environment, context};

/// Longest query text forwarded to the model.
const MAX_QUERY_CHARS: usize = 2_000;
/// Longest single passage forwarded to the model.
const MAX_PASSAGE_CHARS: usize = 800;
/// Most passages forwarded to the model.
const MAX_PASSAGES: usize = 6;

const ANSWER_TEMPLATE: &str = r#"You are {{ assistant_name }}, the HR assistant for this company.
Answer the employee's question using only the material below.

{% if schema_facts -%}
Facts about available data:
{% for fact in schema_facts -%}
- {{ fact }}
{% endfor %}
{%- endif %}
{% if security_rules -%}
Rules you must follow:
{% for rule in security_rules -%}
- {{ rule }}
{% endfor %}
{%- endif %}
{% if passages -%}
Relevant policy excerpts:
{% for passage in passages -%}
[{{ passage.source_document_id }}] {{ passage.text }}
{% endfor %}
{%- endif %}
{% if business_notes -%}
Notes:
{% for note in business_notes -%}
- {{ note }}
{% endfor %}
{%- endif %}
{% if example_queries -%}
Questions of this kind look like:
{% for example in example_queries -%}
- {{ example }}
{% endfor %}
{%- endif %}
Question: {{ question }}

Answer concisely. If the material above does not cover the question, say so
and suggest contacting HR directly. Never invent records or policy text."#;

const CLASSIFY_TEMPLATE: &str = r#"Classify this HR assistant query into exactly one category:
greeting_simple, greeting_with_request, personal_data_attendance,
personal_data_leave, personal_data_performance, policy_query,
unauthorized_access, out_of_scope.

Query: {{ question }}

Respond with only a JSON object:
{"category": "<category>", "confidence": <0..1>, "reasoning": "<one sentence>"}"#;

/// Renders the answer-generation prompt for one request.
pub struct PromptBuilder {
    env: Environment<'static>,
    assistant_name: String,
}

impl PromptBuilder {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.add_template("answer", ANSWER_TEMPLATE)
            .expect("answer template is valid");
        Self {
            env,
            assistant_name: assistant_name.into(),
        }
    }

    /// Builds the bounded generation prompt.
    pub fn answer_prompt(
        &self,
        question: &str,
        bundle: &ContextBundle,
        passages: &[RetrievedPassage],
    ) -> String {
        let passages: Vec<RetrievedPassage> = passages
            .iter()
            .take(MAX_PASSAGES)
            .map(|p| RetrievedPassage {
                text: truncate(&p.text, MAX_PASSAGE_CHARS),
                score: p.score,
                source_document_id: p.source_document_id.clone(),
            })
            .collect();

        self.env
            .get_template("answer")
            .expect("answer template registered at construction")
            .render(context! {
                assistant_name => self.assistant_name,
                question => truncate(question, MAX_QUERY_CHARS),
                schema_facts => bundle.schema_facts,
                security_rules => bundle.security_rules,
                business_notes => bundle.business_notes,
                example_queries => bundle.example_queries,
                passages => passages,
            })
            // Every value above serializes; a render failure would be a
            // template bug caught by the tests below.
            .unwrap_or_else(|_| truncate(question, MAX_QUERY_CHARS))
    }
}

/// Builds the remote-classification prompt.
pub fn classification_prompt(question: &str) -> String {
    let env = Environment::new();
    env.render_str(
        CLASSIFY_TEMPLATE,
        context! { question => truncate(question, MAX_QUERY_CHARS) },
    )
    .unwrap_or_else(|_| question.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_includes_all_sections() {
        let builder = PromptBuilder::new("Pulse");
        let bundle = ContextBundle {
            schema_facts: vec!["leave balances exist".to_string()],
            security_rules: vec!["own records only".to_string()],
            example_queries: vec![],
            business_notes: vec!["year ends in December".to_string()],
        };
        let passages = vec![RetrievedPassage {
            text: "Employees accrue 1.5 days per month.".to_string(),
            score: 0.9,
            source_document_id: "policy-leave-001".to_string(),
        }];

        let prompt = builder.answer_prompt("How much leave do I get?", &bundle, &passages);
        assert!(prompt.contains("Pulse"));
        assert!(prompt.contains("own records only"));
        assert!(prompt.contains("policy-leave-001"));
        assert!(prompt.contains("How much leave do I get?"));
    }

    #[test]
    fn prompt_is_bounded_for_oversized_input() {
        let builder = PromptBuilder::new("Pulse");
        let long_question = "leave ".repeat(10_000);
        let prompt = builder.answer_prompt(&long_question, &ContextBundle::default(), &[]);
        assert!(prompt.len() < 5_000);
    }

    #[test]
    fn passage_list_is_capped() {
        let builder = PromptBuilder::new("Pulse");
        let passages: Vec<RetrievedPassage> = (0..20)
            .map(|i| RetrievedPassage {
                text: format!("passage {i}"),
                score: 1.0 - i as f32 * 0.01,
                source_document_id: format!("doc-{i}"),
            })
            .collect();
        let prompt = builder.answer_prompt("q", &ContextBundle::default(), &passages);
        assert!(prompt.contains("doc-5"));
        assert!(!prompt.contains("doc-7"));
    }

    #[test]
    fn classification_prompt_names_every_category() {
        let prompt = classification_prompt("What is the dress code?");
        for category in [
            "greeting_simple",
            "greeting_with_request",
            "personal_data_attendance",
            "personal_data_leave",
            "personal_data_performance",
            "policy_query",
            "unauthorized_access",
            "out_of_scope",
        ] {
            assert!(prompt.contains(category), "missing {category}");
        }
    }
}
