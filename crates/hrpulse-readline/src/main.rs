//! Interactive terminal client for the HRPulse assistant.
//!
//! Talks to the orchestrator in-process using the same wiring as the
//! server, so it works with or without API keys. Slash commands switch
//! the simulated identity; everything else is sent as a chat query.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use hrpulse_core::config::SecretConfig;
use hrpulse_core::query::{ChatQuery, Role};
use hrpulse_core::secret::SecretService;
use hrpulse_infrastructure::{ConfigService, SecretServiceImpl};
use hrpulse_server::state::AppState;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/role".to_string(),
                "/user".to_string(),
                "/help".to_string(),
                "/quit".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigService::new().get_config();
    let secrets = match SecretServiceImpl::new_default() {
        Ok(service) if service.secret_file_exists().await => {
            service.load_secrets().await.unwrap_or_default()
        }
        _ => SecretConfig::default(),
    };
    let state = Arc::new(AppState::from_config(&config, &secrets));

    let mut user_id = "emp-001".to_string();
    let mut role = Role::Employee;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!(
        "{}",
        format!("=== {} — HR assistant ===", config.chatbot.assistant_name)
            .bright_magenta()
            .bold()
    );
    println!(
        "{}",
        "Ask about attendance, leave, performance, or policy. \
         '/role <employee|manager|hr_admin>', '/user <id>', '/quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(&format!("{user_id}> "));

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/quit" || trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed == "/help" {
                    println!(
                        "{}",
                        "/role <employee|manager|hr_admin>  switch role\n\
                         /user <id>                        switch user\n\
                         /quit                             exit"
                            .bright_black()
                    );
                    continue;
                }
                if let Some(rest) = trimmed.strip_prefix("/role ") {
                    match parse_role(rest.trim()) {
                        Some(parsed) => {
                            role = parsed;
                            println!("{}", format!("Role set to {rest}").yellow());
                        }
                        None => println!(
                            "{}",
                            "Unknown role; use employee, manager, or hr_admin".red()
                        ),
                    }
                    continue;
                }
                if let Some(rest) = trimmed.strip_prefix("/user ") {
                    user_id = rest.trim().to_string();
                    println!("{}", format!("User set to {user_id}").yellow());
                    continue;
                }

                let query = ChatQuery::new(trimmed, user_id.clone(), role);
                match state.orchestrator.handle(&query).await {
                    Ok(response) => {
                        for line in response.message.lines() {
                            println!("{}", line.bright_blue());
                        }
                        let mut meta = format!(
                            "[{} | confidence {:.2} | {} ms{}]",
                            response.intent,
                            response.confidence,
                            response.response_time_ms,
                            if response.cached { " | cached" } else { "" }
                        );
                        if !response.sources.is_empty() {
                            let ids: Vec<&str> = response
                                .sources
                                .iter()
                                .map(|s| s.document_id.as_str())
                                .collect();
                            meta.push_str(&format!(" sources: {}", ids.join(", ")));
                        }
                        println!("{}", meta.bright_black());
                        println!();
                    }
                    Err(err) => {
                        println!("{}", format!("{err}").red());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

fn parse_role(raw: &str) -> Option<Role> {
    // serde's snake_case names double as the CLI spelling.
    match raw {
        "employee" => Some(Role::Employee),
        "manager" => Some(Role::Manager),
        "hr_admin" | "admin" => Some(Role::HrAdmin),
        _ => None,
    }
}
