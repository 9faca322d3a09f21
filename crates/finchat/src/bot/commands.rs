//! Command parsing for the finchat bot

use crate::error::{FinChatError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List companies in the dataset
    Companies,
    /// List the metric vocabulary
    Metrics,
    /// Trend table for a company
    Trend {
        company: String,
        phrases: Vec<String>,
    },
    /// Show conversation history
    History,
    /// Clear conversation history
    Clear,
    /// Show help
    Help,
    /// Exit the bot
    Exit,
    /// Natural language question (not a command)
    Query { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(FinChatError::CommandError("Empty input".to_string()));
        }

        let Some(body) = input.strip_prefix('/') else {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        };

        let (cmd, rest) = match body.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (body, ""),
        };
        if cmd.is_empty() {
            return Err(FinChatError::CommandError("Empty command".to_string()));
        }

        match cmd.to_lowercase().as_str() {
            "companies" | "c" => Ok(Command::Companies),
            "metrics" | "m" => Ok(Command::Metrics),
            "trend" | "t" => Self::parse_trend(rest),
            "history" | "hist" => Ok(Command::History),
            "clear" | "cls" => Ok(Command::Clear),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(FinChatError::CommandError(format!(
                "Unknown command: {other}"
            ))),
        }
    }

    /// `<company>[: phrase, phrase, ...]`
    fn parse_trend(args: &str) -> Result<Self> {
        let (company, phrases) = match args.split_once(':') {
            Some((company, phrases)) => (company.trim(), phrases),
            None => (args.trim(), ""),
        };

        if company.is_empty() {
            return Err(FinChatError::CommandError(
                "Missing company for trend command".to_string(),
            ));
        }

        let phrases = phrases
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Command::Trend {
            company: company.to_string(),
            phrases,
        })
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Financial Chatbot Commands
==========================

  /companies                        List companies in the dataset
  /metrics                          List the metrics you can ask about
  /trend <company>[: m1, m2, ...]   Show a metric trend table (default: total revenue)
  /history                          Show questions asked so far
  /clear                            Clear the history
  /help                             Show help
  /exit                             Exit

Aliases: /c /m /t /hist /cls /h /q

Ask in plain English, naming a company, a year and a metric:
  - What is the total revenue for Tesla in 2023?
  - Show the operating margin for Apple in 2021.
  - What is the debt-to-assets ratio for Microsoft in 2020?
  - Tell me the net income of Amazon in 2022.
"
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Companies => "List companies",
            Command::Metrics => "List metrics",
            Command::Trend { .. } => "Metric trend table",
            Command::History => "Show history",
            Command::Clear => "Clear history",
            Command::Help => "Show help",
            Command::Exit => "Exit the bot",
            Command::Query { .. } => "Natural language query",
        }
    }
}
