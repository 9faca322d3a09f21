//! Financial chatbot
//!
//! This module wires the resolver and trend views behind a line-oriented
//! interface.
//!
//! # Features
//!
//! - **Natural language**: "What is the net income of Amazon in 2022?"
//! - **Commands**: `/companies`, `/metrics`, `/trend Apple: net income`
//! - **History**: recent questions and replies, bounded by `max_history`
//!
//! # Example
//!
//! ```rust,ignore
//! use finchat::bot::{FinChatBot, Reply};
//! use finchat::FinChatConfig;
//!
//! let mut bot = FinChatBot::from_config(FinChatConfig::from_env()?)?;
//! if let Reply::Text(text) = bot.process_input("Tesla net income 2023")? {
//!     println!("{text}");
//! }
//! ```

pub mod commands;
pub mod conversation;

use crate::cache::DatasetCache;
use crate::chart::TrendChart;
use crate::config::FinChatConfig;
use crate::dataset::Table;
use crate::error::{FinChatError, Result};
use crate::metrics::MetricMapping;
use crate::resolver::QueryResolver;
use std::sync::Arc;

pub use commands::Command;
pub use conversation::{ConversationManager, ConversationTurn};

/// Reply to an empty submission
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a query.";

/// What the bot wants the front end to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show this text and keep going
    Text(String),
    /// Leave the session
    Exit,
}

/// Financial chatbot over a prepared table
pub struct FinChatBot {
    resolver: QueryResolver,
    conversation: ConversationManager,
    config: FinChatConfig,
}

impl FinChatBot {
    /// Create a bot over an already prepared table and vocabulary
    pub fn new(table: Arc<Table>, metrics: Arc<MetricMapping>, config: FinChatConfig) -> Self {
        if table.is_empty() {
            tracing::warn!("Starting with an empty dataset; every query will be unresolved");
        }

        let conversation = ConversationManager::with_max_history(config.max_history);
        Self {
            resolver: QueryResolver::new(table, metrics),
            conversation,
            config,
        }
    }

    /// Load the dataset and vocabulary named by `config` and create a bot
    pub fn from_config(config: FinChatConfig) -> Result<Self> {
        Self::from_config_with_cache(config, &DatasetCache::new())
    }

    /// Like [`from_config`](Self::from_config), reusing a dataset cache
    pub fn from_config_with_cache(config: FinChatConfig, cache: &DatasetCache) -> Result<Self> {
        config.validate()?;

        let table = cache.get_or_load(&config.data_path)?;
        let metrics = match &config.metrics_path {
            Some(path) => MetricMapping::from_file(path)?,
            None => MetricMapping::default(),
        };

        tracing::info!(
            companies = table.companies().len(),
            metrics = metrics.len(),
            "Financial chatbot ready"
        );
        Ok(Self::new(table, Arc::new(metrics), config))
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Greeting listing the companies the dataset covers
    pub fn welcome(&self) -> String {
        let mut text = String::from(
            "Financial Chatbot\n\
             Explore financial metrics and trends. Ask me about a company's performance.\n\n\
             Currently, this chatbot provides financial insights for the following companies:\n",
        );
        for company in self.resolver.table().companies() {
            text.push_str(&format!("  - {company}\n"));
        }
        text.push_str(
            "\nAsk about their revenue, net income, assets, liabilities, and more.\n\
             Type /help for commands.",
        );
        text
    }

    /// The resolver this bot answers with
    pub fn resolver(&self) -> &QueryResolver {
        &self.resolver
    }

    /// Process one line of user input
    pub fn process_input(&mut self, input: &str) -> Result<Reply> {
        if input.trim().is_empty() {
            return Ok(Reply::Text(EMPTY_INPUT_MESSAGE.to_string()));
        }

        let command = Command::parse(input)?;
        tracing::debug!(command = command.description(), "Parsed input");
        self.execute_command(command)
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, command: Command) -> Result<Reply> {
        let text = match command {
            Command::Query { text } => self.ask(&text),
            Command::Companies => {
                let companies = self.resolver.table().companies();
                if companies.is_empty() {
                    "The dataset has no companies.".to_string()
                } else {
                    format!("Companies:\n  {}", companies.join("\n  "))
                }
            }
            Command::Metrics => {
                let phrases: Vec<&str> = self.resolver.metrics().phrases().collect();
                format!("Metrics:\n  {}", phrases.join("\n  "))
            }
            Command::Trend { company, phrases } => {
                self.trend(&company, phrases.as_slice())?.render()
            }
            Command::History => self.conversation.format_history(self.config.show_timestamps),
            Command::Clear => {
                self.conversation.clear();
                "Conversation history cleared.".to_string()
            }
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(Reply::Exit),
        };

        Ok(Reply::Text(text))
    }

    /// Answer a natural-language question and record it in the history
    pub fn ask(&mut self, query: &str) -> String {
        let resolution = self.resolver.resolve(query);
        let answered = resolution.is_answer();
        let reply = resolution.to_string();

        self.conversation
            .add_turn(query.to_string(), reply.clone(), answered);
        reply
    }

    /// Trend chart for a company named case-insensitively
    pub fn trend<S: AsRef<str>>(&self, company: &str, phrases: &[S]) -> Result<TrendChart> {
        let wanted = company.to_lowercase();
        let table = self.resolver.table();
        let canonical = table
            .companies()
            .iter()
            .find(|c| c.to_lowercase() == wanted)
            .ok_or_else(|| FinChatError::UnknownCompany(company.to_string()))?;

        TrendChart::build(table, canonical, phrases, self.resolver.metrics())
    }

    /// Get the conversation manager
    pub fn conversation(&self) -> &ConversationManager {
        &self.conversation
    }
}
