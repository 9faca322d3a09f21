//! Conversation history for the finchat bot
//!
//! History is kept for display only. Every query is resolved on its own;
//! nothing recorded here feeds back into resolution.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Default number of turns kept
const MAX_HISTORY_SIZE: usize = 50;

/// A single question and its reply
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub user_input: String,
    pub response: String,
    /// Whether the reply carried a value from the dataset
    pub answered: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_input: String, response: String, answered: bool) -> Self {
        Self {
            user_input,
            response,
            answered,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded, oldest-first conversation history
#[derive(Debug)]
pub struct ConversationManager {
    history: VecDeque<ConversationTurn>,
    max_history: usize,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::with_max_history(MAX_HISTORY_SIZE)
    }

    /// Create with custom history size
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Record a turn, dropping the oldest ones past the limit
    pub fn add_turn(&mut self, user_input: String, response: String, answered: bool) {
        self.history
            .push_back(ConversationTurn::new(user_input, response, answered));

        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    /// Most recent `n` turns, newest first
    pub fn last_turns(&self, n: usize) -> Vec<&ConversationTurn> {
        self.history.iter().rev().take(n).collect()
    }

    /// Share of recorded turns that produced an answer
    pub fn answer_rate(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let answered = self.history.iter().filter(|t| t.answered).count();
        Some(answered as f64 / self.history.len() as f64)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Render the history oldest-first
    pub fn format_history(&self, show_timestamps: bool) -> String {
        if self.history.is_empty() {
            return "No questions asked yet.".to_string();
        }

        let mut out = String::new();
        for (i, turn) in self.history.iter().enumerate() {
            if show_timestamps {
                out.push_str(&format!(
                    "[{}] ",
                    turn.timestamp.format("%Y-%m-%d %H:%M:%S")
                ));
            }
            out.push_str(&format!("Q{}: {}\n", i + 1, turn.user_input));
            out.push_str(&format!("A{}: {}\n", i + 1, turn.response));
        }
        out
    }
}
