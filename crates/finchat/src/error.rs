//! Error types for dataset loading and bot operations

use thiserror::Error;

/// Errors raised while loading data, configuring the bot or handling commands.
///
/// A query that cannot be understood, or that finds no matching record, is
/// not an error: see [`crate::resolver::Resolution`].
#[derive(Debug, Error)]
pub enum FinChatError {
    /// The dataset could not be read or parsed
    #[error("Failed to load dataset from {source_name}: {reason}")]
    DataLoad {
        source_name: String,
        reason: String,
    },

    /// The dataset header lacks required columns
    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed bot command
    #[error("Command error: {0}")]
    CommandError(String),

    /// Company not present in the dataset
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    /// Metric phrase not present in the vocabulary
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl FinChatError {
    /// Whether this error should abort startup rather than be shown to the user
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DataLoad { .. } | Self::MissingColumns(_) | Self::Io(_) | Self::Csv(_)
        )
    }
}

/// Result type alias for finchat operations
pub type Result<T> = std::result::Result<T, FinChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinChatError::MissingColumns(vec![
            "Net Income ($B)".to_string(),
            "Year".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Dataset is missing required columns: Net Income ($B), Year"
        );

        let err = FinChatError::DataLoad {
            source_name: "financial_data.csv".to_string(),
            reason: "line 3: invalid Year 'abc'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to load dataset from financial_data.csv: line 3: invalid Year 'abc'"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(FinChatError::MissingColumns(vec![]).is_fatal());
        assert!(!FinChatError::CommandError("Empty command".to_string()).is_fatal());
        assert!(!FinChatError::UnknownMetric("ebitda".to_string()).is_fatal());
    }
}
