//! Metric vocabulary: the ordered phrase-to-column mapping used for extraction
//!
//! Order matters. Extraction returns the first phrase (in mapping order) found
//! in a query, so reordering the vocabulary changes which metric wins when a
//! query mentions several.

use crate::dataset::MetricColumn;
use crate::error::{FinChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One vocabulary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Lowercase phrase looked for in queries
    pub phrase: String,
    /// Column the phrase refers to
    pub column: MetricColumn,
}

impl MetricEntry {
    pub fn new(phrase: impl Into<String>, column: MetricColumn) -> Self {
        Self {
            phrase: phrase.into().to_lowercase(),
            column,
        }
    }
}

/// Ordered, read-only phrase-to-column mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricMapping {
    entries: Vec<MetricEntry>,
}

impl Default for MetricMapping {
    fn default() -> Self {
        Self {
            entries: vec![
                MetricEntry::new("total revenue", MetricColumn::TotalRevenue),
                MetricEntry::new("net income", MetricColumn::NetIncome),
                MetricEntry::new("total assets", MetricColumn::TotalAssets),
                MetricEntry::new("total liabilities", MetricColumn::TotalLiabilities),
                MetricEntry::new("cash flow", MetricColumn::OperatingCashFlow),
                MetricEntry::new("revenue growth", MetricColumn::RevenueGrowth),
                MetricEntry::new("debt-to-assets ratio", MetricColumn::DebtToAssets),
                MetricEntry::new("return on assets", MetricColumn::ReturnOnAssets),
                MetricEntry::new("operating margin", MetricColumn::OperatingMargin),
            ],
        }
    }
}

impl MetricMapping {
    /// Build a mapping from entries, keeping their order
    pub fn new(entries: Vec<MetricEntry>) -> Result<Self> {
        let mapping = Self {
            entries: entries
                .into_iter()
                .map(|e| MetricEntry::new(e.phrase, e.column))
                .collect(),
        };
        mapping.validate()?;
        Ok(mapping)
    }

    /// Load a mapping from a JSON array of `{"phrase", "column"}` objects.
    ///
    /// ```json
    /// [
    ///   {"phrase": "total revenue", "column": "Total Revenue ($B)"},
    ///   {"phrase": "net income", "column": "Net Income ($B)"}
    /// ]
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mapping = Self::from_json(&content)?;
        tracing::info!(
            path = %path.as_ref().display(),
            phrases = mapping.len(),
            "Loaded metric vocabulary"
        );
        Ok(mapping)
    }

    /// Parse a mapping from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<MetricEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Check the mapping is non-empty and has no blank or duplicate phrases
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(FinChatError::ConfigError(
                "metric vocabulary must not be empty".to_string(),
            ));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.phrase.trim().is_empty() {
                return Err(FinChatError::ConfigError(format!(
                    "metric phrase #{} is blank",
                    i + 1
                )));
            }
            if self.entries[..i].iter().any(|e| e.phrase == entry.phrase) {
                return Err(FinChatError::ConfigError(format!(
                    "duplicate metric phrase '{}'",
                    entry.phrase
                )));
            }
        }

        Ok(())
    }

    /// Entries in mapping order
    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    /// Phrases in mapping order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.phrase.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column for an exact phrase (case-insensitive)
    pub fn get(&self, phrase: &str) -> Option<MetricColumn> {
        let phrase = phrase.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.phrase == phrase)
            .map(|e| e.column)
    }

    /// First entry, in mapping order, whose phrase occurs in `query_lower`.
    ///
    /// `query_lower` must already be lowercased.
    pub fn first_match(&self, query_lower: &str) -> Option<&MetricEntry> {
        self.entries
            .iter()
            .find(|e| query_lower.contains(e.phrase.as_str()))
    }

    /// A copy with the given phrases moved to the front, in the given order.
    ///
    /// Unknown phrases are ignored.
    pub fn prioritized<S: AsRef<str>>(&self, phrases: &[S]) -> Self {
        let mut front = Vec::new();
        for phrase in phrases {
            let phrase = phrase.as_ref().to_lowercase();
            if let Some(entry) = self.entries.iter().find(|e| e.phrase == phrase) {
                if !front.contains(entry) {
                    front.push(entry.clone());
                }
            }
        }

        let rest = self
            .entries
            .iter()
            .filter(|e| !front.contains(e))
            .cloned()
            .collect::<Vec<_>>();
        front.extend(rest);

        Self { entries: front }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_order() {
        let mapping = MetricMapping::default();
        let phrases: Vec<&str> = mapping.phrases().collect();

        assert_eq!(phrases.len(), 9);
        assert_eq!(phrases[0], "total revenue");
        assert_eq!(phrases[8], "operating margin");
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_get() {
        let mapping = MetricMapping::default();
        assert_eq!(mapping.get("Return On Assets"), Some(MetricColumn::ReturnOnAssets));
        assert_eq!(mapping.get("ebitda"), None);
    }

    #[test]
    fn test_first_match_follows_mapping_order() {
        let mapping = MetricMapping::default();
        let query = "compare net income and total revenue for apple in 2021";

        assert_eq!(
            mapping.first_match(query).map(|e| e.column),
            Some(MetricColumn::TotalRevenue)
        );

        let reordered = mapping.prioritized(&["net income"]);
        assert_eq!(
            reordered.first_match(query).map(|e| e.column),
            Some(MetricColumn::NetIncome)
        );
        assert_eq!(reordered.len(), mapping.len());
    }

    #[test]
    fn test_from_json_keeps_order_and_lowercases() {
        let json = r#"[
            {"phrase": "Margin", "column": "Operating Margin (%)"},
            {"phrase": "sales", "column": "Total Revenue ($B)"}
        ]"#;
        let mapping = MetricMapping::from_json(json).unwrap();

        let phrases: Vec<&str> = mapping.phrases().collect();
        assert_eq!(phrases, vec!["margin", "sales"]);
        assert_eq!(mapping.get("sales"), Some(MetricColumn::TotalRevenue));
    }

    #[test]
    fn test_from_json_rejects_unknown_column() {
        let json = r#"[{"phrase": "ebitda", "column": "EBITDA ($B)"}]"#;
        assert!(matches!(
            MetricMapping::from_json(json),
            Err(FinChatError::Json(_))
        ));
    }

    #[test]
    fn test_validation() {
        assert!(MetricMapping::new(vec![]).is_err());

        let dup = vec![
            MetricEntry::new("revenue", MetricColumn::TotalRevenue),
            MetricEntry::new("Revenue", MetricColumn::RevenueGrowth),
        ];
        let err = MetricMapping::new(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate"));

        let blank = vec![MetricEntry::new("  ", MetricColumn::NetIncome)];
        assert!(MetricMapping::new(blank).is_err());
    }
}
