//! Query resolution: turn a free-text question into an answer sentence
//!
//! Extraction is three independent first-match scans over the query:
//!
//! 1. **Year** - the first standalone `20xx` token written in ASCII digits.
//! 2. **Company** - the first dataset company (in table order) whose name
//!    occurs in the query, ignoring case.
//! 3. **Metric** - the first vocabulary phrase (in mapping order) that occurs
//!    in the query, ignoring case.
//!
//! Overlapping names resolve by order, not by length: if one company name is
//! a substring of another, whichever appears first in the table wins.

use crate::dataset::{MetricColumn, Table};
use crate::metrics::MetricMapping;
use finchat_utils::{format_decimal, title_case};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Reply when a query lacks a company, a year or a metric
pub const UNRESOLVED_MESSAGE: &str =
    "Sorry, I couldn't understand your query. Please ask about a specific company, year, and metric.";

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20[0-9]{2})\b").expect("year pattern is valid"));

/// A field the resolver tries to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Company,
    Year,
    Metric,
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Company => "company",
            Self::Year => "year",
            Self::Metric => "metric",
        };
        f.write_str(name)
    }
}

/// What extraction found in a query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedQuery {
    pub year: Option<i32>,
    /// Company name as spelled in the dataset
    pub company: Option<String>,
    pub metric: Option<MetricColumn>,
}

impl ExtractedQuery {
    /// Fields that could not be extracted
    pub fn missing(&self) -> Vec<QueryField> {
        let mut missing = Vec::new();
        if self.company.is_none() {
            missing.push(QueryField::Company);
        }
        if self.year.is_none() {
            missing.push(QueryField::Year);
        }
        if self.metric.is_none() {
            missing.push(QueryField::Metric);
        }
        missing
    }
}

/// Outcome of resolving a query
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A matching record was found
    Answer {
        company: String,
        year: i32,
        column: MetricColumn,
        value: f64,
    },
    /// Company, year or metric could not be extracted
    Unresolved { missing: Vec<QueryField> },
    /// Extraction succeeded but no record matches
    NotFound { company: String, year: i32 },
}

impl Resolution {
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer {
                company,
                year,
                column,
                value,
            } => write!(
                f,
                "The {} for {} in {} is {}.",
                column.name().to_lowercase(),
                title_case(company),
                year,
                format_decimal(*value)
            ),
            Self::Unresolved { .. } => f.write_str(UNRESOLVED_MESSAGE),
            Self::NotFound { company, year } => write!(
                f,
                "Sorry, I couldn't find any data for {} in {}.",
                title_case(company),
                year
            ),
        }
    }
}

/// Resolves questions against a prepared table and a metric vocabulary.
///
/// Holds shared, read-only handles; resolving never mutates anything, so the
/// same query always yields the same answer.
#[derive(Debug, Clone)]
pub struct QueryResolver {
    table: Arc<Table>,
    metrics: Arc<MetricMapping>,
}

impl QueryResolver {
    /// Create a resolver over the given table and vocabulary
    pub fn new(table: Arc<Table>, metrics: Arc<MetricMapping>) -> Self {
        Self { table, metrics }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn metrics(&self) -> &MetricMapping {
        &self.metrics
    }

    /// Extract year, company and metric from a query
    pub fn extract(&self, query: &str) -> ExtractedQuery {
        extract(query, &self.table, &self.metrics)
    }

    /// Resolve a query into an answer or one of the two failure outcomes
    pub fn resolve(&self, query: &str) -> Resolution {
        resolve_in(query, &self.table, &self.metrics)
    }

    /// Resolve a query straight to the reply sentence
    pub fn answer(&self, query: &str) -> String {
        self.resolve(query).to_string()
    }
}

/// First standalone `20xx` token in the query.
///
/// Only ASCII digits count; `20٢١` is not a year.
pub fn extract_year(query: &str) -> Option<i32> {
    YEAR_PATTERN
        .captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse().ok())
}

/// First company, in table order, whose lowercase name occurs in `query_lower`
fn extract_company<'a>(table: &'a Table, query_lower: &str) -> Option<&'a str> {
    table
        .companies()
        .iter()
        .find(|c| query_lower.contains(&c.to_lowercase()))
        .map(String::as_str)
}

fn extract(query: &str, table: &Table, metrics: &MetricMapping) -> ExtractedQuery {
    let query_lower = query.to_lowercase();

    let extracted = ExtractedQuery {
        year: extract_year(query),
        company: extract_company(table, &query_lower).map(str::to_string),
        metric: metrics.first_match(&query_lower).map(|e| e.column),
    };

    tracing::debug!(
        year = ?extracted.year,
        company = ?extracted.company,
        metric = ?extracted.metric,
        "Extracted query fields"
    );
    extracted
}

fn resolve_in(query: &str, table: &Table, metrics: &MetricMapping) -> Resolution {
    let extracted = extract(query, table, metrics);
    let missing = extracted.missing();

    let (Some(company), Some(year), Some(column)) =
        (extracted.company, extracted.year, extracted.metric)
    else {
        return Resolution::Unresolved { missing };
    };

    match table.find(&company, year) {
        Some(record) => Resolution::Answer {
            value: record.value(column),
            company,
            year,
            column,
        },
        None => {
            tracing::debug!(%company, year, "No record for extracted company and year");
            Resolution::NotFound { company, year }
        }
    }
}

/// Resolve a single query against a table and vocabulary to the reply sentence
pub fn resolve(query: &str, table: &Table, metrics: &MetricMapping) -> String {
    resolve_in(query, table, metrics).to_string()
}
