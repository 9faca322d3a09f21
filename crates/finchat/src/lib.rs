//! Financial question answering over company records
//!
//! This crate answers questions such as "What is the total revenue for Apple
//! in 2021?" from a CSV of per-company, per-year financial figures. It
//! includes:
//!
//! - Dataset loading and preparation with derived ratios (revenue growth,
//!   debt-to-assets, return on assets, operating margin)
//! - A replaceable, ordered metric vocabulary
//! - A query resolver that extracts company, year and metric by first match
//! - Year-indexed trend views for a company
//! - A line-oriented chatbot with commands and history
//!
//! # Example
//!
//! ```rust,ignore
//! use finchat::{MetricMapping, QueryResolver, load_csv};
//! use std::sync::Arc;
//!
//! let table = Arc::new(load_csv("data/financial_data.csv")?);
//! let resolver = QueryResolver::new(table, Arc::new(MetricMapping::default()));
//!
//! println!("{}", resolver.answer("What is the total revenue for Apple in 2021?"));
//! ```

pub mod bot;
pub mod cache;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod resolver;

// Re-export main types for convenience
pub use bot::{FinChatBot, Reply};
pub use cache::DatasetCache;
pub use chart::{TrendChart, TrendSeries};
pub use config::FinChatConfig;
pub use dataset::{MetricColumn, Record, Table, load_csv, prepare};
pub use error::{FinChatError, Result};
pub use metrics::{MetricEntry, MetricMapping};
pub use resolver::{QueryResolver, Resolution, resolve};
