//! Shared utilities for finchat
//!
//! This crate provides common functionality used across the finchat workspace:
//! tracing setup and the small text helpers the resolver and formatters share.

pub mod logging;
pub mod text;

pub use logging::{LogFormat, init_tracing, init_tracing_with};
pub use text::{contains_ignore_case, format_decimal, title_case};
