//! In-memory financial dataset
//!
//! A [`Table`] holds one [`Record`] per company and year, in source order.
//! It is built once by [`prepare`] (usually through [`load_csv`] or the
//! [`DatasetCache`](crate::cache::DatasetCache)) and never mutated afterwards;
//! consumers share it behind an `Arc`.

mod loader;
mod prepare;

pub use loader::{REQUIRED_COLUMNS, load_csv, load_csv_from_reader};
pub use prepare::{RawRecord, prepare};

use finchat_utils::contains_ignore_case;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header of the company column
pub const COMPANY_COLUMN: &str = "Company";
/// Header of the year column
pub const YEAR_COLUMN: &str = "Year";

/// Numeric columns of a record, raw and derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricColumn {
    #[serde(rename = "Total Revenue ($B)")]
    TotalRevenue,
    #[serde(rename = "Net Income ($B)")]
    NetIncome,
    #[serde(rename = "Total Assets ($B)")]
    TotalAssets,
    #[serde(rename = "Total Liabilities ($B)")]
    TotalLiabilities,
    #[serde(rename = "Cash Flow from Operating Activities ($B)")]
    OperatingCashFlow,
    #[serde(rename = "Revenue Growth (%)")]
    RevenueGrowth,
    #[serde(rename = "Debt-to-Assets Ratio")]
    DebtToAssets,
    #[serde(rename = "ROA (%)")]
    ReturnOnAssets,
    #[serde(rename = "Operating Margin (%)")]
    OperatingMargin,
}

impl MetricColumn {
    /// All numeric columns in table order
    pub const ALL: [Self; 9] = [
        Self::TotalRevenue,
        Self::NetIncome,
        Self::TotalAssets,
        Self::TotalLiabilities,
        Self::OperatingCashFlow,
        Self::RevenueGrowth,
        Self::DebtToAssets,
        Self::ReturnOnAssets,
        Self::OperatingMargin,
    ];

    /// Exact column header
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TotalRevenue => "Total Revenue ($B)",
            Self::NetIncome => "Net Income ($B)",
            Self::TotalAssets => "Total Assets ($B)",
            Self::TotalLiabilities => "Total Liabilities ($B)",
            Self::OperatingCashFlow => "Cash Flow from Operating Activities ($B)",
            Self::RevenueGrowth => "Revenue Growth (%)",
            Self::DebtToAssets => "Debt-to-Assets Ratio",
            Self::ReturnOnAssets => "ROA (%)",
            Self::OperatingMargin => "Operating Margin (%)",
        }
    }
}

impl fmt::Display for MetricColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One company-year row with raw figures and derived ratios.
///
/// Every numeric field is finite once the record has gone through [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub company: String,
    pub year: i32,
    pub total_revenue: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub operating_cash_flow: f64,
    pub revenue_growth: f64,
    pub debt_to_assets: f64,
    pub return_on_assets: f64,
    pub operating_margin: f64,
}

impl Record {
    /// Value of a numeric column
    pub fn value(&self, column: MetricColumn) -> f64 {
        match column {
            MetricColumn::TotalRevenue => self.total_revenue,
            MetricColumn::NetIncome => self.net_income,
            MetricColumn::TotalAssets => self.total_assets,
            MetricColumn::TotalLiabilities => self.total_liabilities,
            MetricColumn::OperatingCashFlow => self.operating_cash_flow,
            MetricColumn::RevenueGrowth => self.revenue_growth,
            MetricColumn::DebtToAssets => self.debt_to_assets,
            MetricColumn::ReturnOnAssets => self.return_on_assets,
            MetricColumn::OperatingMargin => self.operating_margin,
        }
    }
}

/// Prepared, read-only financial table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    companies: Vec<String>,
}

impl Table {
    pub(crate) fn from_records(records: Vec<Record>) -> Self {
        let mut companies: Vec<String> = Vec::new();
        for record in &records {
            if !companies.contains(&record.company) {
                companies.push(record.company.clone());
            }
        }

        Self { records, companies }
    }

    /// All records in source order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct company names in order of first appearance
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Distinct years, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Rows whose company equals `company` exactly, in source order
    pub fn rows_for<'a>(&'a self, company: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.company == company)
    }

    /// First row whose company contains `company_fragment` (case-insensitive)
    /// and whose year equals `year`
    pub fn find(&self, company_fragment: &str, year: i32) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.year == year && contains_ignore_case(&r.company, company_fragment))
    }
}
