//! Derived-column computation

use super::{Record, Table};
use serde::Deserialize;
use std::collections::HashMap;

/// A row as read from the source file, before derived columns exist.
///
/// Empty numeric cells are `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Total Revenue ($B)")]
    pub total_revenue: Option<f64>,
    #[serde(rename = "Net Income ($B)")]
    pub net_income: Option<f64>,
    #[serde(rename = "Total Assets ($B)")]
    pub total_assets: Option<f64>,
    #[serde(rename = "Total Liabilities ($B)")]
    pub total_liabilities: Option<f64>,
    #[serde(rename = "Cash Flow from Operating Activities ($B)")]
    pub operating_cash_flow: Option<f64>,
}

/// Build the prepared table from raw rows.
///
/// Growth compares each row with the previous row of the same company in
/// input order, so rows must be year-ascending within a company. A row with
/// no revenue has no growth, and neither does the row after it. Any value
/// that ends up undefined (missing cell, zero denominator, no predecessor)
/// is stored as `0.0`. Row order is preserved.
pub fn prepare(raw: Vec<RawRecord>) -> Table {
    let mut previous_revenue: HashMap<String, Option<f64>> = HashMap::new();
    let mut records = Vec::with_capacity(raw.len());

    for row in raw {
        let revenue_growth = previous_revenue
            .insert(row.company.clone(), row.total_revenue)
            .and_then(|prev| percent(difference(row.total_revenue, prev), prev));

        records.push(Record {
            revenue_growth: or_zero(revenue_growth),
            debt_to_assets: or_zero(percent(row.total_liabilities, row.total_assets)),
            return_on_assets: or_zero(percent(row.net_income, row.total_assets)),
            operating_margin: or_zero(percent(row.net_income, row.total_revenue)),
            total_revenue: or_zero(row.total_revenue),
            net_income: or_zero(row.net_income),
            total_assets: or_zero(row.total_assets),
            total_liabilities: or_zero(row.total_liabilities),
            operating_cash_flow: or_zero(row.operating_cash_flow),
            company: row.company,
            year: row.year,
        });
    }

    let table = Table::from_records(records);
    tracing::debug!(
        rows = table.len(),
        companies = table.companies().len(),
        "Prepared financial table"
    );
    table
}

fn difference(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    Some(current? - previous?)
}

/// `numerator / denominator * 100`, undefined on a missing operand or a zero denominator
fn percent(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator.filter(|d| *d != 0.0)?;
    Some(numerator? / denominator * 100.0)
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MetricColumn;

    fn raw(company: &str, year: i32, revenue: f64) -> RawRecord {
        RawRecord {
            company: company.to_string(),
            year,
            total_revenue: Some(revenue),
            net_income: Some(20.0),
            total_assets: Some(100.0),
            total_liabilities: Some(40.0),
            operating_cash_flow: Some(25.0),
        }
    }

    #[test]
    fn test_revenue_growth_against_previous_year() {
        let table = prepare(vec![raw("Apple", 2020, 100.0), raw("Apple", 2021, 150.0)]);

        let records = table.records();
        assert_eq!(records[0].revenue_growth, 0.0);
        assert!((records[1].revenue_growth - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_is_grouped_by_company() {
        let table = prepare(vec![
            raw("Apple", 2020, 100.0),
            raw("Tesla", 2020, 30.0),
            raw("Apple", 2021, 80.0),
            raw("Tesla", 2021, 60.0),
        ]);

        let records = table.records();
        assert_eq!(records[0].revenue_growth, 0.0);
        assert_eq!(records[1].revenue_growth, 0.0);
        assert!((records[2].revenue_growth - -20.0).abs() < 1e-9);
        assert!((records[3].revenue_growth - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratios() {
        let table = prepare(vec![raw("Apple", 2020, 200.0)]);
        let record = &table.records()[0];

        assert!((record.debt_to_assets - 40.0).abs() < 1e-9);
        assert!((record.return_on_assets - 20.0).abs() < 1e-9);
        assert!((record.operating_margin - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_denominators_become_zero() {
        let mut row = raw("Rivian", 2020, 0.0);
        row.total_assets = Some(0.0);
        let mut next = raw("Rivian", 2021, 1.5);
        next.total_assets = None;

        let table = prepare(vec![row, next]);
        let records = table.records();

        assert_eq!(records[0].debt_to_assets, 0.0);
        assert_eq!(records[0].return_on_assets, 0.0);
        assert_eq!(records[0].operating_margin, 0.0);
        // previous revenue was zero
        assert_eq!(records[1].revenue_growth, 0.0);
        assert_eq!(records[1].total_assets, 0.0);
        assert_eq!(records[1].debt_to_assets, 0.0);
    }

    #[test]
    fn test_missing_revenue_breaks_the_growth_chain() {
        let mut gap = raw("Apple", 2021, 0.0);
        gap.total_revenue = None;

        let table = prepare(vec![raw("Apple", 2020, 100.0), gap, raw("Apple", 2022, 150.0)]);
        let records = table.records();

        assert_eq!(records[1].total_revenue, 0.0);
        assert_eq!(records[1].revenue_growth, 0.0);
        // no carry-over from 2020
        assert_eq!(records[2].revenue_growth, 0.0);
    }

    #[test]
    fn test_every_value_is_finite() {
        let mut gap = raw("Amazon", 2021, 470.0);
        gap.net_income = None;
        gap.total_liabilities = None;

        let table = prepare(vec![raw("Amazon", 2020, 386.0), gap, raw("Amazon", 2022, 514.0)]);

        for record in table.records() {
            for column in MetricColumn::ALL {
                assert!(record.value(column).is_finite(), "{column} not finite");
            }
        }
    }

    #[test]
    fn test_row_order_is_preserved() {
        let table = prepare(vec![
            raw("Tesla", 2022, 81.0),
            raw("Apple", 2022, 394.0),
            raw("Tesla", 2023, 96.0),
        ]);

        let order: Vec<(&str, i32)> = table
            .records()
            .iter()
            .map(|r| (r.company.as_str(), r.year))
            .collect();
        assert_eq!(order, vec![("Tesla", 2022), ("Apple", 2022), ("Tesla", 2023)]);
    }
}
