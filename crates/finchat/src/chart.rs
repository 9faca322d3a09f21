//! Trend views: year-indexed series for one company
//!
//! A [`TrendChart`] is plain data. It serialises to JSON for an external
//! charting front end and renders itself as a terminal table.

use crate::dataset::{MetricColumn, Table};
use crate::error::{FinChatError, Result};
use crate::metrics::MetricMapping;
use comfy_table::{Cell, CellAlignment, Table as TextTable, presets::UTF8_FULL};
use finchat_utils::format_decimal;
use serde::Serialize;

/// Phrase charted when the selection is empty
pub const DEFAULT_TREND_PHRASE: &str = "total revenue";

/// One metric over the years
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    /// Vocabulary phrase that selected the series
    pub phrase: String,
    pub column: MetricColumn,
    /// `(year, value)` in table order
    pub points: Vec<(i32, f64)>,
}

/// Selected metrics for one company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub company: String,
    pub series: Vec<TrendSeries>,
}

impl TrendChart {
    /// Build the series for `company` (exact name) and the selected phrases.
    ///
    /// An empty selection charts [`DEFAULT_TREND_PHRASE`].
    pub fn build<S: AsRef<str>>(
        table: &Table,
        company: &str,
        phrases: &[S],
        metrics: &MetricMapping,
    ) -> Result<Self> {
        let mut selected: Vec<String> = phrases
            .iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        if selected.is_empty() {
            tracing::debug!("No metrics selected, charting {DEFAULT_TREND_PHRASE}");
            selected.push(DEFAULT_TREND_PHRASE.to_string());
        }

        let rows: Vec<_> = table.rows_for(company).collect();
        if rows.is_empty() {
            return Err(FinChatError::UnknownCompany(company.to_string()));
        }

        let mut series = Vec::with_capacity(selected.len());
        for phrase in selected {
            let column = metrics
                .get(&phrase)
                .ok_or_else(|| FinChatError::UnknownMetric(phrase.clone()))?;
            let points = rows.iter().map(|r| (r.year, r.value(column))).collect();
            series.push(TrendSeries {
                phrase,
                column,
                points,
            });
        }

        Ok(Self {
            company: company.to_string(),
            series,
        })
    }

    /// Years on the x axis, in table order
    pub fn years(&self) -> Vec<i32> {
        self.series
            .first()
            .map(|s| s.points.iter().map(|(year, _)| *year).collect())
            .unwrap_or_default()
    }

    /// Render as a table with one row per year and one column per metric
    pub fn render(&self) -> String {
        let mut table = TextTable::new();
        table.load_preset(UTF8_FULL);

        let mut header = vec![Cell::new("Year")];
        header.extend(self.series.iter().map(|s| Cell::new(s.column.name())));
        table.set_header(header);

        for (i, year) in self.years().into_iter().enumerate() {
            let mut row = vec![Cell::new(year)];
            for series in &self.series {
                let value = series.points.get(i).map_or(0.0, |(_, v)| *v);
                row.push(Cell::new(format_decimal(value)).set_alignment(CellAlignment::Right));
            }
            table.add_row(row);
        }

        format!("{}\n{table}", self.company)
    }

    /// JSON form for external charting
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RawRecord, prepare};

    fn table() -> Table {
        let row = |company: &str, year: i32, revenue: f64| RawRecord {
            company: company.to_string(),
            year,
            total_revenue: Some(revenue),
            net_income: Some(10.0),
            total_assets: Some(100.0),
            total_liabilities: Some(50.0),
            operating_cash_flow: Some(12.0),
        };
        prepare(vec![
            row("Apple", 2020, 100.0),
            row("Tesla", 2020, 30.0),
            row("Apple", 2021, 150.0),
        ])
    }

    #[test]
    fn test_build_series() {
        let chart = TrendChart::build(
            &table(),
            "Apple",
            &["total revenue", "Revenue Growth"],
            &MetricMapping::default(),
        )
        .unwrap();

        assert_eq!(chart.years(), vec![2020, 2021]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].points, vec![(2020, 100.0), (2021, 150.0)]);
        assert_eq!(chart.series[1].column, MetricColumn::RevenueGrowth);
        assert_eq!(chart.series[1].points[1].1, 50.0);
    }

    #[test]
    fn test_empty_selection_defaults_to_revenue() {
        let chart =
            TrendChart::build::<&str>(&table(), "Tesla", &[], &MetricMapping::default()).unwrap();

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].column, MetricColumn::TotalRevenue);
    }

    #[test]
    fn test_unknown_inputs() {
        let metrics = MetricMapping::default();
        assert!(matches!(
            TrendChart::build(&table(), "Nokia", &["net income"], &metrics),
            Err(FinChatError::UnknownCompany(_))
        ));
        assert!(matches!(
            TrendChart::build(&table(), "Apple", &["ebitda"], &metrics),
            Err(FinChatError::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_render_and_json() {
        let chart =
            TrendChart::build(&table(), "Apple", &["net income"], &MetricMapping::default())
                .unwrap();

        let text = chart.render();
        assert!(text.starts_with("Apple"));
        assert!(text.contains("Net Income ($B)"));
        assert!(text.contains("2021"));
        assert!(text.contains("10.0"));

        let json = chart.to_json().unwrap();
        assert!(json.contains("\"Net Income ($B)\""));
        assert!(json.contains("\"phrase\": \"net income\""));
    }
}
