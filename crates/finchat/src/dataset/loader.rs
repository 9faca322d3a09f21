//! CSV loading for the financial dataset

use super::{COMPANY_COLUMN, MetricColumn, RawRecord, Table, YEAR_COLUMN, prepare};
use crate::error::{FinChatError, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw columns the source file must provide
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COMPANY_COLUMN,
    YEAR_COLUMN,
    MetricColumn::TotalRevenue.name(),
    MetricColumn::NetIncome.name(),
    MetricColumn::TotalAssets.name(),
    MetricColumn::TotalLiabilities.name(),
    MetricColumn::OperatingCashFlow.name(),
];

/// Load and prepare a dataset from a CSV file
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FinChatError::DataLoad {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let table = load_csv_from_reader(file, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        companies = table.companies().len(),
        "Loaded financial dataset"
    );
    Ok(table)
}

/// Load and prepare a dataset from any CSV reader.
///
/// `source_name` only appears in error messages.
pub fn load_csv_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| load_error(source_name, &e))?.clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .map(|s| (*s).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FinChatError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawRecord>() {
        let row = result.map_err(|e| load_error(source_name, &e))?;
        if row.company.is_empty() {
            return Err(FinChatError::DataLoad {
                source_name: source_name.to_string(),
                reason: format!("row {} has an empty Company", rows.len() + 1),
            });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        tracing::warn!(source = source_name, "Dataset has a header but no rows");
    }

    Ok(prepare(rows))
}

fn load_error(source_name: &str, err: &csv::Error) -> FinChatError {
    let reason = match err.position() {
        Some(pos) => format!("line {}: {err}", pos.line()),
        None => err.to_string(),
    };
    FinChatError::DataLoad {
        source_name: source_name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MetricColumn;

    const HEADER: &str = "Company,Year,Total Revenue ($B),Net Income ($B),Total Assets ($B),Total Liabilities ($B),Cash Flow from Operating Activities ($B)";

    fn load(body: &str) -> Result<Table> {
        let csv = format!("{HEADER}\n{body}");
        load_csv_from_reader(csv.as_bytes(), "test.csv")
    }

    #[test]
    fn test_load_valid_csv() {
        let table = load(
            "Apple,2020,100,20,300,200,80\n\
             Apple,2021,150,30,350,250,100\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.companies(), ["Apple".to_string()]);
        let record = &table.records()[1];
        assert_eq!(record.year, 2021);
        assert!((record.value(MetricColumn::RevenueGrowth) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let csv = "Company,Year,Total Revenue ($B)\nApple,2020,100\n";
        let err = load_csv_from_reader(csv.as_bytes(), "short.csv").unwrap_err();

        match err {
            FinChatError::MissingColumns(cols) => {
                assert_eq!(cols.len(), 4);
                assert!(cols.contains(&"Net Income ($B)".to_string()));
            }
            other => panic!("Expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_and_padded_headers() {
        let csv = " Company , Year ,Ticker,Total Revenue ($B),Net Income ($B),Total Assets ($B),Total Liabilities ($B),Cash Flow from Operating Activities ($B)\n\
                   Tesla, 2023 ,TSLA,96.77,15.0,106.6,43.0,13.26\n";
        let table = load_csv_from_reader(csv.as_bytes(), "extra.csv").unwrap();

        assert_eq!(table.records()[0].company, "Tesla");
        assert_eq!(table.records()[0].year, 2023);
    }

    #[test]
    fn test_empty_cells_become_zero() {
        let table = load("Amazon,2021,,33.4,420.5,,46.3\n").unwrap();
        let record = &table.records()[0];

        assert_eq!(record.total_revenue, 0.0);
        assert_eq!(record.total_liabilities, 0.0);
        assert_eq!(record.operating_margin, 0.0);
        assert_eq!(record.debt_to_assets, 0.0);
    }

    #[test]
    fn test_bad_year_is_a_load_error() {
        let err = load("Apple,twenty,100,20,300,200,80\n").unwrap_err();
        assert!(matches!(err, FinChatError::DataLoad { .. }));
        assert!(err.to_string().contains("test.csv"));
    }

    #[test]
    fn test_empty_company_is_rejected() {
        let err = load(",2021,100,20,300,200,80\n").unwrap_err();
        assert!(err.to_string().contains("empty Company"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, FinChatError::DataLoad { .. }));
        assert!(err.is_fatal());
    }
}
