//! Row extraction: [`RawTable`] → typed ad and sales rows

use super::columns::{ColumnResolver, ColumnRole};
use super::numeric::NumericCleaner;
use super::reader::{Cell, RawTable};
use crate::error::{RoasError, RoasResult};
use crate::types::{AdRow, SalesRow};

/// Extract campaign rows from the advertising report.
///
/// Campaign, spend and ad sales columns are required; impressions and
/// clicks read as 0 when the report has no such column.
pub fn extract_ad_rows(table: &RawTable, resolver: &dyn ColumnResolver) -> RoasResult<Vec<AdRow>> {
    let campaign = require(table, resolver, ColumnRole::Campaign)?;
    let spend = require(table, resolver, ColumnRole::Spend)?;
    let ad_sales = require(table, resolver, ColumnRole::AdSales)?;
    let impressions = resolver.resolve(&table.headers, ColumnRole::Impressions);
    let clicks = resolver.resolve(&table.headers, ColumnRole::Clicks);

    tracing::info!(
        report = %table.name,
        campaign = %table.headers[campaign],
        spend = %table.headers[spend],
        ad_sales = %table.headers[ad_sales],
        "ads columns resolved"
    );

    let cleaner = NumericCleaner::new()?;
    let numbers = NumberReader {
        table,
        cleaner: &cleaner,
    };

    let mut rows = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let ad = AdRow::new(
            table.cell(row, campaign).to_string(),
            numbers.read(row, spend)?,
            numbers.read(row, ad_sales)?,
        )
        .with_traffic(
            numbers.read_optional(row, impressions)?,
            numbers.read_optional(row, clicks)?,
        );
        rows.push(ad);
    }
    Ok(rows)
}

/// Extract product rows from the business report.
pub fn extract_sales_rows(
    table: &RawTable,
    resolver: &dyn ColumnResolver,
) -> RoasResult<Vec<SalesRow>> {
    let title = require(table, resolver, ColumnRole::Title)?;
    let total_sales = require(table, resolver, ColumnRole::TotalSales)?;

    tracing::info!(
        report = %table.name,
        title = %table.headers[title],
        total_sales = %table.headers[total_sales],
        "business columns resolved"
    );

    let cleaner = NumericCleaner::new()?;
    let numbers = NumberReader {
        table,
        cleaner: &cleaner,
    };

    let mut rows = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        rows.push(SalesRow::new(
            table.cell(row, title).to_string(),
            numbers.read(row, total_sales)?,
        ));
    }
    Ok(rows)
}

fn require(
    table: &RawTable,
    resolver: &dyn ColumnResolver,
    role: ColumnRole,
) -> RoasResult<usize> {
    resolver
        .resolve(&table.headers, role)
        .filter(|idx| *idx < table.headers.len())
        .ok_or_else(|| RoasError::MissingColumn {
            report: table.name.clone(),
            role: role.to_string(),
            headers: table.headers.join(", "),
        })
}

struct NumberReader<'a> {
    table: &'a RawTable,
    cleaner: &'a NumericCleaner,
}

impl NumberReader<'_> {
    fn read(&self, row: usize, col: usize) -> RoasResult<f64> {
        match self.table.cell(row, col) {
            Cell::Empty => Ok(0.0),
            Cell::Number(n) if n.is_finite() => Ok(*n),
            Cell::Text(text) => self
                .cleaner
                .clean(text)
                .ok_or_else(|| self.data_quality(row, col, text.clone())),
            other => Err(self.data_quality(row, col, other.to_string())),
        }
    }

    fn read_optional(&self, row: usize, col: Option<usize>) -> RoasResult<f64> {
        match col {
            Some(col) => self.read(row, col),
            None => Ok(0.0),
        }
    }

    fn data_quality(&self, row: usize, col: usize, value: String) -> RoasError {
        RoasError::DataQuality {
            report: self.table.name.clone(),
            // 1-based, counting the header row, as a spreadsheet shows it
            row: row + 2,
            column: self.table.headers.get(col).cloned().unwrap_or_default(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::columns::ContainsResolver;
    use crate::ingest::reader::parse_csv;
    use crate::types::Attribution;

    #[test]
    fn test_extract_ad_rows() {
        let table = parse_csv(
            "ads.csv",
            "Campaign Name,Impressions,Clicks,Spend,7 Day Total Sales\n\
             MA_Launch,\"10,000\",120,$250.00,\"$1,000.00\"\n\
             CL Brand,,,,\n",
        )
        .unwrap();
        let rows = extract_ad_rows(&table, &ContainsResolver).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].campaign, "MA_Launch");
        assert_eq!(rows[0].spend, 250.0);
        assert_eq!(rows[0].ad_sales, 1000.0);
        assert_eq!(rows[0].impressions, 10_000.0);
        assert_eq!(rows[0].clicks, 120.0);
        assert_eq!(rows[0].attribution, Attribution::Unmapped);
        assert_eq!(rows[1].spend, 0.0);
    }

    #[test]
    fn test_traffic_columns_optional() {
        let table = parse_csv("ads.csv", "Campaign,Spend,Sales\nMA_X,10,30\n").unwrap();
        let rows = extract_ad_rows(&table, &ContainsResolver).unwrap();
        assert_eq!(rows[0].impressions, 0.0);
        assert_eq!(rows[0].clicks, 0.0);
    }

    #[test]
    fn test_missing_required_column() {
        let table = parse_csv("ads.csv", "Campaign Name,Spend\nMA_X,10\n").unwrap();
        let err = extract_ad_rows(&table, &ContainsResolver).unwrap_err();
        match err {
            RoasError::MissingColumn { report, role, .. } => {
                assert_eq!(report, "ads.csv");
                assert_eq!(role, "ad_sales");
            }
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_number_is_data_quality_error() {
        let table = parse_csv(
            "business.csv",
            "Title,Ordered Product Sales\nLattafa Asad,n/a\n",
        )
        .unwrap();
        let err = extract_sales_rows(&table, &ContainsResolver).unwrap_err();
        match err {
            RoasError::DataQuality {
                row, column, value, ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Ordered Product Sales");
                assert_eq!(value, "n/a");
            }
            other => panic!("Expected DataQuality, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_sales_rows() {
        let table = parse_csv(
            "business.csv",
            "(Parent) ASIN,Title,Ordered Product Sales\nB01,Lattafa Asad EDP,\"AED 1,500.00\"\n",
        )
        .unwrap();
        let rows = extract_sales_rows(&table, &ContainsResolver).unwrap();
        assert_eq!(rows[0].title, "Lattafa Asad EDP");
        assert_eq!(rows[0].total_sales, 1500.0);
        assert_eq!(rows[0].attribution, Attribution::Other);
    }

    #[test]
    fn test_closure_resolver_injected() {
        let table = parse_csv("business.csv", "Name,Revenue Total\nArmaf CDN,99\n").unwrap();
        let resolver = |_: &[String], role: ColumnRole| match role {
            ColumnRole::Title => Some(0),
            ColumnRole::TotalSales => Some(1),
            _ => None,
        };
        let rows = extract_sales_rows(&table, &resolver).unwrap();
        assert_eq!(rows[0].total_sales, 99.0);
    }
}
