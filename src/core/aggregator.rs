//! Per-brand aggregation of classified report rows

use super::classifier::BrandClassifier;
use crate::types::{
    AdRow, AttributionDiagnostics, BrandAggregate, BrandRowCount, SalesRow, UnattributedLabel,
};
use std::collections::HashMap;

/// Aggregates in catalog order plus what could not be attributed.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOutcome {
    pub aggregates: Vec<BrandAggregate>,
    pub diagnostics: AttributionDiagnostics,
}

impl AggregationOutcome {
    pub fn get(&self, code: &str) -> Option<&BrandAggregate> {
        self.aggregates.iter().find(|agg| agg.code == code)
    }
}

/// Classify both reports and sum the attributed rows per brand.
///
/// Every catalog brand gets an aggregate, even with no matching rows.
/// Unmapped campaigns and "Other" titles are excluded from all aggregates
/// and listed in the diagnostics instead.
pub fn aggregate(
    classifier: &BrandClassifier<'_>,
    ads: &mut [AdRow],
    sales: &mut [SalesRow],
) -> AggregationOutcome {
    classifier.tag_ad_rows(ads);
    classifier.tag_sales_rows(sales);
    aggregate_tagged(classifier, ads, sales)
}

/// Sum rows that already carry an attribution.
pub fn aggregate_tagged(
    classifier: &BrandClassifier<'_>,
    ads: &[AdRow],
    sales: &[SalesRow],
) -> AggregationOutcome {
    let catalog = classifier.catalog();
    let mut aggregates: Vec<BrandAggregate> = catalog
        .iter()
        .map(|brand| BrandAggregate::new(&brand.code, &brand.name))
        .collect();
    let mut row_counts: Vec<BrandRowCount> = catalog
        .iter()
        .map(|brand| BrandRowCount {
            code: brand.code.clone(),
            name: brand.name.clone(),
            ad_rows: 0,
            sales_rows: 0,
        })
        .collect();
    let index: HashMap<&str, usize> = catalog
        .iter()
        .enumerate()
        .map(|(idx, brand)| (brand.code.as_str(), idx))
        .collect();

    let mut unmapped = LabelTally::default();
    for row in ads {
        match row.attribution.brand_code().and_then(|code| index.get(code)) {
            Some(&idx) => {
                let agg = &mut aggregates[idx];
                agg.spend += row.spend;
                agg.ad_sales += row.ad_sales;
                agg.impressions += row.impressions;
                agg.clicks += row.clicks;
                row_counts[idx].ad_rows += 1;
            }
            None => unmapped.add(&row.campaign, row.spend),
        }
    }

    let mut other = LabelTally::default();
    for row in sales {
        match row.attribution.brand_code().and_then(|code| index.get(code)) {
            Some(&idx) => {
                aggregates[idx].total_sales += row.total_sales;
                row_counts[idx].sales_rows += 1;
            }
            None => other.add(&row.title, row.total_sales),
        }
    }

    let diagnostics = AttributionDiagnostics {
        row_counts,
        unmapped_campaigns: unmapped.into_labels(),
        other_titles: other.into_labels(),
    };

    if diagnostics.unmapped_rows() > 0 {
        tracing::warn!(
            rows = diagnostics.unmapped_rows(),
            labels = diagnostics.unmapped_campaigns.len(),
            "ads rows matched no brand prefix"
        );
    }
    if diagnostics.other_rows() > 0 {
        tracing::warn!(
            rows = diagnostics.other_rows(),
            labels = diagnostics.other_titles.len(),
            "business rows matched no brand keyword"
        );
    }
    for agg in &aggregates {
        tracing::debug!(
            brand = %agg.code,
            spend = agg.spend,
            ad_sales = agg.ad_sales,
            total_sales = agg.total_sales,
            "brand aggregated"
        );
    }

    AggregationOutcome {
        aggregates,
        diagnostics,
    }
}

/// Unattributed labels in first-seen order.
#[derive(Default)]
struct LabelTally {
    labels: Vec<UnattributedLabel>,
    index: HashMap<String, usize>,
}

impl LabelTally {
    fn add(&mut self, label: &str, amount: f64) {
        match self.index.get(label) {
            Some(&idx) => {
                let entry = &mut self.labels[idx];
                entry.rows += 1;
                entry.amount += amount;
            }
            None => {
                self.index.insert(label.to_string(), self.labels.len());
                self.labels.push(UnattributedLabel {
                    label: label.to_string(),
                    rows: 1,
                    amount,
                });
            }
        }
    }

    fn into_labels(self) -> Vec<UnattributedLabel> {
        self.labels
    }
}
