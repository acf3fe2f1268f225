//! Brand attribution and aggregation tests

use pretty_assertions::assert_eq;
use roas_forge::config::BrandCatalog;
use roas_forge::core::{aggregate, aggregate_tagged, BrandClassifier};
use roas_forge::types::{AdRow, Attribution, BrandRecord, SalesRow};

fn bundled() -> BrandCatalog {
    BrandCatalog::bundled().unwrap()
}

fn brand(code: &str) -> Attribution {
    Attribution::Brand(code.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════
// CAMPAIGN PREFIX TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_prefix_needs_boundary() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    assert_eq!(classifier.classify_campaign("MA_Launch"), brand("MA"));
    assert_eq!(classifier.classify_campaign("MA Launch"), brand("MA"));
    assert_eq!(classifier.classify_campaign("MA-Launch"), brand("MA"));
    assert_eq!(classifier.classify_campaign("MA"), brand("MA"));
    assert_eq!(classifier.classify_campaign("MAX_Launch"), Attribution::Unmapped);
    assert_eq!(classifier.classify_campaign("MALaunch"), Attribution::Unmapped);
}

#[test]
fn test_prefix_is_case_insensitive_and_trimmed() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    assert_eq!(classifier.classify_campaign("  cl_exact "), brand("CL"));
    assert_eq!(classifier.classify_campaign("lattafa brand"), brand("LT"));
}

#[test]
fn test_blank_campaign_is_unmapped() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    assert_eq!(classifier.classify_campaign(""), Attribution::Unmapped);
    assert_eq!(classifier.classify_campaign("   "), Attribution::Unmapped);
}

// ═══════════════════════════════════════════════════════════════════════════
// TITLE KEYWORD TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_title_keywords() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    assert_eq!(
        classifier.classify_title("Creation Lamis Eau de Parfum 100ml"),
        brand("CL")
    );
    assert_eq!(classifier.classify_title("Club de Nuit Intense"), brand("AR"));
    assert_eq!(classifier.classify_title("Gift Box"), Attribution::Other);
    assert_eq!(classifier.classify_title(""), Attribution::Other);
}

#[test]
fn test_first_catalog_entry_wins() {
    let catalog = BrandCatalog::new(vec![
        BrandRecord::new("AA", "First", &["AA"], &["OUD"]),
        BrandRecord::new("BB", "Second", &["BB"], &["ROYAL OUD"]),
    ])
    .unwrap();
    let classifier = BrandClassifier::new(&catalog);

    assert_eq!(classifier.classify_title("Royal Oud Intense"), brand("AA"));
}

// ═══════════════════════════════════════════════════════════════════════════
// AGGREGATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_aggregate_tags_and_sums() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    let mut ads = vec![
        AdRow::new("CL_Exact", 600.0, 1800.0).with_traffic(6000.0, 120.0),
        AdRow::new("CL Auto", 400.0, 1200.0).with_traffic(4000.0, 80.0),
        AdRow::new("MAX_Promo", 10.0, 0.0),
    ];
    let mut sales = vec![
        SalesRow::new("Creation Lamis Eau de Parfum", 6000.0),
        SalesRow::new("Gift Box", 40.0),
    ];

    let outcome = aggregate(&classifier, &mut ads, &mut sales);

    assert_eq!(ads[0].attribution, brand("CL"));
    assert_eq!(ads[2].attribution, Attribution::Unmapped);
    assert_eq!(sales[1].attribution, Attribution::Other);

    // Every catalog brand is present, in catalog order
    let codes: Vec<&str> = outcome.aggregates.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, vec!["CL", "MA", "FW", "LT", "AR", "RS"]);

    let cl = outcome.get("CL").unwrap();
    assert_eq!(cl.spend, 1000.0);
    assert_eq!(cl.ad_sales, 3000.0);
    assert_eq!(cl.impressions, 10000.0);
    assert_eq!(cl.clicks, 200.0);
    assert_eq!(cl.total_sales, 6000.0);

    let ma = outcome.get("MA").unwrap();
    assert_eq!(ma.spend, 0.0);
    assert_eq!(ma.total_sales, 0.0);
}

#[test]
fn test_unattributed_rows_are_excluded_but_reported() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    let mut ads = vec![
        AdRow::new("Brand Defense", 5.0, 0.0),
        AdRow::new("Brand Defense", 7.0, 0.0),
        AdRow::new("MAX_Promo", 10.0, 0.0),
    ];
    let mut sales = vec![SalesRow::new("Gift Box", 40.0)];

    let outcome = aggregate(&classifier, &mut ads, &mut sales);
    let total_spend: f64 = outcome.aggregates.iter().map(|a| a.spend).sum();
    assert_eq!(total_spend, 0.0);

    let diagnostics = &outcome.diagnostics;
    assert_eq!(diagnostics.unmapped_rows(), 3);
    assert_eq!(diagnostics.other_rows(), 1);
    assert_eq!(diagnostics.unmapped_campaigns[0].label, "Brand Defense");
    assert_eq!(diagnostics.unmapped_campaigns[0].rows, 2);
    assert_eq!(diagnostics.unmapped_campaigns[0].amount, 12.0);
    assert_eq!(diagnostics.other_titles[0].amount, 40.0);
}

#[test]
fn test_aggregate_tagged_uses_existing_tags() {
    let catalog = bundled();
    let classifier = BrandClassifier::new(&catalog);

    // Pre-tagged rows are trusted as they are
    let mut row = AdRow::new("anything", 50.0, 100.0);
    row.attribution = brand("RS");
    let outcome = aggregate_tagged(&classifier, &[row], &[]);

    assert_eq!(outcome.get("RS").unwrap().spend, 50.0);
}
