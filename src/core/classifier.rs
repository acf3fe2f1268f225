//! Brand classifier: campaign-name prefixes and product-title keywords

use crate::config::BrandCatalog;
use crate::types::{AdRow, Attribution, BrandRecord, SalesRow};

/// Characters that may follow a campaign prefix.
pub const PREFIX_BOUNDARIES: [char; 3] = ['_', ' ', '-'];

/// Assigns report labels to brands from a fixed catalog.
///
/// Brands are tested in catalog order and the first match wins. Campaign
/// names need a boundary after the prefix (`MA_`, `MA `, `MA-`) or must equal
/// it, so `MA` never claims `MAX_Promo`. Titles match when they contain any
/// keyword of a brand; more specific brands must come first in the catalog.
#[derive(Debug, Clone)]
pub struct BrandClassifier<'a> {
    catalog: &'a BrandCatalog,
}

impl<'a> BrandClassifier<'a> {
    pub fn new(catalog: &'a BrandCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a BrandCatalog {
        self.catalog
    }

    /// Brand for a campaign name, or [`Attribution::Unmapped`].
    pub fn classify_campaign(&self, campaign: &str) -> Attribution {
        self.match_campaign(campaign)
            .map(|brand| Attribution::Brand(brand.code.clone()))
            .unwrap_or(Attribution::Unmapped)
    }

    /// Brand for a product title, or [`Attribution::Other`].
    pub fn classify_title(&self, title: &str) -> Attribution {
        self.match_title(title)
            .map(|brand| Attribution::Brand(brand.code.clone()))
            .unwrap_or(Attribution::Other)
    }

    pub fn match_campaign(&self, campaign: &str) -> Option<&'a BrandRecord> {
        let normalized = campaign.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        self.catalog.iter().find(|brand| {
            brand
                .prefixes
                .iter()
                .any(|prefix| has_bounded_prefix(&normalized, prefix))
        })
    }

    pub fn match_title(&self, title: &str) -> Option<&'a BrandRecord> {
        let normalized = title.to_uppercase();
        if normalized.trim().is_empty() {
            return None;
        }
        self.catalog.iter().find(|brand| {
            brand
                .keywords
                .iter()
                .any(|keyword| normalized.contains(keyword.as_str()))
        })
    }

    /// Tag every ad row in place.
    pub fn tag_ad_rows(&self, rows: &mut [AdRow]) {
        for row in rows.iter_mut() {
            row.attribution = self.classify_campaign(&row.campaign);
            tracing::debug!(campaign = %row.campaign, brand = %row.attribution, "campaign classified");
        }
    }

    /// Tag every sales row in place.
    pub fn tag_sales_rows(&self, rows: &mut [SalesRow]) {
        for row in rows.iter_mut() {
            row.attribution = self.classify_title(&row.title);
            tracing::debug!(title = %row.title, brand = %row.attribution, "title classified");
        }
    }
}

/// `name` equals `prefix`, or starts with it followed by a boundary char.
/// Both sides are expected upper-cased.
fn has_bounded_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(PREFIX_BOUNDARIES),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> BrandCatalog {
        BrandCatalog::new(vec![
            BrandRecord::new(
                "CL",
                "Creation Lamis",
                &["CL"],
                &["CREATION LAMIS", "CREATION DELUXE", "CREATION"],
            ),
            BrandRecord::new("MA", "Maison Alhambra", &["MA"], &["MAISON ALHAMBRA"]),
            BrandRecord::new("C", "Generic C", &["C"], &["GENERIC"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_prefix_boundaries() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        let ma = Attribution::Brand("MA".to_string());

        assert_eq!(classifier.classify_campaign("MA_SomeCampaign"), ma);
        assert_eq!(classifier.classify_campaign("MA SomeCampaign"), ma);
        assert_eq!(classifier.classify_campaign("MA-SomeCampaign"), ma);
        assert_eq!(classifier.classify_campaign("MA"), ma);
        assert_eq!(
            classifier.classify_campaign("MAX_SomeCampaign"),
            Attribution::Unmapped
        );
    }

    #[test]
    fn test_prefix_is_case_and_whitespace_insensitive() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        assert_eq!(
            classifier.classify_campaign("  ma_auto_broad "),
            Attribution::Brand("MA".to_string())
        );
    }

    #[test]
    fn test_short_prefix_does_not_steal_longer_one() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        assert_eq!(
            classifier.classify_campaign("CL_Exact"),
            Attribution::Brand("CL".to_string())
        );
        assert_eq!(
            classifier.classify_campaign("C_Exact"),
            Attribution::Brand("C".to_string())
        );
        assert_eq!(classifier.classify_campaign("CX_Exact"), Attribution::Unmapped);
    }

    #[test]
    fn test_empty_label_is_sentinel() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        assert_eq!(classifier.classify_campaign(""), Attribution::Unmapped);
        assert_eq!(classifier.classify_campaign("   "), Attribution::Unmapped);
        assert_eq!(classifier.classify_title(""), Attribution::Other);
    }

    #[test]
    fn test_keyword_match() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        assert_eq!(
            classifier.classify_title("Creation Lamis Eau de Parfum 100ml"),
            Attribution::Brand("CL".to_string())
        );
        assert_eq!(
            classifier.classify_title("maison alhambra baroque rouge"),
            Attribution::Brand("MA".to_string())
        );
        assert_eq!(
            classifier.classify_title("Unbranded gift box"),
            Attribution::Other
        );
    }

    #[test]
    fn test_catalog_order_decides_overlapping_keywords() {
        // "GENERIC CREATION" contains keywords of CL (CREATION) and C (GENERIC);
        // CL comes first in the catalog.
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        assert_eq!(
            classifier.classify_title("GENERIC CREATION SET"),
            Attribution::Brand("CL".to_string())
        );
    }

    #[test]
    fn test_tag_rows_in_place() {
        let catalog = catalog();
        let classifier = BrandClassifier::new(&catalog);
        let mut ads = vec![AdRow::new("MA_1", 1.0, 2.0), AdRow::new("ZZ_1", 1.0, 2.0)];
        classifier.tag_ad_rows(&mut ads);
        assert_eq!(ads[0].attribution, Attribution::Brand("MA".to_string()));
        assert_eq!(ads[1].attribution, Attribution::Unmapped);

        let mut sales = vec![SalesRow::new("Creation Deluxe Oud", 5.0)];
        classifier.tag_sales_rows(&mut sales);
        assert_eq!(sales[0].attribution, Attribution::Brand("CL".to_string()));
    }

    #[test]
    fn test_has_bounded_prefix() {
        assert!(has_bounded_prefix("MA_X", "MA"));
        assert!(has_bounded_prefix("MA", "MA"));
        assert!(!has_bounded_prefix("MAX", "MA"));
        assert!(!has_bounded_prefix("M", "MA"));
        assert!(!has_bounded_prefix("MA.X", "MA"));
    }
}
