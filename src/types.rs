use crate::config::ProjectionConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Brand Catalog
//==============================================================================

/// A configured brand with its matching rules.
///
/// `prefixes` are matched against campaign names (ads report), `keywords`
/// against product titles (business report). Both are stored upper-cased
/// once the catalog has been validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    /// Short code, e.g. `CL`
    pub code: String,
    /// Display name, e.g. `Creation Lamis`
    pub name: String,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl BrandRecord {
    pub fn new(code: &str, name: &str, prefixes: &[&str], keywords: &[&str]) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Which brand a report row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum Attribution {
    /// Matched the brand with this code
    Brand(String),
    /// Campaign name matched no prefix rule
    Unmapped,
    /// Product title matched no keyword rule
    Other,
}

impl Attribution {
    pub fn brand_code(&self) -> Option<&str> {
        match self {
            Attribution::Brand(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_attributed(&self) -> bool {
        matches!(self, Attribution::Brand(_))
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribution::Brand(code) => write!(f, "{code}"),
            Attribution::Unmapped => write!(f, "Unmapped"),
            Attribution::Other => write!(f, "Other"),
        }
    }
}

//==============================================================================
// Report Rows
//==============================================================================

/// One campaign row from the advertising report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRow {
    pub campaign: String,
    pub spend: f64,
    pub ad_sales: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub attribution: Attribution,
}

impl AdRow {
    pub fn new(campaign: impl Into<String>, spend: f64, ad_sales: f64) -> Self {
        Self {
            campaign: campaign.into(),
            spend,
            ad_sales,
            impressions: 0.0,
            clicks: 0.0,
            attribution: Attribution::Unmapped,
        }
    }

    pub fn with_traffic(mut self, impressions: f64, clicks: f64) -> Self {
        self.impressions = impressions;
        self.clicks = clicks;
        self
    }
}

/// One product row from the business (sales) report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub title: String,
    pub total_sales: f64,
    pub attribution: Attribution,
}

impl SalesRow {
    pub fn new(title: impl Into<String>, total_sales: f64) -> Self {
        Self {
            title: title.into(),
            total_sales,
            attribution: Attribution::Other,
        }
    }
}

//==============================================================================
// Aggregates and Results
//==============================================================================

/// Per-brand sums over the attributed rows of both reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BrandAggregate {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub ad_sales: f64,
    #[serde(default)]
    pub impressions: f64,
    #[serde(default)]
    pub clicks: f64,
    #[serde(default)]
    pub total_sales: f64,
}

impl BrandAggregate {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Current-period efficiency figures for one brand (or the portfolio).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    pub brand: String,
    pub spend: f64,
    pub ad_sales: f64,
    pub total_sales: f64,
    pub organic_sales: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub roas: f64,
    pub acos: f64,
    pub tacos: f64,
    pub organic_share: f64,
    pub paid_share: f64,
    pub cpc: f64,
    pub ctr: f64,
}

/// Projected figures for one brand. The portfolio total has the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandProjection {
    pub brand: String,
    pub spend: f64,
    pub roas: f64,
    pub ad_revenue: f64,
    pub organic_share: f64,
    pub paid_share: f64,
    pub organic_revenue: f64,
    pub overall_revenue: f64,
    pub troas: f64,
    pub tacos: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<f64>,
}

pub type PortfolioTotal = BrandProjection;

/// One week of a brand's monthly projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub brand: String,
    /// 1-based week number
    pub week: usize,
    pub weight: f64,
    pub spend: f64,
    pub ad_revenue: f64,
    pub organic_revenue: f64,
    pub overall_revenue: f64,
    pub roas: f64,
    pub organic_share: f64,
    pub tacos: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<f64>,
}

/// Something the collaborator should see next to the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionWarning {
    /// Ad sales exceed total sales, so the organic contribution is negative
    NegativeOrganicContribution { brand: String, value: f64 },
    /// Paid share reached zero; overall revenue fell back to ad revenue
    OrganicCapSaturated { brand: String },
    /// The configured cap lets the organic share reach 100%
    DegenerateOrganicCap { cap: f64 },
    /// Rows that matched no brand and were left out of the aggregates
    UnattributedRows { report: String, rows: usize },
}

impl fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionWarning::NegativeOrganicContribution { brand, value } => write!(
                f,
                "{brand}: ad sales exceed total sales (organic contribution {:.1}%)",
                value * 100.0
            ),
            ProjectionWarning::OrganicCapSaturated { brand } => write!(
                f,
                "{brand}: paid share is 0, overall revenue equals ad revenue"
            ),
            ProjectionWarning::DegenerateOrganicCap { cap } => write!(
                f,
                "organic cap {cap} allows a 100% organic share; organic revenue may read 0"
            ),
            ProjectionWarning::UnattributedRows { report, rows } => {
                write!(f, "{rows} {report} row(s) matched no brand")
            }
        }
    }
}

/// A label that matched no brand, with how much it carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnattributedLabel {
    pub label: String,
    pub rows: usize,
    /// Spend for campaigns, total sales for titles
    pub amount: f64,
}

/// Row counts per brand after classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRowCount {
    pub code: String,
    pub name: String,
    pub ad_rows: usize,
    pub sales_rows: usize,
}

/// Attribution diagnostics for both reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttributionDiagnostics {
    pub row_counts: Vec<BrandRowCount>,
    pub unmapped_campaigns: Vec<UnattributedLabel>,
    pub other_titles: Vec<UnattributedLabel>,
}

impl AttributionDiagnostics {
    pub fn unmapped_rows(&self) -> usize {
        self.unmapped_campaigns.iter().map(|l| l.rows).sum()
    }

    pub fn other_rows(&self) -> usize {
        self.other_titles.iter().map(|l| l.rows).sum()
    }
}

/// Everything one projection run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub generated_at: DateTime<Utc>,
    pub config: ProjectionConfig,
    pub current: Vec<CurrentMetrics>,
    pub current_total: CurrentMetrics,
    pub brands: Vec<BrandProjection>,
    pub total: PortfolioTotal,
    pub weekly: Vec<WeeklyRow>,
    #[serde(default)]
    pub diagnostics: AttributionDiagnostics,
    #[serde(default)]
    pub warnings: Vec<ProjectionWarning>,
}

//==============================================================================
// Flat Rows (tabular rendering / export)
//==============================================================================

/// Cell value of a flat row. The variant drives number formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Text(String),
    /// Currency amount
    Money(f64),
    /// Multiplier such as ROAS
    Ratio(f64),
    /// Fraction rendered as a percentage
    Share(f64),
    /// Impressions, clicks, row counts
    Count(f64),
}

impl RowValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RowValue::Text(_) => None,
            RowValue::Money(v) | RowValue::Ratio(v) | RowValue::Share(v) | RowValue::Count(v) => {
                Some(*v)
            }
        }
    }
}

/// Ordered key/value row, ready for a table or a spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, RowValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: &'static str, value: RowValue) -> Self {
        self.cells.push((key, value));
        self
    }

    fn push_opt(self, key: &'static str, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.push(key, RowValue::Count(v)),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&RowValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.cells.iter().map(|(k, _)| *k).collect()
    }
}

/// Records that render as one flat row.
pub trait Tabular {
    fn to_row(&self) -> TableRow;
}

impl Tabular for CurrentMetrics {
    fn to_row(&self) -> TableRow {
        TableRow::new()
            .push("Brand", RowValue::Text(self.brand.clone()))
            .push("Spends", RowValue::Money(self.spend))
            .push("Ad Sales", RowValue::Money(self.ad_sales))
            .push("Total Sales", RowValue::Money(self.total_sales))
            .push("Organic Sales", RowValue::Money(self.organic_sales))
            .push("ROAS", RowValue::Ratio(self.roas))
            .push("ACOS", RowValue::Share(self.acos))
            .push("T-ACOS", RowValue::Share(self.tacos))
            .push("Organic (%)", RowValue::Share(self.organic_share))
            .push("Paid (%)", RowValue::Share(self.paid_share))
            .push("Impressions", RowValue::Count(self.impressions))
            .push("Clicks", RowValue::Count(self.clicks))
            .push("CPC", RowValue::Money(self.cpc))
            .push("CTR", RowValue::Share(self.ctr))
    }
}

impl Tabular for BrandProjection {
    fn to_row(&self) -> TableRow {
        TableRow::new()
            .push("Brand", RowValue::Text(self.brand.clone()))
            .push("Period", RowValue::Text("Monthly Projection".to_string()))
            .push("Spends", RowValue::Money(self.spend))
            .push("ROAS", RowValue::Ratio(self.roas))
            .push("Ad Revenue", RowValue::Money(self.ad_revenue))
            .push("Organic (%)", RowValue::Share(self.organic_share))
            .push("Paid (%)", RowValue::Share(self.paid_share))
            .push("Organic Revenue", RowValue::Money(self.organic_revenue))
            .push("Overall Revenue", RowValue::Money(self.overall_revenue))
            .push("T-ROAS", RowValue::Ratio(self.troas))
            .push("T-ACOS", RowValue::Share(self.tacos))
            .push_opt("Impressions", self.impressions)
            .push_opt("Clicks", self.clicks)
    }
}

impl Tabular for WeeklyRow {
    fn to_row(&self) -> TableRow {
        TableRow::new()
            .push("Brand", RowValue::Text(self.brand.clone()))
            .push("Period", RowValue::Text(format!("Week {}", self.week)))
            .push("Spends", RowValue::Money(self.spend))
            .push("Ad Revenue", RowValue::Money(self.ad_revenue))
            .push("Organic Revenue", RowValue::Money(self.organic_revenue))
            .push("Overall Revenue", RowValue::Money(self.overall_revenue))
            .push("ROAS", RowValue::Ratio(self.roas))
            .push("Organic (%)", RowValue::Share(self.organic_share))
            .push("T-ACOS", RowValue::Share(self.tacos))
            .push_opt("Impressions", self.impressions)
            .push_opt("Clicks", self.clicks)
    }
}

impl Tabular for UnattributedLabel {
    fn to_row(&self) -> TableRow {
        TableRow::new()
            .push("Label", RowValue::Text(self.label.clone()))
            .push("Rows", RowValue::Count(self.rows as f64))
            .push("Amount", RowValue::Money(self.amount))
    }
}
