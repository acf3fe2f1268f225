//! Column resolution for report headers
//!
//! Reports come from different exports with slightly different headers
//! ("7 Day Total Sales", "14 Day Total Sales (₹)"...). The core never looks
//! up header strings itself; it asks a [`ColumnResolver`] for the index of
//! each [`ColumnRole`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field the ingestion layer needs from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Campaign,
    Spend,
    AdSales,
    Impressions,
    Clicks,
    Title,
    TotalSales,
}

impl ColumnRole {
    /// Substring searched for in header names.
    pub fn needle(&self) -> &'static str {
        match self {
            ColumnRole::Campaign => "Campaign",
            ColumnRole::Spend => "Spend",
            ColumnRole::AdSales => "Sales",
            ColumnRole::Impressions => "Impressions",
            ColumnRole::Clicks => "Clicks",
            ColumnRole::Title => "Title",
            ColumnRole::TotalSales => "Sales",
        }
    }

    /// Header name used when no header contains the needle.
    pub fn fallback(&self) -> &'static str {
        match self {
            ColumnRole::Campaign => "Campaign Name",
            ColumnRole::Spend => "Cost",
            ColumnRole::AdSales => "Ad Revenue",
            ColumnRole::Impressions => "Impr.",
            ColumnRole::Clicks => "Clicks",
            ColumnRole::Title => "Product Name",
            ColumnRole::TotalSales => "Revenue",
        }
    }

    /// Impressions and clicks may be absent; their values then read as 0.
    pub fn is_required(&self) -> bool {
        !matches!(self, ColumnRole::Impressions | ColumnRole::Clicks)
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Campaign => "campaign",
            ColumnRole::Spend => "spend",
            ColumnRole::AdSales => "ad_sales",
            ColumnRole::Impressions => "impressions",
            ColumnRole::Clicks => "clicks",
            ColumnRole::Title => "title",
            ColumnRole::TotalSales => "total_sales",
        };
        write!(f, "{name}")
    }
}

/// Finds the column index for a role among a report's headers.
///
/// Closures with the matching signature are resolvers too, so callers can
/// inject their own lookup without a new type.
pub trait ColumnResolver {
    fn resolve(&self, headers: &[String], role: ColumnRole) -> Option<usize>;
}

impl<F> ColumnResolver for F
where
    F: Fn(&[String], ColumnRole) -> Option<usize>,
{
    fn resolve(&self, headers: &[String], role: ColumnRole) -> Option<usize> {
        self(headers, role)
    }
}

/// Default resolver: first header containing the role's needle
/// (case-insensitive), else the role's fallback header name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsResolver;

impl ColumnResolver for ContainsResolver {
    fn resolve(&self, headers: &[String], role: ColumnRole) -> Option<usize> {
        let needle = role.needle().to_lowercase();
        headers
            .iter()
            .position(|h| h.to_lowercase().contains(&needle))
            .or_else(|| find_exact(headers, role.fallback()))
    }
}

/// Explicit header names per role, from the `columns:` config section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_sales: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impressions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<String>,
}

impl ColumnOverrides {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        let value = match role {
            ColumnRole::Campaign => &self.campaign,
            ColumnRole::Spend => &self.spend,
            ColumnRole::AdSales => &self.ad_sales,
            ColumnRole::Impressions => &self.impressions,
            ColumnRole::Clicks => &self.clicks,
            ColumnRole::Title => &self.title,
            ColumnRole::TotalSales => &self.total_sales,
        };
        value.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self == &ColumnOverrides::default()
    }
}

/// Overrides first, then [`ContainsResolver`].
///
/// An override that names a missing header resolves to nothing rather than
/// silently falling back to fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredResolver {
    overrides: ColumnOverrides,
}

impl ConfiguredResolver {
    pub fn new(overrides: ColumnOverrides) -> Self {
        Self { overrides }
    }
}

impl ColumnResolver for ConfiguredResolver {
    fn resolve(&self, headers: &[String], role: ColumnRole) -> Option<usize> {
        match self.overrides.get(role) {
            Some(name) => find_exact(headers, name),
            None => ContainsResolver.resolve(headers, role),
        }
    }
}

fn find_exact(headers: &[String], name: &str) -> Option<usize> {
    let name = name.trim().to_lowercase();
    headers.iter().position(|h| h.trim().to_lowercase() == name)
}
