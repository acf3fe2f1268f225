//! Projection engine: current ratios → target ratios → target absolute figures

use super::weekly::distribute_all;
use crate::config::ProjectionConfig;
use crate::types::{
    AttributionDiagnostics, BrandAggregate, BrandProjection, CurrentMetrics, PortfolioTotal,
    ProjectionReport, ProjectionWarning,
};
use chrono::Utc;

/// Label of the portfolio row.
pub const TOTAL_LABEL: &str = "Total";

/// `numerator / denominator`, or 0 when the denominator is 0.
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Projections for every brand plus the portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSet {
    pub current: Vec<CurrentMetrics>,
    pub current_total: CurrentMetrics,
    pub brands: Vec<BrandProjection>,
    pub total: PortfolioTotal,
    pub warnings: Vec<ProjectionWarning>,
}

/// Pure function of (aggregates, configuration). Holds no state between runs.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    #[must_use]
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Current-period figures of one brand.
    #[must_use]
    pub fn current_metrics(aggregate: &BrandAggregate) -> CurrentMetrics {
        let organic_share = organic_contribution(aggregate);
        CurrentMetrics {
            brand: aggregate.name.clone(),
            spend: aggregate.spend,
            ad_sales: aggregate.ad_sales,
            total_sales: aggregate.total_sales,
            organic_sales: aggregate.total_sales - aggregate.ad_sales,
            impressions: aggregate.impressions,
            clicks: aggregate.clicks,
            roas: safe_div(aggregate.ad_sales, aggregate.spend),
            acos: safe_div(aggregate.spend, aggregate.ad_sales),
            tacos: safe_div(aggregate.spend, aggregate.total_sales),
            organic_share,
            paid_share: 1.0 - organic_share,
            cpc: safe_div(aggregate.spend, aggregate.clicks),
            ctr: safe_div(aggregate.clicks, aggregate.impressions),
        }
    }

    /// Current-period figures of the portfolio, from summed absolutes.
    #[must_use]
    pub fn current_total(aggregates: &[BrandAggregate]) -> CurrentMetrics {
        let summed = aggregates.iter().fold(
            BrandAggregate::new(TOTAL_LABEL, TOTAL_LABEL),
            |mut acc, agg| {
                acc.spend += agg.spend;
                acc.ad_sales += agg.ad_sales;
                acc.impressions += agg.impressions;
                acc.clicks += agg.clicks;
                acc.total_sales += agg.total_sales;
                acc
            },
        );
        Self::current_metrics(&summed)
    }

    /// Project one brand. Warnings about its inputs are appended to `warnings`.
    pub fn project_brand(
        &self,
        aggregate: &BrandAggregate,
        warnings: &mut Vec<ProjectionWarning>,
    ) -> BrandProjection {
        let config = &self.config;

        // 1-2
        let current_roas = safe_div(aggregate.ad_sales, aggregate.spend);
        let current_organic = organic_contribution(aggregate);
        if current_organic < 0.0 {
            tracing::warn!(
                brand = %aggregate.name,
                organic_contribution = current_organic,
                "ad sales exceed total sales"
            );
            warnings.push(ProjectionWarning::NegativeOrganicContribution {
                brand: aggregate.name.clone(),
                value: current_organic,
            });
        }

        // 3-5
        let spend = aggregate.spend * (1.0 + config.spend_growth_fraction);
        let roas = current_roas * (1.0 + config.roas_uplift_fraction);
        let ad_revenue = spend * roas;

        // 6-7
        let organic_share = config
            .organic_cap
            .min(current_organic + config.organic_lift_fraction);
        let paid_share = 1.0 - organic_share;

        // 8-9
        let overall_revenue = if paid_share > 0.0 {
            ad_revenue / paid_share
        } else {
            tracing::warn!(
                brand = %aggregate.name,
                "paid share is 0; overall revenue falls back to ad revenue"
            );
            warnings.push(ProjectionWarning::OrganicCapSaturated {
                brand: aggregate.name.clone(),
            });
            ad_revenue
        };
        let organic_revenue = overall_revenue - ad_revenue;

        // 10-11
        let troas = safe_div(overall_revenue, spend);
        let tacos = safe_div(spend, overall_revenue);

        // 12
        let (impressions, clicks) = if config.project_traffic {
            let (impressions, clicks) = project_traffic(aggregate, spend);
            (Some(impressions), Some(clicks))
        } else {
            (None, None)
        };

        BrandProjection {
            brand: aggregate.name.clone(),
            spend,
            roas,
            ad_revenue,
            organic_share,
            paid_share,
            organic_revenue,
            overall_revenue,
            troas,
            tacos,
            impressions,
            clicks,
        }
    }

    /// Portfolio row: ratios recomputed from summed absolute figures.
    #[must_use]
    pub fn portfolio_total(&self, brands: &[BrandProjection]) -> PortfolioTotal {
        let spend: f64 = brands.iter().map(|b| b.spend).sum();
        let ad_revenue: f64 = brands.iter().map(|b| b.ad_revenue).sum();
        let organic_revenue: f64 = brands.iter().map(|b| b.organic_revenue).sum();
        let overall_revenue: f64 = brands.iter().map(|b| b.overall_revenue).sum();
        let organic_share = safe_div(organic_revenue, overall_revenue);

        let sum_optional = |field: fn(&BrandProjection) -> Option<f64>| -> Option<f64> {
            self.config
                .project_traffic
                .then(|| brands.iter().filter_map(field).sum())
        };

        BrandProjection {
            brand: TOTAL_LABEL.to_string(),
            spend,
            roas: safe_div(ad_revenue, spend),
            ad_revenue,
            organic_share,
            paid_share: 1.0 - organic_share,
            organic_revenue,
            overall_revenue,
            troas: safe_div(overall_revenue, spend),
            tacos: safe_div(spend, overall_revenue),
            impressions: sum_optional(|b| b.impressions),
            clicks: sum_optional(|b| b.clicks),
        }
    }

    /// Current figures and projections for every brand, plus the portfolio.
    pub fn run(&self, aggregates: &[BrandAggregate]) -> ProjectionSet {
        let mut warnings = Vec::new();
        if self.config.has_degenerate_cap() {
            tracing::warn!(
                cap = self.config.organic_cap,
                "organic cap allows a 100% organic share"
            );
            warnings.push(ProjectionWarning::DegenerateOrganicCap {
                cap: self.config.organic_cap,
            });
        }

        let current = aggregates.iter().map(Self::current_metrics).collect();
        let current_total = Self::current_total(aggregates);
        let brands: Vec<BrandProjection> = aggregates
            .iter()
            .map(|agg| self.project_brand(agg, &mut warnings))
            .collect();
        let total = self.portfolio_total(&brands);

        ProjectionSet {
            current,
            current_total,
            brands,
            total,
            warnings,
        }
    }

    /// Full result set: projections, weekly split and diagnostics.
    pub fn report(
        &self,
        aggregates: &[BrandAggregate],
        diagnostics: AttributionDiagnostics,
    ) -> ProjectionReport {
        let set = self.run(aggregates);
        let weekly = distribute_all(&set.brands, &set.total, &self.config.weekly_weights);

        let mut warnings = set.warnings;
        let unattributed = [
            ("ads", diagnostics.unmapped_rows()),
            ("business", diagnostics.other_rows()),
        ];
        for (report, rows) in unattributed {
            if rows > 0 {
                warnings.push(ProjectionWarning::UnattributedRows {
                    report: report.to_string(),
                    rows,
                });
            }
        }

        ProjectionReport {
            generated_at: Utc::now(),
            config: self.config.clone(),
            current: set.current,
            current_total: set.current_total,
            brands: set.brands,
            total: set.total,
            weekly,
            diagnostics,
            warnings,
        }
    }
}

/// `(total - ad) / total`, or 0 without sales. Not clamped.
fn organic_contribution(aggregate: &BrandAggregate) -> f64 {
    safe_div(
        aggregate.total_sales - aggregate.ad_sales,
        aggregate.total_sales,
    )
}

/// (impressions, clicks) at current CPC and CTR.
fn project_traffic(aggregate: &BrandAggregate, target_spend: f64) -> (f64, f64) {
    let cpc = safe_div(aggregate.spend, aggregate.clicks);
    let ctr = safe_div(aggregate.clicks, aggregate.impressions);
    let clicks = safe_div(target_spend, cpc);
    let impressions = safe_div(clicks, ctr);
    (impressions, clicks)
}
