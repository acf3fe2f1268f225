//! Weekly distribution of a monthly projection

use crate::config::WeeklySchedule;
use crate::types::{BrandProjection, WeeklyRow};

/// Split one monthly projection into weeks.
///
/// Absolute figures are multiplied by the week's weight. ROAS, organic share
/// and T-ACOS are efficiency ratios and stay at the monthly value.
#[must_use]
pub fn distribute(projection: &BrandProjection, schedule: &WeeklySchedule) -> Vec<WeeklyRow> {
    schedule
        .weights()
        .iter()
        .enumerate()
        .map(|(idx, &weight)| WeeklyRow {
            brand: projection.brand.clone(),
            week: idx + 1,
            weight,
            spend: projection.spend * weight,
            ad_revenue: projection.ad_revenue * weight,
            organic_revenue: projection.organic_revenue * weight,
            overall_revenue: projection.overall_revenue * weight,
            roas: projection.roas,
            organic_share: projection.organic_share,
            tacos: projection.tacos,
            impressions: projection.impressions.map(|v| v * weight),
            clicks: projection.clicks.map(|v| v * weight),
        })
        .collect()
}

/// Weekly rows for every brand, then for the portfolio total.
#[must_use]
pub fn distribute_all(
    brands: &[BrandProjection],
    total: &BrandProjection,
    schedule: &WeeklySchedule,
) -> Vec<WeeklyRow> {
    brands
        .iter()
        .chain(std::iter::once(total))
        .flat_map(|projection| distribute(projection, schedule))
        .collect()
}
