//! Projection assumptions and the weekly weight schedule

use crate::error::{RoasError, RoasResult};
use serde::{Deserialize, Serialize};

/// Allowed drift of a weight schedule's sum away from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// User-adjustable growth assumptions. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Proportional ROAS improvement (0.20 = +20%)
    pub roas_uplift_fraction: f64,
    /// Additive lift of the organic share (0.05 = +5 points)
    pub organic_lift_fraction: f64,
    /// Proportional change of ad spend (0.0 = unchanged)
    pub spend_growth_fraction: f64,
    /// Upper bound of the projected organic share
    pub organic_cap: f64,
    pub weekly_weights: WeeklySchedule,
    /// Project impressions and clicks at constant CPC / CTR
    pub project_traffic: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            roas_uplift_fraction: 0.20,
            organic_lift_fraction: 0.05,
            spend_growth_fraction: 0.0,
            organic_cap: 0.95,
            weekly_weights: WeeklySchedule::uniform(),
            project_traffic: true,
        }
    }
}

impl ProjectionConfig {
    /// Check the assumptions are usable before any projection runs.
    pub fn validate(&self) -> RoasResult<()> {
        let fractions = [
            ("roas_uplift_fraction", self.roas_uplift_fraction),
            ("organic_lift_fraction", self.organic_lift_fraction),
            ("spend_growth_fraction", self.spend_growth_fraction),
            ("organic_cap", self.organic_cap),
        ];
        for (name, value) in fractions {
            if !value.is_finite() {
                return Err(RoasError::Config(format!("{name} must be a finite number")));
            }
        }

        if self.spend_growth_fraction < -1.0 {
            return Err(RoasError::Config(format!(
                "spend_growth_fraction {} would make spend negative (minimum -1)",
                self.spend_growth_fraction
            )));
        }

        if !(0.0..=1.0).contains(&self.organic_cap) {
            return Err(RoasError::Config(format!(
                "organic_cap {} must be between 0 and 1",
                self.organic_cap
            )));
        }

        self.weekly_weights.check()
    }

    /// A cap of 1 lets the paid share reach zero.
    pub fn has_degenerate_cap(&self) -> bool {
        self.organic_cap >= 1.0
    }
}

/// Fractions that split a monthly figure into weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeightsSpec", into = "Vec<f64>")]
pub struct WeeklySchedule {
    weights: Vec<f64>,
}

/// How a schedule is written in YAML: a preset name or explicit fractions.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WeightsSpec {
    Preset(String),
    Weights(Vec<f64>),
}

impl TryFrom<WeightsSpec> for WeeklySchedule {
    type Error = String;

    fn try_from(spec: WeightsSpec) -> Result<Self, Self::Error> {
        let schedule = match spec {
            WeightsSpec::Preset(name) => WeeklySchedule::preset(&name),
            WeightsSpec::Weights(weights) => WeeklySchedule::new(weights),
        };
        schedule.map_err(|e| e.to_string())
    }
}

impl From<WeeklySchedule> for Vec<f64> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule.weights
    }
}

impl WeeklySchedule {
    pub fn new(weights: Vec<f64>) -> RoasResult<Self> {
        let schedule = Self { weights };
        schedule.check()?;
        Ok(schedule)
    }

    /// `[0.2; 5]`
    pub fn uniform() -> Self {
        Self {
            weights: vec![0.2; 5],
        }
    }

    /// `[0.30, 0.20, 0.20, 0.20, 0.10]`
    pub fn front_loaded() -> Self {
        Self {
            weights: vec![0.30, 0.20, 0.20, 0.20, 0.10],
        }
    }

    pub fn preset(name: &str) -> RoasResult<Self> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "uniform" | "even" => Ok(Self::uniform()),
            "front_loaded" => Ok(Self::front_loaded()),
            other => Err(RoasError::Config(format!(
                "Unknown weekly schedule '{other}'. Use uniform, front_loaded or a list of fractions"
            ))),
        }
    }

    /// Parse a preset name or a comma-separated list (`0.3,0.2,0.2,0.2,0.1`).
    pub fn parse(input: &str) -> RoasResult<Self> {
        if !input.contains(',') && input.trim().parse::<f64>().is_err() {
            return Self::preset(input);
        }

        let weights = input
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    RoasError::Config(format!("Invalid weekly weight '{}'", part.trim()))
                })
            })
            .collect::<RoasResult<Vec<f64>>>()?;
        Self::new(weights)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn check(&self) -> RoasResult<()> {
        if self.weights.is_empty() {
            return Err(RoasError::Config(
                "weekly_weights must contain at least one week".to_string(),
            ));
        }
        if let Some(bad) = self
            .weights
            .iter()
            .find(|w| !w.is_finite() || **w < 0.0)
        {
            return Err(RoasError::Config(format!(
                "weekly weight {bad} must be a non-negative number"
            )));
        }
        let sum: f64 = self.weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RoasError::Config(format!(
                "weekly_weights must sum to 1 (got {sum})"
            )));
        }
        Ok(())
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::uniform()
    }
}
