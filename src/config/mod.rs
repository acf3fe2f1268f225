//! Configuration: projection assumptions, brand catalog, column overrides
//!
//! A configuration file is YAML. Every key is optional:
//!
//! ```yaml
//! roas_uplift_fraction: 0.20
//! organic_lift_fraction: 0.05
//! spend_growth_fraction: 0.0
//! organic_cap: 0.95
//! weekly_weights: front_loaded      # or uniform, or [0.3, 0.2, 0.2, 0.2, 0.1]
//! project_traffic: true
//! columns:
//!   ad_sales: "14 Day Total Sales"
//! brands:
//!   - code: MA
//!     name: Maison Alhambra
//!     prefixes: [MA]
//!     keywords: ["MAISON ALHAMBRA"]
//! ```
//!
//! Files are checked against the embedded JSON Schema first, then
//! deserialized and validated semantically.

mod brands;
mod projection;

pub use brands::BrandCatalog;
pub use projection::{ProjectionConfig, WeeklySchedule, WEIGHT_SUM_TOLERANCE};

use crate::error::{RoasError, RoasResult};
use crate::ingest::ColumnOverrides;
use crate::types::BrandRecord;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

const PROJECTION_SCHEMA: &str = include_str!("../../schema/projection.schema.json");

/// Everything a configuration file can carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub projection: ProjectionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<BrandRecord>>,
    #[serde(default)]
    pub columns: ColumnOverrides,
}

impl ConfigFile {
    /// The catalog from the file, or the bundled one when the file has none.
    pub fn catalog(&self) -> RoasResult<BrandCatalog> {
        match &self.brands {
            Some(brands) => BrandCatalog::new(brands.clone()),
            None => BrandCatalog::bundled(),
        }
    }
}

/// Load, schema-check and validate a configuration file.
///
/// # Example
/// ```no_run
/// use roas_forge::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("projection.yaml"))?;
/// println!("ROAS uplift: {}", config.projection.roas_uplift_fraction);
/// # Ok::<(), roas_forge::error::RoasError>(())
/// ```
pub fn load_config(path: &Path) -> RoasResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        RoasError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_config(&content)
}

/// Parse configuration YAML held in memory.
pub fn parse_config(content: &str) -> RoasResult<ConfigFile> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty document means "all defaults"
    if yaml.is_null() {
        return Ok(ConfigFile::default());
    }

    validate_against_schema(&yaml)?;

    let config: ConfigFile = serde_yaml::from_value(yaml)?;
    config.projection.validate()?;
    if config.brands.is_some() {
        config.catalog()?;
    }
    Ok(config)
}

/// Validate YAML against the projection JSON Schema
fn validate_against_schema(yaml: &serde_yaml::Value) -> RoasResult<()> {
    let schema_value: serde_json::Value = serde_json::from_str(PROJECTION_SCHEMA)
        .map_err(|e| RoasError::Validation(format!("Failed to parse schema: {}", e)))?;

    let compiled_schema = JSONSchema::compile(&schema_value)
        .map_err(|e| RoasError::Validation(format!("Failed to compile schema: {}", e)))?;

    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| RoasError::Validation(format!("Failed to convert YAML to JSON: {}", e)))?;

    if let Err(errors) = compiled_schema.validate(&json_value) {
        let error_messages: Vec<String> = errors.map(|e| format!("  - {}", e)).collect();
        return Err(RoasError::Validation(format!(
            "Schema validation failed:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}
