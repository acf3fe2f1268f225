//! Brand catalog: the fixed, ordered set of brands a run attributes rows to

use crate::core::classifier::PREFIX_BOUNDARIES;
use crate::error::{RoasError, RoasResult};
use crate::types::BrandRecord;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_BRANDS: &str = include_str!("../../config/brands.yaml");

#[derive(Debug, Deserialize)]
struct BrandsFile {
    brands: Vec<BrandRecord>,
}

/// Immutable, validated brand list. Order is the matching precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandCatalog {
    brands: Vec<BrandRecord>,
}

impl BrandCatalog {
    /// Validate and normalize a brand list.
    ///
    /// Codes and display names must be unique, every brand needs at least one
    /// campaign prefix, and blank prefixes/keywords are rejected. Prefixes and
    /// keywords are upper-cased and trimmed.
    pub fn new(brands: Vec<BrandRecord>) -> RoasResult<Self> {
        if brands.is_empty() {
            return Err(RoasError::Config(
                "Brand catalog must contain at least one brand".to_string(),
            ));
        }

        let mut codes = HashSet::new();
        let mut names = HashSet::new();
        let mut normalized = Vec::with_capacity(brands.len());

        for brand in brands {
            let code = brand.code.trim().to_string();
            let name = brand.name.trim().to_string();
            if code.is_empty() || name.is_empty() {
                return Err(RoasError::Config(
                    "Every brand needs a code and a name".to_string(),
                ));
            }
            if !codes.insert(code.to_uppercase()) {
                return Err(RoasError::Config(format!("Duplicate brand code '{code}'")));
            }
            if !names.insert(name.to_uppercase()) {
                return Err(RoasError::Config(format!("Duplicate brand name '{name}'")));
            }
            if brand.prefixes.is_empty() {
                return Err(RoasError::Config(format!(
                    "Brand '{code}' has no campaign prefixes"
                )));
            }

            let prefixes = normalize_rules(&code, "prefix", brand.prefixes)?;
            let keywords = normalize_rules(&code, "keyword", brand.keywords)?;

            normalized.push(BrandRecord {
                code,
                name,
                prefixes,
                keywords,
            });
        }

        Ok(Self { brands: normalized })
    }

    /// The catalog shipped with the binary (`config/brands.yaml`).
    pub fn bundled() -> RoasResult<Self> {
        Self::from_yaml_str(BUNDLED_BRANDS)
    }

    /// Parse a `brands:` YAML document.
    pub fn from_yaml_str(content: &str) -> RoasResult<Self> {
        let file: BrandsFile = serde_yaml::from_str(content)?;
        Self::new(file.brands)
    }

    pub fn load(path: &Path) -> RoasResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RoasError::Config(format!(
                "Failed to read brand catalog '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn brands(&self) -> &[BrandRecord] {
        &self.brands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BrandRecord> {
        self.brands.iter()
    }

    pub fn get(&self, code: &str) -> Option<&BrandRecord> {
        self.brands.iter().find(|b| b.code == code)
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

fn normalize_rules(code: &str, kind: &str, rules: Vec<String>) -> RoasResult<Vec<String>> {
    rules
        .into_iter()
        .map(|rule| {
            let rule = rule.trim().to_uppercase();
            if rule.is_empty() {
                Err(RoasError::Config(format!("Brand '{code}' has a blank {kind}")))
            } else if kind == "prefix" && rule.ends_with(PREFIX_BOUNDARIES) {
                // The classifier supplies the boundary; a prefix carrying one never matches
                Err(RoasError::Config(format!(
                    "Brand '{code}' prefix '{rule}' must not end with '_', '-' or a space"
                )))
            } else {
                Ok(rule)
            }
        })
        .collect()
}
