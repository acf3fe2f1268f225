//! One-shot run: two report files + configuration → [`ProjectionReport`]

use crate::config::{BrandCatalog, ConfigFile, ProjectionConfig};
use crate::core::{aggregate, AggregationOutcome, BrandClassifier, ProjectionEngine};
use crate::error::RoasResult;
use crate::ingest::{
    extract_ad_rows, extract_sales_rows, read_table, ColumnOverrides, ConfiguredResolver,
    RawTable,
};
use crate::types::ProjectionReport;
use std::path::Path;

/// Everything a run needs besides the two reports.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ProjectionConfig,
    catalog: BrandCatalog,
    columns: ColumnOverrides,
}

impl Pipeline {
    pub fn new(config: ProjectionConfig, catalog: BrandCatalog, columns: ColumnOverrides) -> Self {
        Self {
            config,
            catalog,
            columns,
        }
    }

    /// Pipeline from a loaded configuration file (bundled catalog when the
    /// file has no `brands:` section).
    pub fn from_config_file(file: ConfigFile) -> RoasResult<Self> {
        let catalog = file.catalog()?;
        Ok(Self::new(file.projection, catalog, file.columns))
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &BrandCatalog {
        &self.catalog
    }

    /// Read, classify and aggregate both reports.
    pub fn classify_files(&self, ads: &Path, business: &Path) -> RoasResult<AggregationOutcome> {
        let ads = read_table(ads)?;
        let business = read_table(business)?;
        self.classify_tables(&ads, &business)
    }

    pub fn classify_tables(
        &self,
        ads: &RawTable,
        business: &RawTable,
    ) -> RoasResult<AggregationOutcome> {
        let resolver = ConfiguredResolver::new(self.columns.clone());
        let mut ad_rows = extract_ad_rows(ads, &resolver)?;
        let mut sales_rows = extract_sales_rows(business, &resolver)?;

        let classifier = BrandClassifier::new(&self.catalog);
        let outcome = aggregate(&classifier, &mut ad_rows, &mut sales_rows);
        tracing::info!(
            ad_rows = ad_rows.len(),
            sales_rows = sales_rows.len(),
            unmapped = outcome.diagnostics.unmapped_rows(),
            other = outcome.diagnostics.other_rows(),
            "reports classified"
        );
        Ok(outcome)
    }

    /// Full run over two report files.
    pub fn run_files(&self, ads: &Path, business: &Path) -> RoasResult<ProjectionReport> {
        let outcome = self.classify_files(ads, business)?;
        Ok(self.project(outcome))
    }

    /// Full run over reports already in memory.
    pub fn run_tables(&self, ads: &RawTable, business: &RawTable) -> RoasResult<ProjectionReport> {
        let outcome = self.classify_tables(ads, business)?;
        Ok(self.project(outcome))
    }

    fn project(&self, outcome: AggregationOutcome) -> ProjectionReport {
        let engine = ProjectionEngine::new(self.config.clone());
        engine.report(&outcome.aggregates, outcome.diagnostics)
    }
}
