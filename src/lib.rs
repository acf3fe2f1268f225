//! ROAS Forge - brand attribution and ROAS projection
//!
//! This library reads an advertising report and a business report, attributes
//! every row to a brand, and projects next period's spend, ROAS, organic share
//! and overall revenue per brand and for the portfolio.
//!
//! # Features
//!
//! - CSV and spreadsheet ingestion with currency-aware number cleaning
//! - Prefix (campaign) and keyword (title) brand attribution
//! - Configurable uplift assumptions with an organic-share cap
//! - Weekly breakdown of the monthly projection
//! - Excel / YAML / JSON export
//!
//! # Example
//!
//! ```no_run
//! use roas_forge::config::ConfigFile;
//! use roas_forge::Pipeline;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::from_config_file(ConfigFile::default())?;
//! let report = pipeline.run_files(Path::new("ads.csv"), Path::new("business.csv"))?;
//!
//! for brand in &report.brands {
//!     println!("{}: {:.2}", brand.brand, brand.overall_revenue);
//! }
//! println!("Portfolio: {:.2}", report.total.overall_revenue);
//! # Ok::<(), roas_forge::error::RoasError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod ingest;
pub mod pipeline;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use crate::core::{BrandClassifier, ProjectionEngine};
pub use error::{RoasError, RoasResult};
pub use pipeline::Pipeline;
pub use types::{
    AdRow, Attribution, BrandAggregate, BrandProjection, BrandRecord, ProjectionReport,
    ProjectionWarning, SalesRow, WeeklyRow,
};
