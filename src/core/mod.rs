//! Attribution and projection core
//!
//! Rows flow through [`BrandClassifier`] (tags each row with a brand),
//! [`aggregate`] (per-brand sums plus unattributed diagnostics) and
//! [`ProjectionEngine`] (current ratios → target ratios → target absolute
//! figures), then [`distribute_all`] splits the month into weeks.

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod weekly;

pub use aggregator::{aggregate, aggregate_tagged, AggregationOutcome};
pub use classifier::BrandClassifier;
pub use engine::{safe_div, ProjectionEngine, ProjectionSet, TOTAL_LABEL};
pub use weekly::{distribute, distribute_all};
