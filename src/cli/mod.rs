//! CLI command handlers

pub mod commands;

pub use commands::{
    brands, classify, init_tracing, print_report, project, validate, ConfigOverrides,
    ProjectOptions,
};
