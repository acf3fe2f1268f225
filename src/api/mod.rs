//! ROAS Forge API Server module
//!
//! Provides a stateless HTTP API over the classifier, the projection engine
//! and the file pipeline. Run with `roas-forge-server`.

pub mod handlers;
pub mod server;

pub use server::{build_app, run_api_server, ApiConfig, AppState};
