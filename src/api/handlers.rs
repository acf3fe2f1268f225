//! API request handlers
//!
//! Every handler is stateless: brand catalogs, configuration and reports
//! arrive with the request and nothing is kept afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{load_config, BrandCatalog, ConfigFile, ProjectionConfig};
use crate::core::{BrandClassifier, ProjectionEngine};
use crate::error::RoasResult;
use crate::pipeline::Pipeline;
use crate::types::{
    Attribution, AttributionDiagnostics, BrandAggregate, BrandRecord, ProjectionReport,
};
use crate::writer::export_report;

use super::server::AppState;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// 200 with data, or 400 with the error message.
fn respond<T: Serialize>(result: RoasResult<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(e) => {
            tracing::warn!(error = %e, "request failed");
            (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string())))
        }
    }
}

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "ROAS Forge API Server".to_string(),
        version: state.version.clone(),
        description: "Brand attribution and ROAS projection".to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new(
                "POST",
                "/api/v1/classify",
                "Attribute campaign names or product titles to brands",
            ),
            EndpointInfo::new(
                "POST",
                "/api/v1/project",
                "Project from per-brand aggregates",
            ),
            EndpointInfo::new(
                "POST",
                "/api/v1/project/files",
                "Run the full pipeline over two report files",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "classify".to_string(),
            "project".to_string(),
            "project_files".to_string(),
        ],
    }))
}

/// Which matching strategy a label goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    /// Campaign name, matched by prefix
    Campaign,
    /// Product title, matched by keyword
    Title,
}

/// Classify request
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub labels: Vec<String>,
    pub kind: LabelKind,
    /// Replaces the bundled catalog for this request
    #[serde(default)]
    pub brands: Option<Vec<BrandRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LabelAttribution {
    pub label: String,
    pub attribution: Attribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
}

/// Classify response
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub results: Vec<LabelAttribution>,
    pub attributed: usize,
    pub unattributed: usize,
}

/// POST /api/v1/classify - Attribute labels to brands
pub async fn classify(Json(req): Json<ClassifyRequest>) -> impl IntoResponse {
    respond(classify_labels(req))
}

fn classify_labels(req: ClassifyRequest) -> RoasResult<ClassifyResponse> {
    let catalog = match req.brands {
        Some(brands) => BrandCatalog::new(brands)?,
        None => BrandCatalog::bundled()?,
    };
    let classifier = BrandClassifier::new(&catalog);

    let results: Vec<LabelAttribution> = req
        .labels
        .into_iter()
        .map(|label| {
            let attribution = match req.kind {
                LabelKind::Campaign => classifier.classify_campaign(&label),
                LabelKind::Title => classifier.classify_title(&label),
            };
            let brand_name = attribution
                .brand_code()
                .and_then(|code| catalog.get(code))
                .map(|brand| brand.name.clone());
            LabelAttribution {
                label,
                attribution,
                brand_name,
            }
        })
        .collect();

    let attributed = results
        .iter()
        .filter(|r| r.attribution.is_attributed())
        .count();
    Ok(ClassifyResponse {
        unattributed: results.len() - attributed,
        attributed,
        results,
    })
}

/// Project request
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub aggregates: Vec<BrandAggregate>,
    #[serde(default)]
    pub config: Option<ProjectionConfig>,
}

/// POST /api/v1/project - Project from caller-supplied aggregates
pub async fn project(Json(req): Json<ProjectRequest>) -> impl IntoResponse {
    respond(project_aggregates(req))
}

fn project_aggregates(req: ProjectRequest) -> RoasResult<ProjectionReport> {
    let config = req.config.unwrap_or_default();
    config.validate()?;
    let engine = ProjectionEngine::new(config);
    Ok(engine.report(&req.aggregates, AttributionDiagnostics::default()))
}

/// Project-from-files request
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFilesRequest {
    pub ads_path: String,
    pub business_path: String,
    #[serde(default)]
    pub config_path: Option<String>,
    /// Export target; format from its extension
    #[serde(default)]
    pub output_path: Option<String>,
}

/// Project-from-files response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFilesResponse {
    pub report: ProjectionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// POST /api/v1/project/files - Run the pipeline over two report files
pub async fn project_files(Json(req): Json<ProjectFilesRequest>) -> impl IntoResponse {
    respond(project_report_files(req))
}

fn project_report_files(req: ProjectFilesRequest) -> RoasResult<ProjectFilesResponse> {
    let file = match &req.config_path {
        Some(path) => load_config(&PathBuf::from(path))?,
        None => ConfigFile::default(),
    };
    let pipeline = Pipeline::from_config_file(file)?;
    let report = pipeline.run_files(
        &PathBuf::from(&req.ads_path),
        &PathBuf::from(&req.business_path),
    )?;

    if let Some(output) = &req.output_path {
        export_report(&report, &PathBuf::from(output))?;
    }

    Ok(ProjectFilesResponse {
        report,
        output_path: req.output_path,
    })
}
