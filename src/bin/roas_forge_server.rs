//! ROAS Forge API Server binary
//!
//! HTTP API for brand attribution and ROAS projection.

use clap::Parser;
use roas_forge::api::{run_api_server, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "roas-forge-server")]
#[command(version)]
#[command(about = "ROAS Forge API Server - HTTP API for brand attribution and ROAS projection")]
#[command(long_about = r#"
ROAS Forge API Server

Endpoints:
  - POST /api/v1/classify       - Attribute campaign names or product titles
  - POST /api/v1/project        - Project from per-brand aggregates
  - POST /api/v1/project/files  - Run the pipeline over two report files

Additional endpoints:
  - GET  /health                - Health check
  - GET  /version               - Server version info
  - GET  /                      - API documentation

Features:
  - CORS enabled for cross-origin requests
  - Graceful shutdown on SIGINT/SIGTERM
  - JSON response format with request IDs
  - No state kept between requests

Example usage:
  roas-forge-server                          # Start on localhost:8080
  roas-forge-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/classify \
    -H "Content-Type: application/json" \
    -d '{"labels": ["MA_Launch"], "kind": "campaign"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ROAS_FORGE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "ROAS_FORGE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(config).await
}
