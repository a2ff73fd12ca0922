use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use rmp_bridge::config::AppConfig;
use rmp_bridge::error::AppError;
use rmp_bridge::matcher::remote::{encode_school_id, RatingsClient};
use rmp_bridge::matcher::{LookupRequest, LookupResponse, ProfessorMatcher};
use rmp_bridge::telemetry;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    matcher: Arc<ProfessorMatcher>,
}

#[derive(Parser, Debug)]
#[command(
    name = "rmp-bridge",
    about = "Match scraped instructor names against a crowd-sourced professor ratings service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Look up a single professor and print the JSON outcome
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Instructor name as scraped, e.g. "Asante-Appiah, Bright"
    name: String,
    /// Course-subject hint used to break ties between same-name matches
    #[arg(long)]
    department: Option<String>,
    /// Already-encoded school id, overriding the configured school
    #[arg(long)]
    school_id: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Lookup(args) => run_lookup(args).await,
    }
}

fn build_matcher(config: &AppConfig) -> Arc<ProfessorMatcher> {
    let client = RatingsClient::new(&config.ratings);
    let default_school_id = encode_school_id(&config.ratings.school_id);
    Arc::new(ProfessorMatcher::new(Arc::new(client), default_school_id))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let matcher = build_matcher(&config);
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        matcher,
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "professor ratings bridge ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/professor/lookup", post(professor_lookup_endpoint))
        .with_state(state)
}

async fn run_lookup(args: LookupArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let matcher = build_matcher(&config);
    let request = LookupRequest {
        professor_name: args.name,
        department: args.department,
        school_id: args.school_id,
    };

    let response = matcher.lookup(request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

// Lookup misses stay HTTP 200 with success=false; only malformed JSON
// is rejected at the HTTP layer.
async fn professor_lookup_endpoint(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Json<LookupResponse> {
    Json(state.matcher.lookup(request).await)
}
