use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use internhub::config::AppConfig;
use internhub::error::AppError;
use internhub::telemetry;
use internhub::workflows::marketplace::{
    marketplace_router, InMemoryMarketplaceRepository, MarketplaceService,
    OpenAiFeedbackGenerator, ReviewRequest, ReviewResult,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "InternHub Matching Engine",
    about = "Run the internship matching and review service from the command line",
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
    /// Analyze a cover letter from disk without starting the server
    Review(ReviewArgs),
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
struct ReviewArgs {
    /// Path to a plain-text cover letter
    cover_letter: PathBuf,
    /// Company the letter is addressed to
    #[arg(long)]
    company: String,
    /// Posting title the letter targets
    #[arg(long)]
    title: String,
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
        Command::Review(args) => run_review(args).await,
    }
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

    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let feedback = Arc::new(OpenAiFeedbackGenerator::from_config(&config.feedback)?);
    let service = Arc::new(MarketplaceService::new(repository, feedback));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(ops_state)
        .merge(marketplace_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "internship marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// One-shot review for drafting sessions; uses the same analyzer as the
/// `/api/v1/reviews` endpoint, including the degraded fallback when the
/// feedback provider is unreachable.
async fn run_review(args: ReviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let cover_letter = std::fs::read_to_string(&args.cover_letter)?;

    let repository = Arc::new(InMemoryMarketplaceRepository::default());
    let feedback = Arc::new(OpenAiFeedbackGenerator::from_config(&config.feedback)?);
    let service = Arc::new(MarketplaceService::new(repository, feedback));

    let request = ReviewRequest {
        cover_letter,
        company_name: args.company,
        job_title: args.title,
    };

    let review = tokio::task::spawn_blocking(move || service.review_cover_letter(&request))
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))??;

    render_review(&review);
    Ok(())
}

fn render_review(review: &ReviewResult) {
    println!("Cover letter review");
    println!(
        "Sentiment: {} ({})",
        review.sentiment_score,
        review.enthusiasm.label()
    );

    if review.red_flags.is_empty() {
        println!("\nRed flags: none");
    } else {
        println!("\nRed flags");
        for flag in &review.red_flags {
            println!("- {}", flag.message());
        }
    }

    println!("\nFeedback");
    println!("{}", review.feedback);
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
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

async fn metrics_endpoint(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
