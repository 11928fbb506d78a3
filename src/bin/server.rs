use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use pallet_loader::types::{BoxSpec, PalletType, PlanRecord};
use pallet_loader::{DefaultPallet, PackConfig, PackError, Packer};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    pallets: Vec<PalletType>,
    boxes: Vec<BoxSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_pallet_type: Option<u32>,
}

#[derive(Serialize)]
struct OptimizeResponse {
    placements: Vec<PlanRecord>,
}

fn error_status(err: &PackError) -> StatusCode {
    match err {
        PackError::Unplaceable { .. } | PackError::EscalationLimit { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PackError::EmptyCatalog | PackError::UnknownPalletType(_) | PackError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

async fn optimize_pallets(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize-pallets"
    );

    let config = PackConfig {
        default_pallet: req
            .default_pallet_type
            .map_or(DefaultPallet::First, DefaultPallet::Type),
        ..PackConfig::default()
    };
    let packer = Packer::with_config(req.pallets, req.boxes, config);
    let placements = packer.pack().map_err(|e| {
        tracing::warn!(error = %e, "packing failed");
        (error_status(&e), e.to_string())
    })?;

    Ok(Json(OptimizeResponse { placements }))
}

fn app() -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize-pallets", post(optimize_pallets))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

fn main() {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app()).await.unwrap();
}
