//! HTTP server bootstrap for the DriveLedger diagnostics API.
//!
//! This module wires together:
//! - configuration
//! - the hosted store client
//! - the IPFS gateway client
//! - the Axum router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::infra::{
    FaultStore, GatewayConfig, IpfsGatewayClient, NftLinkStore, SupabaseConfig, SupabaseStore,
};
use crate::telemetry::{self, TelemetryConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted store connection settings.
    pub supabase: SupabaseConfig,
    /// IPFS gateway settings.
    pub gateways: GatewayConfig,
    /// Server listen address.
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing store credentials are a hard failure; everything else has a
    /// default.
    pub fn from_env() -> anyhow::Result<Self> {
        let supabase = SupabaseConfig::from_env()?;
        let gateways = GatewayConfig::from_env();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address: {e}"))?;

        Ok(Self {
            supabase,
            gateways,
            listen_addr,
        })
    }
}

/// Application state shared across handlers.
///
/// Constructed once at startup and injected; there is no module-level client
/// global and no first-import side effect.
#[derive(Clone)]
pub struct AppState {
    pub fault_store: Arc<dyn FaultStore>,
    pub nft_links: Arc<dyn NftLinkStore>,
    pub metadata: Arc<IpfsGatewayClient>,
}

/// Build the full application router for a given state.
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let mut router = Router::new()
        .nest("/api", crate::api::router())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router.with_state(state))
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    telemetry::init_telemetry(&TelemetryConfig::from_env());

    info!("Starting DriveLedger API v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Gateways: {}", config.gateways.gateways.join(", "));

    let store = Arc::new(SupabaseStore::new(config.supabase)?);
    let metadata = Arc::new(IpfsGatewayClient::new(config.gateways)?);

    let state = AppState {
        fault_store: store.clone(),
        nft_links: store,
        metadata,
    };

    let router = app(state)?;

    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("DriveLedger API is ready to accept connections");
    axum::serve(listener, router).await?;

    Ok(())
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
    ))
}

/// Health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "driveledger-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check endpoint: verifies the store answers a one-row read.
async fn readiness_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, (axum::http::StatusCode, String)> {
    let probe = crate::infra::RecordFilter {
        limit: Some(1),
        ..Default::default()
    };
    match state.fault_store.list_records(&probe).await {
        Ok(_) => Ok(axum::Json(serde_json::json!({
            "status": "ready",
            "store": "connected",
        }))),
        Err(e) => Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            format!("Store unavailable: {}", e),
        )),
    }
}
