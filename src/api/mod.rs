//! REST API routes for the diagnostics dashboard.

pub mod error;
pub mod handlers;
pub mod types;

use axum::routing::get;
use axum::Router;

use crate::server::AppState;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/records", get(handlers::records::list_records))
        .route("/v1/records/latest", get(handlers::records::latest_records))
        .route("/v1/nfts", get(handlers::nfts::list_nft_links))
        .route("/v1/nfts/:id", get(handlers::nfts::nft_detail))
        .route("/v1/vins/:vin/nft", get(handlers::nfts::vin_to_nft))
        .route("/v1/classifier/stats", get(handlers::classifier::classifier_stats))
        .route("/v1/classifier/history", get(handlers::classifier::classifier_history))
        .route("/v1/fleet/stats", get(handlers::fleet::fleet_stats_handler))
        .route("/v1/fleet/overview", get(handlers::fleet::fleet_overview_handler))
        .route("/v1/fleet/analytics", get(handlers::fleet::fleet_analytics_handler))
}
