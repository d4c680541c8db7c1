//! Fleet statistics, overview, and analytics handlers.

use axum::extract::State;
use axum::Json;

use crate::analytics::{
    critical_counts, daily_trend, fleet_overview, fleet_stats, sensor_averages, FleetStats,
    VehicleRollup,
};
use crate::api::error::ApiError;
use crate::api::types::FleetAnalyticsResponse;
use crate::infra::RecordFilter;
use crate::server::AppState;

/// GET /api/v1/fleet/stats - Headline fleet statistics.
pub async fn fleet_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<FleetStats>, ApiError> {
    let records = state
        .fault_store
        .list_records(&RecordFilter::labeled())
        .await?;
    let links = state.nft_links.list_links().await?;

    Ok(Json(fleet_stats(&records, &links)))
}

/// GET /api/v1/fleet/overview - Per-vehicle rollups.
pub async fn fleet_overview_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleRollup>>, ApiError> {
    let links = state.nft_links.list_links().await?;
    if links.is_empty() {
        return Ok(Json(vec![]));
    }

    let records = state
        .fault_store
        .list_records(&RecordFilter::labeled())
        .await?;

    Ok(Json(fleet_overview(&records, &links)))
}

/// GET /api/v1/fleet/analytics - Trend buckets, sensor averages, and
/// per-vehicle critical-reading counts.
pub async fn fleet_analytics_handler(
    State(state): State<AppState>,
) -> Result<Json<FleetAnalyticsResponse>, ApiError> {
    let records = state
        .fault_store
        .list_records(&RecordFilter::labeled())
        .await?;
    let links = state.nft_links.list_links().await?;

    Ok(Json(FleetAnalyticsResponse {
        trend: daily_trend(&records),
        sensor_averages: sensor_averages(&records),
        vehicles: critical_counts(&records, &links),
    }))
}
