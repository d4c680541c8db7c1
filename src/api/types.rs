//! Shared request and response types for REST API handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::analytics::{
    ActivityEntry, ClassificationEvent, FaultTally, TrendPoint, VehicleCriticalCounts,
};
use crate::domain::FaultRecord;

// ============================================================================
// Query types
// ============================================================================

/// Query parameters for listing fault records.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsQuery {
    pub vehicle_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

/// Query parameters for the latest-records endpoint.
#[derive(Debug, Deserialize)]
pub struct LatestRecordsQuery {
    pub limit: Option<u32>,
}

/// Query parameters for listing NFT links.
#[derive(Debug, Deserialize)]
pub struct NftLinksQuery {
    pub vin: Option<String>,
}

/// Query parameters for classification history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// One of `24h`, `7d`, `30d`, `all`. Defaults to `7d`.
    pub time_range: Option<String>,
}

// ============================================================================
// Response types
// ============================================================================

/// Classifier summary statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierStatsResponse {
    pub total_classifications: u64,
    /// Threshold heuristic over all records, formatted to one decimal place.
    pub accuracy_rate: String,
    pub top_faults: Vec<FaultTally>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Classification history rows.
pub type HistoryResponse = Vec<ClassificationEvent>;

/// Single-NFT detail: the fault record joined with its resolved metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NftDetailResponse {
    pub record: FaultRecord,
    /// Human-readable fault label, when the record has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_display: Option<String>,
    /// Raw metadata document, or null when resolution failed.
    pub metadata: Option<Value>,
    /// Present when metadata resolution was attempted and failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
}

/// VIN to first-token resolution result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VinToNftResponse {
    pub nft_id: String,
}

/// Full fleet analytics: trend, channel averages, and critical counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetAnalyticsResponse {
    pub trend: Vec<TrendPoint>,
    pub sensor_averages: BTreeMap<&'static str, f64>,
    pub vehicles: Vec<VehicleCriticalCounts>,
}
