//! Classifier statistics and history handlers.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, Utc};

use crate::analytics::{classification_history, overall_accuracy, recent_activity, top_faults};
use crate::api::error::{invalid_param, ApiError};
use crate::api::types::{ClassifierStatsResponse, HistoryQuery, HistoryResponse};
use crate::infra::RecordFilter;
use crate::server::AppState;

/// Top-fault list length.
const TOP_FAULTS_LIMIT: usize = 5;
/// Recent-activity row count.
const RECENT_ACTIVITY_LIMIT: usize = 10;

/// GET /api/v1/classifier/stats - Summary statistics.
///
/// Global totals: every labeled record counts, VIN-linked or not.
pub async fn classifier_stats(
    State(state): State<AppState>,
) -> Result<Json<ClassifierStatsResponse>, ApiError> {
    let records = state
        .fault_store
        .list_records(&RecordFilter::labeled())
        .await?;

    Ok(Json(ClassifierStatsResponse {
        total_classifications: records.len() as u64,
        accuracy_rate: format!("{:.1}", overall_accuracy(&records)),
        top_faults: top_faults(&records, TOP_FAULTS_LIMIT),
        recent_activity: recent_activity(&records, RECENT_ACTIVITY_LIMIT),
    }))
}

/// GET /api/v1/classifier/history - Per-record history joined with VINs.
///
/// Vehicle-scoped: records without a VIN link are dropped.
pub async fn classifier_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let time_range = query.time_range.as_deref().unwrap_or("7d");
    let cutoff = match time_range {
        "24h" => Some(Utc::now() - Duration::hours(24)),
        "7d" => Some(Utc::now() - Duration::days(7)),
        "30d" => Some(Utc::now() - Duration::days(30)),
        "all" => None,
        other => return Err(invalid_param("time_range", format!("unknown range {other:?}"))),
    };

    let filter = RecordFilter {
        start_date: cutoff.map(|c| c.to_rfc3339()),
        require_fault: true,
        ..RecordFilter::default()
    };

    let records = state.fault_store.list_records(&filter).await?;
    let links = state.nft_links.list_links().await?;

    Ok(Json(classification_history(&records, &links)))
}
