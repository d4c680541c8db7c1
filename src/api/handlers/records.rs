//! Fault record read handlers.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::{missing_param, ApiError};
use crate::api::types::{LatestRecordsQuery, ListRecordsQuery};
use crate::domain::FaultRecord;
use crate::infra::RecordFilter;
use crate::server::AppState;

/// Default row count for the latest-records endpoint.
const DEFAULT_LATEST_LIMIT: u32 = 20;
/// Upper bound for any caller-supplied limit.
const MAX_LIMIT: u32 = 1000;

/// GET /api/v1/records - List fault records, newest first.
///
/// All filters compose. A date range must be supplied whole: one bound
/// without the other is a 400.
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Vec<FaultRecord>>, ApiError> {
    match (&query.start_date, &query.end_date) {
        (Some(_), None) => return Err(missing_param("end_date")),
        (None, Some(_)) => return Err(missing_param("start_date")),
        _ => {}
    }

    let filter = RecordFilter {
        vehicle_id: query.vehicle_id,
        start_date: query.start_date,
        end_date: query.end_date,
        search: query.search,
        limit: query.limit.map(|limit| limit.min(MAX_LIMIT)),
        require_fault: false,
    };

    let records = state.fault_store.list_records(&filter).await?;
    Ok(Json(records))
}

/// GET /api/v1/records/latest - Newest labeled records.
pub async fn latest_records(
    State(state): State<AppState>,
    Query(query): Query<LatestRecordsQuery>,
) -> Result<Json<Vec<FaultRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LATEST_LIMIT).min(MAX_LIMIT);
    let records = state
        .fault_store
        .list_records(&RecordFilter::latest(limit))
        .await?;
    Ok(Json(records))
}
