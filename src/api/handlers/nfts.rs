//! NFT link and detail handlers.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::AppendHeaders;
use axum::Json;
use tracing::warn;

use crate::api::error::{not_found, ApiError, ErrorCode};
use crate::api::types::{NftDetailResponse, NftLinksQuery, VinToNftResponse};
use crate::domain::{fault_display_name, VehicleNftLink};
use crate::server::AppState;

/// Downstream cache window for NFT detail responses. Metadata documents are
/// content-addressed, so short shared caching is safe.
const NFT_DETAIL_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// GET /api/v1/nfts - List NFT-to-VIN links, optionally filtered by VIN.
pub async fn list_nft_links(
    State(state): State<AppState>,
    Query(query): Query<NftLinksQuery>,
) -> Result<Json<Vec<VehicleNftLink>>, ApiError> {
    let links = match &query.vin {
        Some(vin) => state
            .nft_links
            .link_by_vin(vin)
            .await?
            .into_iter()
            .collect(),
        None => state.nft_links.list_links().await?,
    };
    Ok(Json(links))
}

/// GET /api/v1/nfts/:id - Fault record joined with its resolved metadata.
///
/// Metadata resolution failure degrades to a null payload; only a missing
/// record is an error.
pub async fn nft_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(AppendHeaders<[(header::HeaderName, &'static str); 1]>, Json<NftDetailResponse>), ApiError>
{
    let record = state
        .fault_store
        .record_by_id(&id)
        .await?
        .ok_or_else(|| {
            ApiError::new(ErrorCode::RecordNotFound, format!("Record not found: {}", id))
                .with_resource_id(id.clone())
        })?;

    let (metadata, metadata_error) = match &record.ipfs_link {
        Some(link) => match state.metadata.fetch_metadata(link).await {
            Some(document) => (Some(document), None),
            None => {
                warn!(nft_id = %id, "metadata document unreachable on all gateways");
                (None, Some("metadata document unreachable".to_string()))
            }
        },
        None => (None, None),
    };

    let fault_display = record.fault_label().map(fault_display_name);

    Ok((
        AppendHeaders([(header::CACHE_CONTROL, NFT_DETAIL_CACHE_CONTROL)]),
        Json(NftDetailResponse {
            record,
            fault_display,
            metadata,
            metadata_error,
        }),
    ))
}

/// GET /api/v1/vins/:vin/nft - First token id linked to a VIN.
pub async fn vin_to_nft(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VinToNftResponse>, ApiError> {
    let link = state
        .nft_links
        .link_by_vin(&vin)
        .await?
        .ok_or_else(|| {
            ApiError::new(ErrorCode::VinNotFound, format!("VIN not found: {}", vin))
                .with_resource_id(vin.clone())
        })?;

    let nft_id = link
        .first_token_id()
        .ok_or_else(|| not_found("NFT for VIN", &vin))?
        .to_string();

    Ok(Json(VinToNftResponse { nft_id }))
}
