//! Trait definitions for the diagnostics data stores.
//!
//! Handlers depend on these seams, never on the concrete PostgREST client,
//! so tests can substitute in-memory or mock implementations.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{FaultRecord, VehicleNftLink};

use super::Result;

/// Filter set for listing fault records.
///
/// All filters compose; results are always ordered newest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Exact vehicle record id (token id).
    pub vehicle_id: Option<String>,
    /// Inclusive ISO timestamp lower bound.
    pub start_date: Option<String>,
    /// Inclusive ISO timestamp upper bound.
    pub end_date: Option<String>,
    /// Case-insensitive substring over fault label and vehicle id.
    pub search: Option<String>,
    pub limit: Option<u32>,
    /// Drop rows the classifier left unlabeled.
    pub require_fault: bool,
}

impl RecordFilter {
    /// Filter for the newest `limit` labeled records.
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            require_fault: true,
            ..Self::default()
        }
    }

    /// Filter for every labeled record (aggregation call sites).
    pub fn labeled() -> Self {
        Self {
            require_fault: true,
            ..Self::default()
        }
    }
}

/// Read access to fault-classification records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FaultStore: Send + Sync {
    /// List records matching `filter`, newest first.
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<FaultRecord>>;

    /// Fetch a single record by vehicle record id.
    async fn record_by_id(&self, unique_id: &str) -> Result<Option<FaultRecord>>;
}

/// Read access to NFT-to-VIN links.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NftLinkStore: Send + Sync {
    /// List every link. Rows without a VIN are excluded.
    async fn list_links(&self) -> Result<Vec<VehicleNftLink>>;

    /// Fetch the link for a VIN.
    async fn link_by_vin(&self, vin: &str) -> Result<Option<VehicleNftLink>>;
}
