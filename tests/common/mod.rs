//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use driveledger_api::infra::{FaultStore, NftLinkStore, RecordFilter, Result};
use driveledger_api::server::AppState;
use driveledger_api::{FaultRecord, IpfsGatewayClient, VehicleNftLink};

/// Test VIN for the first fixture vehicle
pub const VIN_A: &str = "1HGBH41JXMN109186";
/// Test VIN for the second fixture vehicle
pub const VIN_B: &str = "2FMDK38C47BA12345";

/// Build a fault record fixture.
pub fn record(unique_id: &str, fault: &str, confidence: f64, timestamp: &str) -> FaultRecord {
    FaultRecord {
        unique_id: unique_id.to_string(),
        fault: Some(fault.to_string()),
        confidence: Some(confidence),
        timestamp: timestamp.to_string(),
        sensor_data: json!({
            "engine_load": 45.0,
            "coolant_temp": 95.0,
            "rpm": 2500.0,
        })
        .as_object()
        .cloned(),
        ipfs_link: None,
    }
}

/// Build an NFT link fixture.
pub fn link(id: &str, vin: &str, nfts: &str) -> VehicleNftLink {
    VehicleNftLink {
        id: id.to_string(),
        vin: vin.to_string(),
        nfts: Some(nfts.to_string()),
    }
}

/// In-memory store with the same filter semantics as the hosted store.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    pub records: Vec<FaultRecord>,
    pub links: Vec<VehicleNftLink>,
}

impl InMemoryStore {
    pub fn new(records: Vec<FaultRecord>, links: Vec<VehicleNftLink>) -> Self {
        Self { records, links }
    }
}

#[async_trait]
impl FaultStore for InMemoryStore {
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<FaultRecord>> {
        let mut rows: Vec<FaultRecord> = self
            .records
            .iter()
            .filter(|r| {
                filter
                    .vehicle_id
                    .as_ref()
                    .map(|id| &r.unique_id == id)
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .start_date
                    .as_ref()
                    .map(|start| r.timestamp.as_str() >= start.as_str())
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .end_date
                    .as_ref()
                    .map(|end| r.timestamp.as_str() <= end.as_str())
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .search
                    .as_ref()
                    .map(|term| {
                        let term = term.to_lowercase();
                        r.fault
                            .as_deref()
                            .unwrap_or_default()
                            .to_lowercase()
                            .contains(&term)
                            || r.unique_id.to_lowercase().contains(&term)
                    })
                    .unwrap_or(true)
            })
            .filter(|r| !filter.require_fault || r.fault.is_some())
            .cloned()
            .collect();

        // Newest first, like the hosted store's order=timestamp.desc.
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn record_by_id(&self, unique_id: &str) -> Result<Option<FaultRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.unique_id == unique_id)
            .cloned())
    }
}

#[async_trait]
impl NftLinkStore for InMemoryStore {
    async fn list_links(&self) -> Result<Vec<VehicleNftLink>> {
        Ok(self.links.clone())
    }

    async fn link_by_vin(&self, vin: &str) -> Result<Option<VehicleNftLink>> {
        Ok(self.links.iter().find(|l| l.vin == vin).cloned())
    }
}

/// Application state over an in-memory store, with no gateways configured so
/// metadata resolution degrades immediately.
pub fn test_state(store: InMemoryStore) -> AppState {
    test_state_with_gateways(store, vec![])
}

/// Application state over an in-memory store and an explicit gateway list.
pub fn test_state_with_gateways(store: InMemoryStore, gateways: Vec<String>) -> AppState {
    let store = Arc::new(store);
    let metadata = IpfsGatewayClient::new(driveledger_api::infra::GatewayConfig {
        gateways,
        timeout: std::time::Duration::from_millis(500),
    })
    .expect("gateway client");

    AppState {
        fault_store: store.clone(),
        nft_links: store,
        metadata: Arc::new(metadata),
    }
}
