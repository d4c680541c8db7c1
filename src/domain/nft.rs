//! NFT-to-VIN links.

use serde::{Deserialize, Serialize};

/// Link between a minted vehicle token and its real-world VIN.
///
/// `id` is the primary token identifier and matches
/// [`FaultRecord::unique_id`](crate::domain::FaultRecord); `nfts` holds the
/// full ordered token list for the VIN as a comma-separated string, the way
/// the store keeps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleNftLink {
    pub id: String,
    pub vin: String,
    #[serde(default)]
    pub nfts: Option<String>,
}

impl VehicleNftLink {
    /// Parsed token id list, in stored order, empty entries dropped.
    pub fn token_ids(&self) -> Vec<&str> {
        self.nfts
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// First associated token id, used by the front-end routing redirect.
    pub fn first_token_id(&self) -> Option<&str> {
        self.token_ids().first().copied()
    }
}
