//! Multi-gateway IPFS metadata resolution.
//!
//! Content-addressed documents are served by any public gateway, so a fetch
//! tries a fixed priority list and degrades to `None` instead of failing the
//! surrounding request. Worst-case wall clock is gateways x per-attempt
//! timeout; attempts are strictly sequential.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{Result, StoreError};

/// Default gateway priority order.
pub const DEFAULT_GATEWAYS: [&str; 4] = [
    "https://gateway.pinata.cloud",
    "https://ipfs.io",
    "https://cloudflare-ipfs.com",
    "https://dweb.link",
];

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Gateway client settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URLs, tried in order.
    pub gateways: Vec<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateways: DEFAULT_GATEWAYS.iter().map(|g| g.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Load from `IPFS_GATEWAYS` (comma-separated hosts or base URLs) and
    /// `IPFS_GATEWAY_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        let gateways = match std::env::var("IPFS_GATEWAYS") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(|g| {
                    if g.contains("://") {
                        g.trim_end_matches('/').to_string()
                    } else {
                        format!("https://{g}")
                    }
                })
                .collect(),
            _ => DEFAULT_GATEWAYS.iter().map(|g| g.to_string()).collect(),
        };

        let timeout = std::env::var("IPFS_GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self { gateways, timeout }
    }
}

/// Resolves content identifiers to JSON documents via public gateways.
pub struct IpfsGatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl IpfsGatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(StoreError::Http)?;
        Ok(Self { http, config })
    }

    pub fn gateways(&self) -> &[String] {
        &self.config.gateways
    }

    /// Reduce a raw identifier to a bare CID.
    ///
    /// Accepts a bare CID, an `ipfs://` URI, or a full gateway URL; strips
    /// any `scheme://` prefix and any `host/ipfs/` prefix.
    pub fn normalize_cid(raw: &str) -> &str {
        let rest = raw
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(raw);
        match rest.split_once("/ipfs/") {
            Some((_, cid)) => cid,
            None => rest,
        }
    }

    /// Fetch the metadata document for `raw`, trying each gateway in order.
    ///
    /// HTTP 429, any other non-success status, and transport errors all mean
    /// "try the next gateway". Returns `None` once the list is exhausted;
    /// never an error, so callers degrade instead of failing the request.
    pub async fn fetch_metadata(&self, raw: &str) -> Option<serde_json::Value> {
        let cid = Self::normalize_cid(raw);

        for gateway in &self.config.gateways {
            let url = format!("{gateway}/ipfs/{cid}");
            match self.http.get(&url).timeout(self.config.timeout).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json().await {
                        Ok(document) => {
                            debug!(%gateway, %cid, "resolved metadata document");
                            return Some(document);
                        }
                        Err(error) => {
                            warn!(%gateway, %cid, %error, "gateway returned unparseable body");
                        }
                    }
                }
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    warn!(%gateway, %cid, "gateway rate limited, trying next");
                }
                Ok(response) => {
                    warn!(%gateway, %cid, status = %response.status(), "gateway returned non-success");
                }
                Err(error) => {
                    warn!(%gateway, %cid, %error, "gateway request failed");
                }
            }
        }

        debug!(%cid, "all gateways exhausted");
        None
    }
}
