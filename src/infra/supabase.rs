//! PostgREST client for the hosted Supabase store.
//!
//! Speaks plain HTTP to the `/rest/v1` interface; every filter in
//! [`RecordFilter`](super::RecordFilter) maps to one PostgREST query
//! parameter. No connection state beyond the shared `reqwest` client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{FaultRecord, VehicleNftLink};

use super::{FaultStore, NftLinkStore, RecordFilter, Result, StoreError};

/// Fault record table name.
const CAR_DATA_TABLE: &str = "car_data";
/// NFT link table name.
const CAR_NFTS_TABLE: &str = "car_nfts";

/// Store connection settings.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service or anon API key.
    pub key: String,
}

impl SupabaseConfig {
    /// Load from `SUPABASE_URL` / `SUPABASE_KEY`.
    ///
    /// Absence of either is a hard failure; the service cannot run without
    /// its store.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| StoreError::Configuration("SUPABASE_URL is not set".to_string()))?;
        let key = std::env::var("SUPABASE_KEY")
            .map_err(|_| StoreError::Configuration("SUPABASE_KEY is not set".to_string()))?;
        Ok(Self { url, key })
    }
}

/// PostgREST-backed implementation of the store traits.
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_base: String,
}

impl SupabaseStore {
    /// Build a store client. The API key is baked into default headers so
    /// every request carries it.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(&config.key)
            .map_err(|_| StoreError::Configuration("SUPABASE_KEY is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|_| StoreError::Configuration("SUPABASE_KEY is not a valid header value".to_string()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            rest_base: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    /// Issue a filtered row query and decode the result set.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.rest_base, table);
        debug!(table, params = query.len(), "querying store");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<T> = response.json().await?;
        Ok(rows)
    }

    /// Connectivity probe: one-row read against the fault table.
    pub async fn ping(&self) -> Result<()> {
        let _: Vec<FaultRecord> = self
            .get_rows(CAR_DATA_TABLE, &[("select", "*".to_string()), ("limit", "1".to_string())])
            .await?;
        Ok(())
    }
}

/// Translate a [`RecordFilter`] into PostgREST query parameters.
fn record_query(filter: &RecordFilter) -> Vec<(&'static str, String)> {
    let mut query = vec![("select", "*".to_string())];

    if let Some(id) = &filter.vehicle_id {
        query.push(("unique_id", format!("eq.{id}")));
    }
    if let Some(start) = &filter.start_date {
        query.push(("timestamp", format!("gte.{start}")));
    }
    if let Some(end) = &filter.end_date {
        query.push(("timestamp", format!("lte.{end}")));
    }
    if let Some(term) = &filter.search {
        query.push((
            "or",
            format!("(fault.ilike.*{term}*,unique_id.ilike.*{term}*)"),
        ));
    }
    if filter.require_fault {
        query.push(("fault", "not.is.null".to_string()));
    }

    query.push(("order", "timestamp.desc".to_string()));

    if let Some(limit) = filter.limit {
        query.push(("limit", limit.to_string()));
    }

    query
}

#[async_trait]
impl FaultStore for SupabaseStore {
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<FaultRecord>> {
        self.get_rows(CAR_DATA_TABLE, &record_query(filter)).await
    }

    async fn record_by_id(&self, unique_id: &str) -> Result<Option<FaultRecord>> {
        let query = [
            ("select", "*".to_string()),
            ("unique_id", format!("eq.{unique_id}")),
            ("limit", "1".to_string()),
        ];
        let mut rows: Vec<FaultRecord> = self.get_rows(CAR_DATA_TABLE, &query).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }
}

#[async_trait]
impl NftLinkStore for SupabaseStore {
    async fn list_links(&self) -> Result<Vec<VehicleNftLink>> {
        let query = [
            ("select", "*".to_string()),
            ("vin", "not.is.null".to_string()),
        ];
        self.get_rows(CAR_NFTS_TABLE, &query).await
    }

    async fn link_by_vin(&self, vin: &str) -> Result<Option<VehicleNftLink>> {
        let query = [
            ("select", "*".to_string()),
            ("vin", format!("eq.{vin}")),
            ("limit", "1".to_string()),
        ];
        let mut rows: Vec<VehicleNftLink> = self.get_rows(CAR_NFTS_TABLE, &query).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }
}
