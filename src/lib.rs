//! DriveLedger Diagnostics API Library
//!
//! HTTP service for a vehicle-diagnostics dashboard: queries a hosted
//! fault-classification store, aggregates fleet statistics in memory, and
//! resolves NFT metadata documents from public IPFS gateways.
//!
//! ## Modules
//!
//! - [`domain`] - Core domain types (fault records, NFT links, sensor tables)
//! - [`analytics`] - In-memory aggregation over fault records
//! - [`infra`] - Infrastructure implementations (PostgREST store, IPFS gateways)
//! - [`api`] - REST API routes
//! - [`server`] - HTTP server bootstrap
//! - [`telemetry`] - Logging and tracing setup

pub mod analytics;
pub mod api;
pub mod domain;
pub mod infra;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use domain::{FaultRecord, VehicleNftLink};

pub use infra::{
    FaultStore, IpfsGatewayClient, NftLinkStore, RecordFilter, Result, StoreError, SupabaseStore,
};
