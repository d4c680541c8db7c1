//! Infrastructure: the hosted table store client and the IPFS gateway client.

pub mod error;
pub mod ipfs;
pub mod supabase;
pub mod traits;

pub use error::{Result, StoreError};
pub use ipfs::{GatewayConfig, IpfsGatewayClient, DEFAULT_GATEWAYS};
pub use supabase::{SupabaseConfig, SupabaseStore};
pub use traits::{FaultStore, NftLinkStore, RecordFilter};

#[cfg(test)]
pub use traits::{MockFaultStore, MockNftLinkStore};
