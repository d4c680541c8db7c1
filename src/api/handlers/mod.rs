//! REST API handlers, one module per endpoint family.

pub mod classifier;
pub mod fleet;
pub mod nfts;
pub mod records;
