//! Core domain types for the DriveLedger diagnostics API.
//!
//! - [`fault`] - fault-classification records produced by the external classifier
//! - [`nft`] - NFT-to-VIN links minted for each vehicle
//! - [`sensors`] - the fixed OBD sensor channel set and critical bounds

pub mod fault;
pub mod nft;
pub mod sensors;

pub use fault::{fault_display_name, FaultRecord};
pub use nft::VehicleNftLink;
pub use sensors::{is_critical, ChannelBounds, CRITICAL_BOUNDS, SENSOR_CHANNELS};
