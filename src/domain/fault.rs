//! Fault-classification records.
//!
//! One row per diagnostic snapshot, written by the external classification
//! pipeline. This service only ever reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One vehicle diagnostic snapshot with a predicted fault label.
///
/// `unique_id` is the vehicle record identifier, which doubles as the NFT
/// token id minted for the snapshot. `fault` and `confidence` are nullable in
/// the store; consumers skip rows without a label rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultRecord {
    pub unique_id: String,
    #[serde(default)]
    pub fault: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// ISO-8601 UTC timestamp as stored (`T`- or space-separated).
    pub timestamp: String,
    #[serde(default)]
    pub sensor_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_link: Option<String>,
}

impl FaultRecord {
    /// Predicted fault label, if the classifier produced one.
    pub fn fault_label(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Classifier confidence in [0, 1], defaulting to 0 for null rows.
    pub fn confidence_value(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// Numeric reading for a named sensor channel, if present and numeric.
    pub fn sensor_value(&self, channel: &str) -> Option<f64> {
        self.sensor_data
            .as_ref()
            .and_then(|data| data.get(channel))
            .and_then(Value::as_f64)
    }

    /// Calendar day of the timestamp: the prefix before the first `T` or
    /// space. Timestamps appear in both forms across store versions.
    pub fn day(&self) -> &str {
        self.timestamp
            .split(|c| c == 'T' || c == ' ')
            .next()
            .unwrap_or(&self.timestamp)
    }
}

/// Human-readable form of a snake_case fault label, e.g.
/// `coolant_overheat` -> `Coolant Overheat`.
pub fn fault_display_name(fault: &str) -> String {
    fault
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
