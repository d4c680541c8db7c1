//! In-memory aggregation over fault records.
//!
//! Every function here is pure: it takes row slices already fetched from the
//! store and computes a derived view. Nothing is cached; views are rebuilt
//! per request.
//!
//! VIN resolution rule (deliberately asymmetric, see DESIGN.md): global
//! totals count every record, vehicle-scoped views silently drop records
//! whose `unique_id` has no VIN link.

pub mod classifier;
pub mod fleet;

use std::collections::HashMap;

use crate::domain::{FaultRecord, VehicleNftLink};

pub use classifier::{
    classification_history, overall_accuracy, recent_activity, top_faults, ActivityEntry,
    ClassificationEvent, FaultTally,
};
pub use fleet::{
    critical_counts, daily_trend, fleet_overview, fleet_stats, sensor_averages, FleetStats,
    LastFault, MostCommonFault, TrendPoint, VehicleCriticalCounts, VehicleRollup,
};

/// Confidence above which a prediction counts as "correct" for the accuracy
/// heuristic. A placeholder for comparison against verified ground truth,
/// which this system does not have.
pub const ACCURACY_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Index from vehicle record id (token id) to VIN.
pub fn vin_index(links: &[VehicleNftLink]) -> HashMap<&str, &str> {
    links
        .iter()
        .map(|link| (link.id.as_str(), link.vin.as_str()))
        .collect()
}

/// Resolve a record to its VIN, if it has a link.
pub fn resolve_vin<'a>(record: &FaultRecord, index: &HashMap<&str, &'a str>) -> Option<&'a str> {
    index.get(record.unique_id.as_str()).copied()
}
