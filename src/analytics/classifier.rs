//! Classifier-facing aggregations: fault frequency, the accuracy heuristic,
//! and per-record history.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{FaultRecord, VehicleNftLink};

use super::{resolve_vin, vin_index, ACCURACY_CONFIDENCE_THRESHOLD};

/// Frequency and heuristic accuracy for one fault label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultTally {
    pub fault: String,
    pub count: u64,
    /// 100 x (records with confidence above the threshold) / count.
    /// A heuristic, not a comparison against verified faults.
    pub accuracy: f64,
}

/// One row of recent classifier activity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub timestamp: String,
    pub fault: String,
    pub confidence: f64,
    /// Threshold heuristic applied to this single record.
    pub accurate: bool,
}

/// One classification event joined with its resolved VIN.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEvent {
    pub vin: String,
    pub timestamp: String,
    pub predicted_fault: String,
    /// Always absent until verified fault data exists to compare against.
    pub actual_fault: Option<String>,
    pub confidence: f64,
    pub sensor_data: Option<Map<String, Value>>,
}

/// Top `n` faults by frequency, most frequent first.
///
/// Records without a fault label are skipped. Ties break on the fault name
/// so output order is stable.
pub fn top_faults(records: &[FaultRecord], n: usize) -> Vec<FaultTally> {
    let mut counts: HashMap<&str, (u64, u64)> = HashMap::new();
    for record in records {
        let Some(fault) = record.fault_label() else {
            continue;
        };
        let entry = counts.entry(fault).or_insert((0, 0));
        entry.0 += 1;
        if record.confidence_value() > ACCURACY_CONFIDENCE_THRESHOLD {
            entry.1 += 1;
        }
    }

    let mut tallies: Vec<FaultTally> = counts
        .into_iter()
        .map(|(fault, (count, correct))| FaultTally {
            fault: fault.to_string(),
            count,
            accuracy: correct as f64 / count as f64 * 100.0,
        })
        .collect();

    tallies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.fault.cmp(&b.fault)));
    tallies.truncate(n);
    tallies
}

/// Share of all labeled records above the confidence threshold, in [0, 100].
///
/// Returns 0 for an empty input.
pub fn overall_accuracy(records: &[FaultRecord]) -> f64 {
    let labeled: Vec<&FaultRecord> = records.iter().filter(|r| r.fault_label().is_some()).collect();
    if labeled.is_empty() {
        return 0.0;
    }
    let correct = labeled
        .iter()
        .filter(|r| r.confidence_value() > ACCURACY_CONFIDENCE_THRESHOLD)
        .count();
    correct as f64 / labeled.len() as f64 * 100.0
}

/// Newest `k` labeled records as activity rows.
///
/// Assumes `records` is already ordered newest-first, which is how the store
/// returns them.
pub fn recent_activity(records: &[FaultRecord], k: usize) -> Vec<ActivityEntry> {
    records
        .iter()
        .filter(|record| record.fault_label().is_some())
        .take(k)
        .map(|record| ActivityEntry {
            timestamp: record.timestamp.clone(),
            fault: record.fault_label().unwrap_or_default().to_string(),
            confidence: record.confidence_value(),
            accurate: record.confidence_value() > ACCURACY_CONFIDENCE_THRESHOLD,
        })
        .collect()
}

/// Per-record classification history joined with VINs.
///
/// Vehicle-scoped: records without a VIN link are dropped. Preserves the
/// input's newest-first order.
pub fn classification_history(
    records: &[FaultRecord],
    links: &[VehicleNftLink],
) -> Vec<ClassificationEvent> {
    let index = vin_index(links);
    records
        .iter()
        .filter_map(|record| {
            let vin = resolve_vin(record, &index)?;
            let fault = record.fault_label()?;
            Some(ClassificationEvent {
                vin: vin.to_string(),
                timestamp: record.timestamp.clone(),
                predicted_fault: fault.to_string(),
                actual_fault: None,
                confidence: record.confidence_value(),
                sensor_data: record.sensor_data.clone(),
            })
        })
        .collect()
}
