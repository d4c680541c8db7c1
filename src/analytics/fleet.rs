//! Fleet-facing aggregations: per-vehicle rollups, fleet-wide statistics,
//! sensor channel averages, trend buckets, and critical-reading counts.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{is_critical, FaultRecord, VehicleNftLink, SENSOR_CHANNELS};

use super::{resolve_vin, vin_index};

/// The most recent fault observed for a vehicle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastFault {
    pub fault: String,
    pub timestamp: String,
    pub confidence: f64,
    pub sensor_data: Option<Map<String, Value>>,
}

/// Per-vehicle rollup for the fleet overview table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRollup {
    pub vin: String,
    pub fault_count: u64,
    pub last_fault: Option<LastFault>,
}

/// The single most frequent fault across the fleet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostCommonFault {
    pub fault: String,
    /// Share of all labeled records, formatted to one decimal place.
    pub percentage: String,
}

/// Headline fleet statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_vehicles: u64,
    pub most_common_fault: Option<MostCommonFault>,
    /// Average confidence x100, formatted to one decimal place.
    pub average_confidence: String,
}

/// One calendar-day bucket of fault activity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub day: String,
    pub count: u64,
    /// Mean confidence for the day, x100.
    pub avg_confidence: f64,
}

/// Per-vehicle counts of readings outside critical bounds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCriticalCounts {
    pub vin: String,
    /// Channel name -> number of records with a critical reading.
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

/// Per-vehicle rollups for every record that resolves to a VIN.
///
/// Single pass with a running timestamp max for `last_fault`; unresolved
/// records are dropped. Output is sorted by VIN.
pub fn fleet_overview(records: &[FaultRecord], links: &[VehicleNftLink]) -> Vec<VehicleRollup> {
    let index = vin_index(links);
    let mut vehicles: BTreeMap<&str, VehicleRollup> = BTreeMap::new();

    for record in records {
        let Some(vin) = resolve_vin(record, &index) else {
            continue;
        };
        let Some(fault) = record.fault_label() else {
            continue;
        };

        let last = LastFault {
            fault: fault.to_string(),
            timestamp: record.timestamp.clone(),
            confidence: record.confidence_value(),
            sensor_data: record.sensor_data.clone(),
        };

        match vehicles.get_mut(vin) {
            None => {
                vehicles.insert(
                    vin,
                    VehicleRollup {
                        vin: vin.to_string(),
                        fault_count: 1,
                        last_fault: Some(last),
                    },
                );
            }
            Some(rollup) => {
                rollup.fault_count += 1;
                let newer = rollup
                    .last_fault
                    .as_ref()
                    .map(|existing| record.timestamp > existing.timestamp)
                    .unwrap_or(true);
                if newer {
                    rollup.last_fault = Some(last);
                }
            }
        }
    }

    vehicles.into_values().collect()
}

/// Headline fleet statistics.
///
/// `total_vehicles` counts distinct VINs among the links; the fault and
/// confidence figures are global totals over every labeled record,
/// resolvable or not.
pub fn fleet_stats(records: &[FaultRecord], links: &[VehicleNftLink]) -> FleetStats {
    let vins: HashSet<&str> = links.iter().map(|link| link.vin.as_str()).collect();

    let labeled: Vec<&FaultRecord> = records.iter().filter(|r| r.fault_label().is_some()).collect();

    let most_common_fault = if labeled.is_empty() {
        None
    } else {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for record in &labeled {
            *counts.entry(record.fault_label().unwrap_or_default()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(fault, count)| MostCommonFault {
                fault: fault.to_string(),
                percentage: format!("{:.1}", count as f64 / labeled.len() as f64 * 100.0),
            })
    };

    let with_confidence: Vec<f64> = records
        .iter()
        .filter_map(|record| record.confidence)
        .collect();
    let average_confidence = if with_confidence.is_empty() {
        "0".to_string()
    } else {
        let avg = with_confidence.iter().sum::<f64>() / with_confidence.len() as f64;
        format!("{:.1}", avg * 100.0)
    };

    FleetStats {
        total_vehicles: vins.len() as u64,
        most_common_fault,
        average_confidence,
    }
}

/// Fleet-wide average per sensor channel, over defined numeric values only.
///
/// Every channel in [`SENSOR_CHANNELS`] is present in the output; a channel
/// with zero observations averages exactly 0.
pub fn sensor_averages(records: &[FaultRecord]) -> BTreeMap<&'static str, f64> {
    let mut averages = BTreeMap::new();
    for channel in SENSOR_CHANNELS {
        let values: Vec<f64> = records
            .iter()
            .filter_map(|record| record.sensor_value(channel))
            .collect();
        let avg = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        averages.insert(channel, avg);
    }
    averages
}

/// Daily fault-trend buckets, oldest day first.
///
/// Global totals: every labeled record counts, VIN-linked or not.
pub fn daily_trend(records: &[FaultRecord]) -> Vec<TrendPoint> {
    let mut days: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for record in records {
        if record.fault_label().is_none() {
            continue;
        }
        let entry = days.entry(record.day()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.confidence_value();
    }

    days.into_iter()
        .map(|(day, (count, total_confidence))| TrendPoint {
            day: day.to_string(),
            count,
            avg_confidence: total_confidence / count as f64 * 100.0,
        })
        .collect()
}

/// Per-vehicle, per-channel counts of critical readings.
///
/// Vehicle-scoped: unresolved records are dropped. Vehicles with no critical
/// readings still appear with an empty count map. Output is sorted by VIN.
pub fn critical_counts(
    records: &[FaultRecord],
    links: &[VehicleNftLink],
) -> Vec<VehicleCriticalCounts> {
    let index = vin_index(links);
    let mut vehicles: BTreeMap<&str, BTreeMap<String, u64>> = BTreeMap::new();

    for record in records {
        let Some(vin) = resolve_vin(record, &index) else {
            continue;
        };
        let counts = vehicles.entry(vin).or_default();
        for channel in SENSOR_CHANNELS {
            if let Some(value) = record.sensor_value(channel) {
                if is_critical(channel, value) {
                    *counts.entry(channel.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    vehicles
        .into_iter()
        .map(|(vin, counts)| {
            let total = counts.values().sum();
            VehicleCriticalCounts {
                vin: vin.to_string(),
                counts,
                total,
            }
        })
        .collect()
}
