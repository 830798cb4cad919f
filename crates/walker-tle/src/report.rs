//! Plain-text validation report, distribution statistics and an
//! illustrative sub-satellite projection built from a run summary.

use crate::generator::ConstellationSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Human-readable report; labels and order are stable for diffing
pub fn validation_report(summary: &ConstellationSummary) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, summary);
    out
}

fn write_report(out: &mut String, s: &ConstellationSummary) -> std::fmt::Result {
    writeln!(out, "Constellation TLE Validation Report")?;
    writeln!(out, "{}", "=".repeat(42))?;
    writeln!(out)?;
    writeln!(out, "Constellation Parameters:")?;
    writeln!(out, "- Walker notation: {}", s.walker_notation())?;
    writeln!(out, "- Altitude: {} km", altitude_label(s.altitude_km))?;
    writeln!(out, "- Inclination: {} degrees", inclination_label(s.inclination_deg))?;
    writeln!(out, "- Eccentricity: {:.3}", s.eccentricity)?;
    writeln!(out, "- Mean motion: {:.8} rev/day", s.mean_motion)?;
    writeln!(out, "- Orbital period: {:.2} minutes", s.orbital_period)?;
    writeln!(out)?;
    writeln!(out, "Distribution Statistics:")?;
    writeln!(out, "- RAAN spacing: {:.4} degrees", s.raan_spacing)?;
    writeln!(out, "- In-plane spacing: {:.4} degrees", s.in_plane_spacing)?;
    writeln!(out, "- Walker phase unit: {:.4} degrees", s.phase_unit)?;
    writeln!(out, "- Number of unique RAAN values: {}", s.num_planes)?;
    writeln!(out)?;
    writeln!(out, "TLE Format Details:")?;
    writeln!(out, "- Epoch year: {:02}", s.epoch_year)?;
    writeln!(out, "- Epoch day: {:.8}", s.epoch_day)?;
    writeln!(
        out,
        "- NORAD ID range: {}-{} (Sequential)",
        s.base_norad_id, s.last_norad_id
    )?;
    writeln!(out, "- Launch info: Randomized for diversity")?;
    writeln!(out, "- Line ending: CR+LF (Windows compatible)")
}

/// Whole kilometres print without a decimal point
fn altitude_label(km: f64) -> String {
    if km.fract() == 0.0 {
        format!("{:.0}", km)
    } else {
        km.to_string()
    }
}

/// Always at least one decimal place
fn inclination_label(deg: f64) -> String {
    if deg.fract() == 0.0 {
        format!("{:.1}", deg)
    } else {
        deg.to_string()
    }
}

/// count / mean / sample std / min / quartiles / max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// `None` for an empty sample
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Distribution of the generated elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub raan: Option<Describe>,
    pub mean_anomaly: Option<Describe>,
    /// Plane number -> satellites in it
    pub satellites_per_plane: BTreeMap<u32, u32>,
}

impl SummaryStatistics {
    pub fn from_summary(summary: &ConstellationSummary) -> Self {
        let sats = &summary.satellite_data;
        let raans: Vec<f64> = sats.iter().map(|s| s.raan_deg).collect();
        let anomalies: Vec<f64> = sats.iter().map(|s| s.mean_anomaly_deg).collect();

        let mut satellites_per_plane = BTreeMap::new();
        for s in sats {
            *satellites_per_plane.entry(s.plane).or_insert(0) += 1;
        }

        Self {
            raan: Describe::of(&raans),
            mean_anomaly: Describe::of(&anomalies),
            satellites_per_plane,
        }
    }
}

/// Illustrative sub-satellite point, not a propagated ground track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundPoint {
    pub plane: u32,
    pub norad_id: u32,
    /// Degrees, (-180, 180]
    pub longitude: f64,
    /// Degrees
    pub latitude: f64,
}

/// lon = RAAN + M, lat = asin(sin i · sin M)
pub fn ground_positions(summary: &ConstellationSummary) -> Vec<GroundPoint> {
    let sin_i = summary.inclination_deg.to_radians().sin();
    summary
        .satellite_data
        .iter()
        .map(|s| {
            let mut longitude = (s.raan_deg + s.mean_anomaly_deg).rem_euclid(360.0);
            if longitude > 180.0 {
                longitude -= 360.0;
            }
            let latitude = (sin_i * s.mean_anomaly_deg.to_radians().sin()).asin().to_degrees();
            GroundPoint {
                plane: s.plane,
                norad_id: s.norad_id,
                longitude,
                latitude,
            }
        })
        .collect()
}

/// Statistics and ground points exported next to the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationStatistics {
    pub statistics: SummaryStatistics,
    pub ground_positions: Vec<GroundPoint>,
}

impl ConstellationStatistics {
    pub fn from_summary(summary: &ConstellationSummary) -> Self {
        Self {
            statistics: SummaryStatistics::from_summary(summary),
            ground_positions: ground_positions(summary),
        }
    }
}
