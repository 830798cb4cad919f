//! Walker Delta element derivation
//!
//! Circular Keplerian model: eccentricity and argument of perigee are zero for
//! every satellite, semi-major axis and mean motion come from altitude alone.
//!
//! For plane p and slot s (both 0-indexed):
//! - RAAN(p)  = p * 360°/P  (mod 360)
//! - phase(p) = p * F * 360°/T  (mod 360)
//! - M(p, s)  = s * 360°/S + phase(p)  (mod 360)

use crate::constellation::ConstellationSpec;
use crate::epoch::Epoch;
use crate::launch::{draw_norad_base, LaunchInfo};
use crate::{Result, TleError, EARTH_RADIUS_KM, MINUTES_PER_DAY, MU_EARTH, SECONDS_PER_DAY};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Circular orbit model
pub const ECCENTRICITY: f64 = 0.0;
pub const ARG_PERIGEE_DEG: f64 = 0.0;

/// Values shared by every satellite of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedConstants {
    pub semi_major_axis_km: f64,
    pub mean_motion_rev_per_day: f64,
    pub orbital_period_min: f64,
    pub raan_spacing_deg: f64,
    pub in_plane_spacing_deg: f64,
    /// F * 360° / T
    pub phase_unit_deg: f64,
    pub epoch: Epoch,
}

impl DerivedConstants {
    pub fn compute(spec: &ConstellationSpec, epoch: Epoch) -> Result<Self> {
        spec.validate()?;

        let semi_major_axis_km = EARTH_RADIUS_KM + spec.altitude_km;
        let mean_motion_rev_per_day = mean_motion_from_sma(semi_major_axis_km)?;
        let total = spec.total_satellites() as f64;

        Ok(Self {
            semi_major_axis_km,
            mean_motion_rev_per_day,
            orbital_period_min: MINUTES_PER_DAY / mean_motion_rev_per_day,
            raan_spacing_deg: 360.0 / spec.num_planes as f64,
            in_plane_spacing_deg: 360.0 / spec.sats_per_plane as f64,
            phase_unit_deg: (spec.walker_f as f64 * 360.0) / total,
            epoch,
        })
    }

    /// RAAN of plane `plane` (0-indexed)
    pub fn raan_deg(&self, plane: u32) -> f64 {
        (plane as f64 * self.raan_spacing_deg).rem_euclid(360.0)
    }

    /// Walker phase offset of plane `plane` (0-indexed)
    pub fn phase_offset_deg(&self, plane: u32) -> f64 {
        (plane as f64 * self.phase_unit_deg).rem_euclid(360.0)
    }

    /// Mean anomaly of slot `slot` in plane `plane` (both 0-indexed)
    pub fn mean_anomaly_deg(&self, plane: u32, slot: u32) -> f64 {
        (slot as f64 * self.in_plane_spacing_deg + self.phase_offset_deg(plane)).rem_euclid(360.0)
    }
}

/// Kepler's third law: n = sqrt(μ/a³), converted to rev/day
pub fn mean_motion_from_sma(sma_km: f64) -> Result<f64> {
    if !(sma_km.is_finite() && sma_km > 0.0) {
        return Err(TleError::InvalidParameter(format!(
            "semi-major axis {} km is not positive",
            sma_km
        )));
    }
    let n_rad_s = (MU_EARTH / sma_km.powi(3)).sqrt();
    Ok(n_rad_s * SECONDS_PER_DAY / (2.0 * PI))
}

/// One satellite's derived elements and identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteRecord {
    /// 1-based plane number
    pub plane: u32,
    /// 1-based slot within the plane
    pub slot: u32,
    pub norad_id: u32,
    pub raan_deg: f64,
    pub mean_anomaly_deg: f64,
    pub name: String,
    pub launch: LaunchInfo,
}

/// Derive the shared constants and every satellite, plane-major then slot.
///
/// The NORAD base is drawn once; launch designators once per satellite.
pub fn derive<R: Rng + ?Sized>(
    spec: &ConstellationSpec,
    epoch: Epoch,
    rng: &mut R,
) -> Result<(DerivedConstants, Vec<SatelliteRecord>)> {
    let constants = DerivedConstants::compute(spec, epoch)?;
    let base_norad_id = draw_norad_base(rng, spec.total_satellites());
    let clean_name = crate::tle::sanitize_name(&spec.name);

    let mut records = Vec::with_capacity(spec.total_satellites() as usize);
    let mut counter: u32 = 0;

    for plane in 0..spec.num_planes {
        let raan_deg = constants.raan_deg(plane);
        debug!(
            plane = plane + 1,
            raan_deg,
            phase_offset_deg = constants.phase_offset_deg(plane),
            "deriving plane"
        );

        for slot in 0..spec.sats_per_plane {
            records.push(SatelliteRecord {
                plane: plane + 1,
                slot: slot + 1,
                norad_id: base_norad_id + counter,
                raan_deg,
                mean_anomaly_deg: constants.mean_anomaly_deg(plane, slot),
                name: crate::tle::satellite_name(&clean_name, plane + 1, slot + 1),
                launch: LaunchInfo::draw(rng, epoch.calendar_year),
            });
            counter += 1;
        }
    }

    Ok((constants, records))
}
