//! Constellation-level input parameters

use crate::launch::MAX_SATELLITES;
use crate::{Result, TleError, EARTH_RADIUS_KM};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALTITUDE_KM: f64 = 550.0;
pub const DEFAULT_INCLINATION_DEG: f64 = 53.0;
pub const DEFAULT_PLANES: u32 = 72;
pub const DEFAULT_SATS_PER_PLANE: u32 = 22;
pub const DEFAULT_WALKER_F: u32 = 22;
pub const DEFAULT_NAME: &str = "CONSTELLATION";

/// Commonly flown inclinations (deg)
const COMMON_INCLINATIONS: [f64; 7] = [28.5, 45.0, 53.0, 63.4, 70.0, 85.0, 97.4];

const PLANE_OPTIONS: [u32; 14] = [6, 8, 12, 18, 24, 36, 48, 72, 96, 120, 144, 180, 216, 288];

const NAME_PREFIXES: [&str; 23] = [
    "ALPHA", "BETA", "GAMMA", "DELTA", "EPSILON", "ZETA", "THETA", "LAMBDA",
    "SIGMA", "OMEGA", "PHOENIX", "ORION", "VEGA", "NOVA", "STELLAR", "COSMIC",
    "NEXUS", "QUANTUM", "PULSAR", "NEBULA", "ASTRO", "CELESTIAL", "ORBITAL",
];

const NAME_SUFFIXES: [&str; 13] = [
    "SAT", "NET", "LINK", "GRID", "MESH", "CONNECT", "COMM", "SYSTEM",
    "CONSTELLATION", "NETWORK", "CLUSTER", "ARRAY", "FLEET",
];

/// Walker constellation parameters (immutable input to a generation run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationSpec {
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub num_planes: u32,
    pub sats_per_plane: u32,
    /// Walker phasing factor F
    pub walker_f: u32,
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Default for ConstellationSpec {
    fn default() -> Self {
        Self {
            altitude_km: DEFAULT_ALTITUDE_KM,
            inclination_deg: DEFAULT_INCLINATION_DEG,
            num_planes: DEFAULT_PLANES,
            sats_per_plane: DEFAULT_SATS_PER_PLANE,
            walker_f: DEFAULT_WALKER_F,
            name: default_name(),
        }
    }
}

impl ConstellationSpec {
    pub fn new(
        altitude_km: f64,
        inclination_deg: f64,
        num_planes: u32,
        sats_per_plane: u32,
        walker_f: u32,
        name: &str,
    ) -> Self {
        Self {
            altitude_km,
            inclination_deg,
            num_planes,
            sats_per_plane,
            walker_f,
            name: name.to_string(),
        }
    }

    /// Random but realistic LEO parameters with a random name
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let altitude_km = (rng.gen_range(40..=120) * 10) as f64;
        let inclination_deg = *COMMON_INCLINATIONS
            .choose(rng)
            .unwrap_or(&DEFAULT_INCLINATION_DEG);
        let num_planes = *PLANE_OPTIONS.choose(rng).unwrap_or(&DEFAULT_PLANES);
        let sats_per_plane = rng.gen_range(1..=20);
        let total = num_planes * sats_per_plane;
        let walker_f = rng.gen_range(1..=total.min(500));

        Self {
            altitude_km,
            inclination_deg,
            num_planes,
            sats_per_plane,
            walker_f,
            name: random_constellation_name(rng),
        }
    }

    /// Saturates instead of overflowing; `validate` rejects such counts
    pub fn total_satellites(&self) -> u32 {
        self.num_planes.saturating_mul(self.sats_per_plane)
    }

    /// `T/P/F`
    pub fn walker_notation(&self) -> String {
        format!("{}/{}/{}", self.total_satellites(), self.num_planes, self.walker_f)
    }

    /// Reject non-physical input before anything is derived
    pub fn validate(&self) -> Result<()> {
        if !self.altitude_km.is_finite() || self.altitude_km <= -EARTH_RADIUS_KM {
            return Err(TleError::InvalidParameter(format!(
                "altitude {} km gives a non-positive semi-major axis",
                self.altitude_km
            )));
        }
        if !self.inclination_deg.is_finite() || !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(TleError::InvalidParameter(format!(
                "inclination {}° outside 0-180°",
                self.inclination_deg
            )));
        }
        if self.num_planes == 0 {
            return Err(TleError::InvalidParameter("num_planes must be at least 1".into()));
        }
        if self.sats_per_plane == 0 {
            return Err(TleError::InvalidParameter(
                "sats_per_plane must be at least 1".into(),
            ));
        }
        let total = self.num_planes as u64 * self.sats_per_plane as u64;
        if total > MAX_SATELLITES as u64 {
            return Err(TleError::InvalidParameter(format!(
                "{} planes x {} satellites = {} exceeds the {} five-digit NORAD ids available",
                self.num_planes, self.sats_per_plane, total, MAX_SATELLITES
            )));
        }
        Ok(())
    }
}

/// `PREFIX_SUFFIX_N`, e.g. `ORION_MESH_417`
pub fn random_constellation_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let prefix = NAME_PREFIXES.choose(rng).copied().unwrap_or("ALPHA");
    let suffix = NAME_SUFFIXES.choose(rng).copied().unwrap_or("SAT");
    let number = rng.gen_range(1..=999);
    format!("{}_{}_{}", prefix, suffix, number)
}
