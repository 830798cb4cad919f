//! Walker Constellation TLE Engine
//!
//! Derives circular Keplerian elements for every satellite of a Walker
//! constellation and encodes each one as a checksummed Two-Line Element set.
//!
//! # Walker Notation: T/P/F
//! - T = Total satellites (planes * satellites per plane)
//! - P = Number of orbital planes, spaced 360°/P in RAAN
//! - F = Phasing factor, plane p is shifted by p * F * 360°/T in mean anomaly
//!
//! # Pipeline
//!
//! ```text
//! ConstellationSpec -> DerivedConstants + SatelliteRecord[] -> TleRecord[]
//! ```
//!
//! Randomness (NORAD base id, launch designators) and the epoch are passed in
//! explicitly, so a seeded generator reproduces a run exactly.
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use walker_tle::{generate_constellation, ConstellationSpec, Epoch};
//!
//! let spec = ConstellationSpec::new(550.0, 53.0, 6, 4, 1, "demo");
//! let epoch = Epoch::from_ymd_hms(2026, 10, 19, 12, 0, 0).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let constellation = generate_constellation(&spec, epoch, &mut rng).unwrap();
//! assert_eq!(constellation.tles.len(), 24);
//! assert_eq!(constellation.tles[0].name, "DEMO001-01");
//! ```

use thiserror::Error;

pub mod constellation;
pub mod epoch;
pub mod generator;
pub mod launch;
pub mod report;
pub mod tle;
pub mod walker;

pub use constellation::ConstellationSpec;
pub use epoch::Epoch;
pub use generator::{
    generate_constellation, tle_file_content, Constellation, ConstellationSummary,
    GenerationContext,
};
pub use launch::LaunchInfo;
pub use report::{
    ground_positions, validation_report, ConstellationStatistics, Describe, GroundPoint,
    SummaryStatistics,
};
pub use tle::{checksum, encode, TleRecord};
pub use walker::{derive, DerivedConstants, SatelliteRecord};

/// Earth equatorial radius (km, WGS-84)
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Earth gravitational parameter μ (km³/s²)
pub const MU_EARTH: f64 = 398600.4418;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Minutes per day
pub const MINUTES_PER_DAY: f64 = 1440.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TleError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Field {field} value {value} does not fit in {width} columns")]
    FormatOverflow {
        field: &'static str,
        value: String,
        width: usize,
    },
}

pub type Result<T> = std::result::Result<T, TleError>;
