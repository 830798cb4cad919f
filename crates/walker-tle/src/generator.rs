//! Constellation generation run
//!
//! `generate_constellation` is the single entry point: it validates the
//! spec, derives every satellite, encodes all of them, and only then returns.
//! A run either yields every TLE or an error.

use crate::constellation::ConstellationSpec;
use crate::epoch::Epoch;
use crate::tle::{encode, sanitize_name, TleRecord};
use crate::walker::{derive, DerivedConstants, SatelliteRecord, ECCENTRICITY};
use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Line terminator expected by the downstream analysis tool
pub const LINE_ENDING: &str = "\r\n";

/// Epoch and random source for one or more runs
#[derive(Debug)]
pub struct GenerationContext {
    pub epoch: Epoch,
    rng: StdRng,
}

impl GenerationContext {
    /// Current time and an OS-seeded generator
    pub fn from_entropy() -> Self {
        Self {
            epoch: Epoch::now(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible context
    pub fn seeded(seed: u64, epoch: Epoch) -> Self {
        Self {
            epoch,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn generate(&mut self, spec: &ConstellationSpec) -> Result<Constellation> {
        generate_constellation(spec, self.epoch, &mut self.rng)
    }
}

/// Parameters and per-satellite table of one run, for reports and statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationSummary {
    pub name: String,
    pub total_satellites: u32,
    pub num_planes: u32,
    pub sats_per_plane: u32,
    pub walker_f: u32,
    pub altitude_km: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
    pub semi_major_axis_km: f64,
    pub mean_motion: f64,
    /// Minutes
    pub orbital_period: f64,
    pub raan_spacing: f64,
    pub in_plane_spacing: f64,
    pub phase_unit: f64,
    pub epoch_year: u8,
    pub epoch_day: f64,
    pub base_norad_id: u32,
    pub last_norad_id: u32,
    pub satellite_data: Vec<SatelliteRecord>,
}

impl ConstellationSummary {
    fn new(
        spec: &ConstellationSpec,
        constants: &DerivedConstants,
        satellites: Vec<SatelliteRecord>,
    ) -> Self {
        let base_norad_id = satellites.first().map_or(0, |s| s.norad_id);
        let last_norad_id = satellites.last().map_or(0, |s| s.norad_id);

        Self {
            name: spec.name.clone(),
            total_satellites: spec.total_satellites(),
            num_planes: spec.num_planes,
            sats_per_plane: spec.sats_per_plane,
            walker_f: spec.walker_f,
            altitude_km: spec.altitude_km,
            inclination_deg: spec.inclination_deg,
            eccentricity: ECCENTRICITY,
            semi_major_axis_km: constants.semi_major_axis_km,
            mean_motion: constants.mean_motion_rev_per_day,
            orbital_period: constants.orbital_period_min,
            raan_spacing: constants.raan_spacing_deg,
            in_plane_spacing: constants.in_plane_spacing_deg,
            phase_unit: constants.phase_unit_deg,
            epoch_year: constants.epoch.year,
            epoch_day: constants.epoch.day,
            base_norad_id,
            last_norad_id,
            satellite_data: satellites,
        }
    }

    pub fn walker_notation(&self) -> String {
        format!("{}/{}/{}", self.total_satellites, self.num_planes, self.walker_f)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Output of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    /// Plane-major, slot-minor
    pub tles: Vec<TleRecord>,
    pub summary: ConstellationSummary,
}

impl Constellation {
    /// Name, line 1, line 2 for every satellite, flattened
    pub fn tle_lines(&self) -> Vec<&str> {
        self.tles.iter().flat_map(|t| t.lines()).collect()
    }

    /// Whole TLE file with CR+LF line endings
    pub fn tle_file_content(&self) -> String {
        tle_file_content(&self.tle_lines())
    }

    /// `<NAME>_<T>sats.txt`
    pub fn file_name(&self) -> String {
        format!("{}_{}sats.txt", self.file_stem(), self.summary.total_satellites)
    }

    pub fn file_stem(&self) -> String {
        let stem = sanitize_name(&self.summary.name);
        if stem.is_empty() {
            crate::constellation::DEFAULT_NAME.to_string()
        } else {
            stem
        }
    }
}

/// Generate every satellite's TLE for `spec` at `epoch`
pub fn generate_constellation<R: Rng + ?Sized>(
    spec: &ConstellationSpec,
    epoch: Epoch,
    rng: &mut R,
) -> Result<Constellation> {
    info!(
        walker = %spec.walker_notation(),
        altitude_km = spec.altitude_km,
        inclination_deg = spec.inclination_deg,
        "generating constellation {}",
        spec.name
    );

    let (constants, satellites) = derive(spec, epoch, rng)?;
    debug!(
        mean_motion = constants.mean_motion_rev_per_day,
        period_min = constants.orbital_period_min,
        epoch = %epoch.format_tle(),
        "derived constants"
    );

    let tles = satellites
        .iter()
        .map(|sat| encode(sat, &constants, spec))
        .collect::<Result<Vec<_>>>()?;

    let summary = ConstellationSummary::new(spec, &constants, satellites);
    info!(
        satellites = tles.len(),
        norad_first = summary.base_norad_id,
        norad_last = summary.last_norad_id,
        "constellation encoded"
    );

    Ok(Constellation { tles, summary })
}

/// Join lines with CR+LF, including after the last line
pub fn tle_file_content<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 2).sum());
    for line in lines {
        out.push_str(line.as_ref());
        out.push_str(LINE_ENDING);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle::{checksum, LINE_LEN};
    use crate::TleError;
    use proptest::prelude::*;
    use std::collections::{BTreeSet, HashSet};

    fn epoch() -> Epoch {
        Epoch::from_ymd_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_reference_shell_generation() {
        let spec = ConstellationSpec::new(550.0, 53.0, 72, 22, 22, "starlink");
        let mut ctx = GenerationContext::seeded(2024, epoch());
        let c = ctx.generate(&spec).unwrap();

        assert_eq!(c.tles.len(), 1584);
        assert_eq!(c.summary.total_satellites, 1584);
        assert_eq!(c.summary.raan_spacing, 5.0);
        assert_eq!(c.summary.walker_notation(), "1584/72/22");
        assert_eq!(c.summary.last_norad_id - c.summary.base_norad_id, 1583);
        assert_eq!(c.tles[0].name, "STARLINK001-01");
        assert_eq!(c.tles[1583].name, "STARLINK072-22");
        assert!(c.tles.iter().all(TleRecord::verify));
    }

    #[test]
    fn test_tle_file_content_crlf() {
        assert_eq!(tle_file_content(&["A", "B"]), "A\r\nB\r\n");
        assert_eq!(tle_file_content::<&str>(&[]), "");

        let spec = ConstellationSpec::new(550.0, 53.0, 2, 2, 1, "x");
        let c = GenerationContext::seeded(1, epoch()).generate(&spec).unwrap();
        let content = c.tle_file_content();

        assert!(content.ends_with("\r\n"));
        assert_eq!(content.matches("\r\n").count(), 12);
        assert_eq!(content.matches('\n').count(), 12);
        let lines: Vec<&str> = content.split("\r\n").collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "X001-01");
        assert_eq!(lines[12], "");
    }

    #[test]
    fn test_file_name() {
        let spec = ConstellationSpec::new(550.0, 53.0, 3, 4, 1, "Orion Mesh!");
        let c = GenerationContext::seeded(1, epoch()).generate(&spec).unwrap();
        assert_eq!(c.file_name(), "ORIONMESH_12sats.txt");

        let spec = ConstellationSpec::new(550.0, 53.0, 1, 1, 0, "???");
        let c = GenerationContext::seeded(1, epoch()).generate(&spec).unwrap();
        assert_eq!(c.file_name(), "CONSTELLATION_1sats.txt");
        assert_eq!(c.tles[0].name, "001-01");
    }

    #[test]
    fn test_invalid_spec_produces_nothing() {
        let spec = ConstellationSpec::new(-7000.0, 53.0, 2, 2, 0, "x");
        let err = GenerationContext::seeded(1, epoch()).generate(&spec).unwrap_err();
        assert!(matches!(err, TleError::InvalidParameter(_)));
    }

    #[test]
    fn test_overflow_fails_whole_run() {
        // 200 km semi-major axis: positive, but ~3000 rev/day
        let spec = ConstellationSpec::new(200.0 - crate::EARTH_RADIUS_KM, 53.0, 2, 2, 0, "x");
        let err = GenerationContext::seeded(1, epoch()).generate(&spec).unwrap_err();
        assert!(matches!(err, TleError::FormatOverflow { field: "mean_motion", .. }));
    }

    #[test]
    fn test_large_run_fits_norad_field_for_any_seed() {
        let spec = ConstellationSpec::new(550.0, 53.0, 600, 100, 1, "big");
        for seed in 0..6 {
            let c = GenerationContext::seeded(seed, epoch()).generate(&spec).unwrap();
            assert_eq!(c.tles.len(), 60_000);
            assert!(c.summary.last_norad_id <= 99_999);
        }
    }

    #[test]
    fn test_oversized_run_is_invalid_parameter() {
        let spec = ConstellationSpec::new(550.0, 53.0, 1000, 100, 1, "big");
        let err = GenerationContext::seeded(0, epoch()).generate(&spec).unwrap_err();
        assert!(matches!(err, TleError::InvalidParameter(_)));
    }

    #[test]
    fn test_summary_json() {
        let spec = ConstellationSpec::new(550.0, 53.0, 2, 3, 1, "json");
        let c = GenerationContext::seeded(8, epoch()).generate(&spec).unwrap();
        let json = c.summary.to_json().unwrap();
        let back: ConstellationSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.satellite_data.len(), 6);
        assert_eq!(back.walker_notation(), "6/2/1");
    }

    #[test]
    fn test_same_seed_same_output() {
        let spec = ConstellationSpec::new(800.0, 70.0, 5, 5, 2, "rep");
        let a = GenerationContext::seeded(77, epoch()).generate(&spec).unwrap();
        let b = GenerationContext::seeded(77, epoch()).generate(&spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_stream_advances_across_runs() {
        let spec = ConstellationSpec::new(800.0, 70.0, 5, 5, 2, "rep");
        let mut ctx = GenerationContext::seeded(77, epoch());
        let first = ctx.generate(&spec).unwrap();
        let second = ctx.generate(&spec).unwrap();
        assert_ne!(first.tles, second.tles);
        assert_eq!(first, GenerationContext::seeded(77, epoch()).generate(&spec).unwrap());
    }

    fn spec_strategy() -> impl Strategy<Value = ConstellationSpec> {
        (
            200.0f64..36_000.0,
            0.0f64..=180.0,
            1u32..=40,
            1u32..=30,
            0u32..=1200,
            "[A-Za-z0-9 _.-]{0,12}",
        )
            .prop_map(|(alt, inc, planes, spp, f, name)| {
                ConstellationSpec::new(alt, inc, planes, spp, f, &name)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_satellite_count(spec in spec_strategy(), seed in any::<u64>()) {
            let c = generate_constellation(&spec, epoch(), &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(c.tles.len() as u32, spec.num_planes * spec.sats_per_plane);
            prop_assert_eq!(c.tle_lines().len(), c.tles.len() * 3);
        }

        #[test]
        fn prop_norad_ids_contiguous(spec in spec_strategy(), seed in any::<u64>()) {
            let c = generate_constellation(&spec, epoch(), &mut StdRng::seed_from_u64(seed)).unwrap();
            let base = c.tles[0].norad_id;
            for (i, t) in c.tles.iter().enumerate() {
                prop_assert_eq!(t.norad_id, base + i as u32);
            }
            let unique: HashSet<u32> = c.tles.iter().map(|t| t.norad_id).collect();
            prop_assert_eq!(unique.len(), c.tles.len());
        }

        #[test]
        fn prop_lines_checksummed(spec in spec_strategy(), seed in any::<u64>()) {
            let c = generate_constellation(&spec, epoch(), &mut StdRng::seed_from_u64(seed)).unwrap();
            for t in &c.tles {
                for line in [&t.line1, &t.line2] {
                    prop_assert_eq!(line.len(), LINE_LEN);
                    let last = line.chars().last().and_then(|ch| ch.to_digit(10));
                    prop_assert_eq!(last, Some(checksum(line) as u32));
                }
            }
        }

        #[test]
        fn prop_raan_per_plane(spec in spec_strategy(), seed in any::<u64>()) {
            let c = generate_constellation(&spec, epoch(), &mut StdRng::seed_from_u64(seed)).unwrap();
            let sats = &c.summary.satellite_data;
            for plane in sats.chunks(spec.sats_per_plane as usize) {
                let raans: HashSet<u64> = plane.iter().map(|s| s.raan_deg.to_bits()).collect();
                prop_assert_eq!(raans.len(), 1);
            }
            let distinct: BTreeSet<u64> = sats.iter().map(|s| s.raan_deg.to_bits()).collect();
            prop_assert_eq!(distinct.len() as u32, spec.num_planes);
            let step = 360.0 / spec.num_planes as f64;
            for (p, plane) in sats.chunks(spec.sats_per_plane as usize).enumerate() {
                let expected = (p as f64 * step) % 360.0;
                prop_assert!((plane[0].raan_deg - expected).abs() < 1e-9);
            }
        }
    }
}
