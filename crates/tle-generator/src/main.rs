//! Walker Constellation TLE Generator CLI
//!
//! Generates a TLE file and validation report for a Walker constellation.
//!
//! Usage:
//!   generate-tle --altitude 550 --inclination 53 --planes 72 \
//!                --sats-per-plane 22 --walker-f 22 --name STARLINK \
//!                --output-dir out --json
//!
//!   generate-tle --spec data/shells/polar.json --seed 42
//!   generate-tle --random

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use walker_tle::constellation::{
    DEFAULT_ALTITUDE_KM, DEFAULT_INCLINATION_DEG, DEFAULT_NAME, DEFAULT_PLANES,
    DEFAULT_SATS_PER_PLANE, DEFAULT_WALKER_F,
};
use walker_tle::{ConstellationSpec, Describe, Epoch, GenerationContext, SummaryStatistics};

mod output;

#[derive(Parser, Debug)]
#[command(
    name = "generate-tle",
    about = "Generate Two-Line Element sets for a Walker constellation"
)]
struct Args {
    /// Orbit altitude above the equatorial radius (km)
    #[arg(short, long, default_value_t = DEFAULT_ALTITUDE_KM)]
    altitude: f64,

    /// Orbit inclination (degrees, 0-180)
    #[arg(short, long, default_value_t = DEFAULT_INCLINATION_DEG)]
    inclination: f64,

    /// Number of orbital planes (P)
    #[arg(short, long, default_value_t = DEFAULT_PLANES)]
    planes: u32,

    /// Satellites in each plane
    #[arg(short, long, default_value_t = DEFAULT_SATS_PER_PLANE)]
    sats_per_plane: u32,

    /// Walker phasing factor (F)
    #[arg(short = 'f', long, default_value_t = DEFAULT_WALKER_F)]
    walker_f: u32,

    /// Constellation name used for satellite names and output files
    #[arg(short, long, default_value = DEFAULT_NAME)]
    name: String,

    /// Read parameters from a JSON file instead of the flags above
    #[arg(long, conflicts_with = "random")]
    spec: Option<PathBuf>,

    /// Draw random realistic parameters and a random name
    #[arg(long)]
    random: bool,

    /// Seed for reproducible identifiers and launch designators
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the TLE file, report and JSON summary
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the run summary and statistics as JSON
    #[arg(long)]
    json: bool,

    /// Log RAAN and mean anomaly distributions and per-plane counts
    #[arg(long)]
    stats: bool,

    /// Number of satellites to log as a preview
    #[arg(long, default_value_t = 5)]
    preview: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn flag_spec(&self) -> ConstellationSpec {
        ConstellationSpec::new(
            self.altitude,
            self.inclination,
            self.planes,
            self.sats_per_plane,
            self.walker_f,
            &self.name,
        )
    }
}

fn load_spec(path: &Path) -> Result<ConstellationSpec> {
    let file = File::open(path).with_context(|| format!("opening spec file {:?}", path))?;
    let spec = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing spec file {:?}", path))?;
    Ok(spec)
}

fn describe_line(label: &str, d: &Option<Describe>) -> String {
    match d {
        Some(d) => format!(
            "{:<13} mean {:>7.2}  std {:>7.2}  min {:>7.2}  median {:>7.2}  max {:>7.2}",
            label, d.mean, d.std, d.min, d.median, d.max
        ),
        None => format!("{:<13} no data", label),
    }
}

fn log_statistics(stats: &SummaryStatistics) {
    info!("\nStatistics:");
    info!("  {}", describe_line("RAAN", &stats.raan));
    info!("  {}", describe_line("Mean anomaly", &stats.mean_anomaly));
    for (plane, count) in &stats.satellites_per_plane {
        debug!("  plane {:03}: {} satellites", plane, count);
    }
    let min = stats.satellites_per_plane.values().min().copied().unwrap_or(0);
    let max = stats.satellites_per_plane.values().max().copied().unwrap_or(0);
    info!(
        "  {} planes, {}-{} satellites per plane",
        stats.satellites_per_plane.len(),
        min,
        max
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("Walker Constellation TLE Generator");
    info!("{}", "=".repeat(60));

    let mut ctx = match args.seed {
        Some(seed) => GenerationContext::seeded(seed, Epoch::now()),
        None => GenerationContext::from_entropy(),
    };

    let spec = if let Some(path) = &args.spec {
        load_spec(path)?
    } else if args.random {
        ConstellationSpec::random(ctx.rng_mut())
    } else {
        args.flag_spec()
    };

    info!(
        "{} | {} | {} km | {}°",
        spec.name,
        spec.walker_notation(),
        spec.altitude_km,
        spec.inclination_deg
    );

    let constellation = ctx
        .generate(&spec)
        .with_context(|| format!("generating constellation {}", spec.name))?;

    info!("\nPreview (first {} satellites):", args.preview);
    for tle in constellation.tles.iter().take(args.preview) {
        for line in tle.lines() {
            info!("  {}", line);
        }
    }

    if args.stats {
        log_statistics(&SummaryStatistics::from_summary(&constellation.summary));
    }

    let written = output::write_all(&args.output_dir, &constellation, args.json)?;

    // Summary
    info!("\n{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!(
        "Generated {} satellites across {} orbital planes",
        constellation.summary.total_satellites, constellation.summary.num_planes
    );
    info!(
        "NORAD IDs {}-{}",
        constellation.summary.base_norad_id, constellation.summary.last_norad_id
    );
    for path in &written {
        info!("  wrote {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_build_reference_shell() {
        let args = Args::try_parse_from(["generate-tle"]).unwrap();
        let spec = args.flag_spec();
        assert_eq!(spec, ConstellationSpec::default());
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert!(!args.json);
        assert!(!args.stats);
    }

    #[test]
    fn test_describe_line() {
        let stats = SummaryStatistics::from_summary(
            &GenerationContext::seeded(1, Epoch::from_ymd_hms(2026, 1, 1, 0, 0, 0).unwrap())
                .generate(&ConstellationSpec::new(550.0, 53.0, 4, 3, 1, "S"))
                .unwrap()
                .summary,
        );
        let line = describe_line("RAAN", &stats.raan);
        assert!(line.starts_with("RAAN "));
        assert!(line.contains("min    0.00"));
        assert!(line.contains("max  270.00"));
        assert_eq!(describe_line("RAAN", &None), "RAAN          no data");

        let args = Args::try_parse_from(["generate-tle", "--stats"]).unwrap();
        assert!(args.stats);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "generate-tle", "-a", "780", "-i", "86.4", "-p", "6", "-s", "11", "-f", "2", "-n", "iridium",
        ])
        .unwrap();
        let spec = args.flag_spec();
        assert_eq!(spec.walker_notation(), "66/6/2");
        assert_eq!(spec.altitude_km, 780.0);
        assert_eq!(spec.name, "iridium");
    }

    #[test]
    fn test_spec_and_random_conflict() {
        assert!(Args::try_parse_from(["generate-tle", "--spec", "x.json", "--random"]).is_err());
    }

    #[test]
    fn test_load_bundled_shells() {
        let shells = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/shells");

        let polar = load_spec(&shells.join("polar.json")).unwrap();
        assert_eq!(polar.walker_notation(), "648/18/1");
        assert!(polar.validate().is_ok());

        let halo = load_spec(&shells.join("halo.json")).unwrap();
        assert_eq!(halo.walker_notation(), "12/3/1");
    }

    #[test]
    fn test_load_missing_spec_is_error() {
        assert!(load_spec(Path::new("/nonexistent/spec.json")).is_err());
    }
}
