//! Output files for a generated constellation

use anyhow::{Context, Result};
use std::fs::{self, File};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use walker_tle::{validation_report, Constellation, ConstellationStatistics};

/// Write the TLE file, the validation report and optionally the JSON summary
/// and statistics.
///
/// Returns the paths written, in that order.
pub fn write_all(dir: &Path, constellation: &Constellation, json: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;
    let stem = constellation.file_stem();
    let mut written = Vec::with_capacity(4);

    let tle_path = dir.join(constellation.file_name());
    fs::write(&tle_path, constellation.tle_file_content())
        .with_context(|| format!("writing {:?}", tle_path))?;
    debug!("TLE file {:?}", tle_path);
    written.push(tle_path);

    let report_path = dir.join(format!("{}_report.txt", stem));
    fs::write(&report_path, validation_report(&constellation.summary))
        .with_context(|| format!("writing {:?}", report_path))?;
    written.push(report_path);

    if json {
        let json_path = dir.join(format!("{}_data.json", stem));
        write_json(&json_path, &constellation.summary)?;
        written.push(json_path);

        let stats_path = dir.join(format!("{}_stats.json", stem));
        let stats = ConstellationStatistics::from_summary(&constellation.summary);
        write_json(&stats_path, &stats)?;
        written.push(stats_path);
    }

    Ok(written)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("serializing {:?}", path))?;
    writer.flush().with_context(|| format!("flushing {:?}", path))?;
    debug!("JSON file {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use walker_tle::{ConstellationSpec, ConstellationSummary, Epoch, GenerationContext};

    fn constellation() -> Constellation {
        let spec = ConstellationSpec::new(1200.0, 87.9, 3, 2, 1, "polar shell");
        let epoch = Epoch::from_ymd_hms(2026, 1, 15, 6, 0, 0).unwrap();
        GenerationContext::seeded(12, epoch).generate(&spec).unwrap()
    }

    #[test]
    fn test_write_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let c = constellation();
        let written = write_all(dir.path(), &c, true).unwrap();

        assert_eq!(written.len(), 4);
        assert_eq!(written[0], dir.path().join("POLARSHELL_6sats.txt"));
        assert_eq!(written[1], dir.path().join("POLARSHELL_report.txt"));
        assert_eq!(written[2], dir.path().join("POLARSHELL_data.json"));
        assert_eq!(written[3], dir.path().join("POLARSHELL_stats.json"));

        let tle = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(tle, c.tle_file_content());
        assert!(tle.starts_with("POLARSHELL001-01\r\n1 "));
        assert!(tle.ends_with("\r\n"));

        let report = fs::read_to_string(&written[1]).unwrap();
        assert!(report.contains("- Walker notation: 6/3/1\n"));

        let json = fs::read_to_string(&written[2]).unwrap();
        let summary: ConstellationSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary.base_norad_id, c.summary.base_norad_id);
        assert_eq!(summary.satellite_data.len(), 6);
        assert_eq!(summary.satellite_data[5].name, "POLARSHELL003-02");

        let stats: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[3]).unwrap()).unwrap();
        assert_eq!(stats["statistics"]["satellites_per_plane"]["2"], 2);
        assert_eq!(stats["ground_positions"].as_array().unwrap().len(), 6);
        assert_eq!(stats["ground_positions"][0]["norad_id"], c.summary.base_norad_id);
    }

    #[test]
    fn test_json_files_complete_on_return() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ConstellationSpec::new(550.0, 53.0, 72, 22, 22, "starlink");
        let epoch = Epoch::from_ymd_hms(2026, 1, 15, 6, 0, 0).unwrap();
        let c = GenerationContext::seeded(3, epoch).generate(&spec).unwrap();
        let written = write_all(dir.path(), &c, true).unwrap();

        let json = fs::read_to_string(&written[2]).unwrap();
        assert!(json.len() > 8 * 1024);
        let summary: ConstellationSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary.satellite_data.len(), 1584);
    }

    #[test]
    fn test_write_without_json_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("a");
        let written = write_all(&nested, &constellation(), false).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.exists()));
        assert!(!nested.join("POLARSHELL_data.json").exists());
        assert!(!nested.join("POLARSHELL_stats.json").exists());
    }
}
