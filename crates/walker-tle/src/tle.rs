//! Two-Line Element encoding
//!
//! Each data line is 68 fixed columns followed by a mod-10 checksum digit.
//!
//! ```text
//! NAME001-01
//! 1 NNNNNU YYNNNPPP YYDDD.DDDDDDDD  .00000000  00000+0  00000-0 0  999C
//! 2 NNNNN III.IIII RRR.RRRR 0000000 000.0000 MMM.MMMM NN.NNNNNNNN    1C
//! ```
//!
//! Every field is range-checked before it is written; a value too wide for
//! its columns is a `FormatOverflow` error instead of shifting later columns.

use crate::constellation::ConstellationSpec;
use crate::walker::{DerivedConstants, SatelliteRecord, ARG_PERIGEE_DEG, ECCENTRICITY};
use crate::{Result, TleError};
use serde::{Deserialize, Serialize};

/// Data columns before the checksum
pub const BODY_LEN: usize = 68;

/// Full line length including checksum
pub const LINE_LEN: usize = 69;

/// Derivatives and B* are zero: no propagation model.
/// Ephemeris type 0, element set number 999.
const LINE1_TAIL: &str = " .00000000  00000+0  00000-0 0  999";

/// Revolution number at epoch
const LINE2_TAIL: &str = "    1";

/// Encoded satellite (name line + two element lines)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TleRecord {
    pub norad_id: u32,
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    pub fn lines(&self) -> [&str; 3] {
        [&self.name, &self.line1, &self.line2]
    }

    /// Both lines are 69 columns and end in their own checksum
    pub fn verify(&self) -> bool {
        [&self.line1, &self.line2].iter().all(|line| {
            line.len() == LINE_LEN
                && line
                    .chars()
                    .last()
                    .and_then(|c| c.to_digit(10))
                    .map_or(false, |d| d == checksum(line) as u32)
        })
    }
}

/// TLE checksum over the first 68 characters.
///
/// Digits add their value, `-` adds 1, everything else adds 0.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .take(BODY_LEN)
        .map(|c| match c {
            '0'..='9' => c as u32 - '0' as u32,
            '-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

/// Keep alphanumerics, `_` and `-`; uppercase the rest
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// `NAME` + 3-digit plane + `-` + 2-digit slot (both 1-based)
pub fn satellite_name(clean_name: &str, plane: u32, slot: u32) -> String {
    format!("{}{:03}-{:02}", clean_name, plane, slot)
}

/// Encode one satellite into its name line and two element lines
pub fn encode(
    record: &SatelliteRecord,
    constants: &DerivedConstants,
    spec: &ConstellationSpec,
) -> Result<TleRecord> {
    let norad = fixed("norad_id", format!("{:05}", record.norad_id), 5)?;
    let designator = launch_designator(record)?;
    let epoch = epoch_field(constants)?;

    let line1 = finish_line(format!(
        "1 {}U {} {} {}",
        norad, designator, epoch, LINE1_TAIL
    ));

    let inclination = angle("inclination", spec.inclination_deg, 0.0..=180.0)?;
    let raan = angle("raan", record.raan_deg, 0.0..=360.0)?;
    let eccentricity = fixed(
        "eccentricity",
        format!("{:07}", (ECCENTRICITY * 1e7) as u32),
        7,
    )?;
    let arg_perigee = angle("arg_perigee", ARG_PERIGEE_DEG, 0.0..=360.0)?;
    let mean_anomaly = angle("mean_anomaly", record.mean_anomaly_deg, 0.0..=360.0)?;
    let mean_motion = mean_motion_field(constants.mean_motion_rev_per_day)?;

    let line2 = finish_line(format!(
        "2 {} {} {} {} {} {} {}{}",
        norad, inclination, raan, eccentricity, arg_perigee, mean_anomaly, mean_motion, LINE2_TAIL
    ));

    Ok(TleRecord {
        norad_id: record.norad_id,
        name: record.name.clone(),
        line1,
        line2,
    })
}

/// Pad/truncate to 68 columns and append the checksum digit
fn finish_line(body: String) -> String {
    let mut line: String = body.chars().take(BODY_LEN).collect();
    while line.len() < BODY_LEN {
        line.push(' ');
    }
    let digit = checksum(&line);
    line.push(char::from(b'0' + digit));
    line
}

fn fixed(field: &'static str, value: String, width: usize) -> Result<String> {
    if value.len() > width {
        return Err(TleError::FormatOverflow { field, value, width });
    }
    Ok(value)
}

/// 8.4f angle in degrees
fn angle(field: &'static str, deg: f64, range: std::ops::RangeInclusive<f64>) -> Result<String> {
    if !deg.is_finite() || !range.contains(&deg) {
        return Err(TleError::FormatOverflow {
            field,
            value: deg.to_string(),
            width: 8,
        });
    }
    fixed(field, format!("{:8.4}", deg), 8)
}

fn mean_motion_field(rev_per_day: f64) -> Result<String> {
    if !rev_per_day.is_finite() || rev_per_day <= 0.0 {
        return Err(TleError::FormatOverflow {
            field: "mean_motion",
            value: rev_per_day.to_string(),
            width: 11,
        });
    }
    fixed("mean_motion", format!("{:11.8}", rev_per_day), 11)
}

fn launch_designator(record: &SatelliteRecord) -> Result<String> {
    let launch = &record.launch;
    let piece_ok = (1..=3).contains(&launch.piece.len())
        && launch.piece.chars().all(|c| c.is_ascii_uppercase());

    if launch.year > 99 {
        return Err(TleError::FormatOverflow {
            field: "launch_year",
            value: launch.year.to_string(),
            width: 2,
        });
    }
    if !(1..=999).contains(&launch.number) {
        return Err(TleError::FormatOverflow {
            field: "launch_number",
            value: launch.number.to_string(),
            width: 3,
        });
    }
    if !piece_ok {
        return Err(TleError::FormatOverflow {
            field: "launch_piece",
            value: launch.piece.clone(),
            width: 3,
        });
    }
    Ok(launch.designator())
}

fn epoch_field(constants: &DerivedConstants) -> Result<String> {
    let epoch = &constants.epoch;
    if epoch.year > 99 || !(1.0..367.0).contains(&epoch.day) {
        return Err(TleError::FormatOverflow {
            field: "epoch",
            value: format!("{}/{}", epoch.year, epoch.day),
            width: 14,
        });
    }
    fixed("epoch", epoch.format_tle(), 14)
}
