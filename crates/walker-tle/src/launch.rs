//! Synthetic identifiers: NORAD catalog numbers and international designators
//!
//! The NORAD base is drawn once per run and ids count up from it, so ids are
//! unique within a run. Launch designators are drawn independently for each
//! satellite and may repeat.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Range the per-run NORAD base id is drawn from
pub const NORAD_BASE_RANGE: RangeInclusive<u32> = 10_000..=90_000;

/// Largest id that fits the 5-column catalog number field
pub const MAX_NORAD_ID: u32 = 99_999;

/// Satellites one run can number from the lowest base
pub const MAX_SATELLITES: u32 = MAX_NORAD_ID - *NORAD_BASE_RANGE.start() + 1;

/// Launch years are drawn from the epoch year and the four before it
pub const LAUNCH_YEAR_WINDOW: i32 = 5;

pub const LAUNCH_NUMBER_RANGE: RangeInclusive<u16> = 1..=999;

/// Draw the base NORAD id for a run of `total` satellites.
///
/// The upper bound shrinks so the last id stays within five digits.
pub fn draw_norad_base<R: Rng + ?Sized>(rng: &mut R, total: u32) -> u32 {
    let low = *NORAD_BASE_RANGE.start();
    let high = (*NORAD_BASE_RANGE.end())
        .min((MAX_NORAD_ID + 1).saturating_sub(total))
        .max(low);
    rng.gen_range(low..=high)
}

/// International designator parts (line 1 columns 10-17)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchInfo {
    /// Two-digit launch year
    pub year: u8,
    /// Launch number of the year (1-999)
    pub number: u16,
    /// Piece of the launch (A-Z, AA-ZZ)
    pub piece: String,
}

impl LaunchInfo {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, calendar_year: i32) -> Self {
        let first_year = calendar_year - (LAUNCH_YEAR_WINDOW - 1);
        let year = rng.gen_range(first_year..=calendar_year).rem_euclid(100) as u8;
        let number = rng.gen_range(LAUNCH_NUMBER_RANGE);
        let piece = launch_pieces()
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "A".to_string());

        Self { year, number, piece }
    }

    /// `YYNNNPPP` with the piece left-justified in three columns
    pub fn designator(&self) -> String {
        format!("{:02}{:03}{:<3}", self.year, self.number, self.piece)
    }
}

/// A..Z followed by AA..ZZ (702 entries)
pub fn launch_pieces() -> &'static [String] {
    static PIECES: OnceLock<Vec<String>> = OnceLock::new();
    PIECES.get_or_init(|| {
        let letters = || (b'A'..=b'Z').map(char::from);
        letters()
            .map(String::from)
            .chain(letters().flat_map(|a| letters().map(move |b| format!("{}{}", a, b))))
            .collect()
    })
}
