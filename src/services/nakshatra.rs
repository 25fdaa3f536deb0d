// src/services/nakshatra.rs
//! Lunar mansion (nakshatra) and pada mapping.
//!
//! 27 equal nakshatras of 13°20' each, starting at Ashwini at 0°, each split
//! into 4 padas of 3°20'.

use serde::Serialize;

use super::zodiac::normalize_360;

/// Span of one nakshatra: 360/27 degrees.
pub const NAKSHATRA_SPAN: f64 = 360.0 / 27.0;

/// Span of one pada: a quarter of a nakshatra.
pub const PADA_SPAN: f64 = 360.0 / 27.0 / 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nakshatra {
    Ashwini,
    Bharani,
    Krittika,
    Rohini,
    Mrigashira,
    Ardra,
    Punarvasu,
    Pushya,
    Ashlesha,
    Magha,
    PurvaPhalguni,
    UttaraPhalguni,
    Hasta,
    Chitra,
    Swati,
    Vishakha,
    Anuradha,
    Jyeshtha,
    Mula,
    PurvaAshadha,
    UttaraAshadha,
    Shravana,
    Dhanishta,
    Shatabhisha,
    PurvaBhadrapada,
    UttaraBhadrapada,
    Revati,
}

/// All 27 nakshatras in order (0 = Ashwini, 26 = Revati).
pub const ALL_NAKSHATRAS: [Nakshatra; 27] = [
    Nakshatra::Ashwini,
    Nakshatra::Bharani,
    Nakshatra::Krittika,
    Nakshatra::Rohini,
    Nakshatra::Mrigashira,
    Nakshatra::Ardra,
    Nakshatra::Punarvasu,
    Nakshatra::Pushya,
    Nakshatra::Ashlesha,
    Nakshatra::Magha,
    Nakshatra::PurvaPhalguni,
    Nakshatra::UttaraPhalguni,
    Nakshatra::Hasta,
    Nakshatra::Chitra,
    Nakshatra::Swati,
    Nakshatra::Vishakha,
    Nakshatra::Anuradha,
    Nakshatra::Jyeshtha,
    Nakshatra::Mula,
    Nakshatra::PurvaAshadha,
    Nakshatra::UttaraAshadha,
    Nakshatra::Shravana,
    Nakshatra::Dhanishta,
    Nakshatra::Shatabhisha,
    Nakshatra::PurvaBhadrapada,
    Nakshatra::UttaraBhadrapada,
    Nakshatra::Revati,
];

impl Nakshatra {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ashwini => "Ashwini",
            Self::Bharani => "Bharani",
            Self::Krittika => "Krittika",
            Self::Rohini => "Rohini",
            Self::Mrigashira => "Mrigashira",
            Self::Ardra => "Ardra",
            Self::Punarvasu => "Punarvasu",
            Self::Pushya => "Pushya",
            Self::Ashlesha => "Ashlesha",
            Self::Magha => "Magha",
            Self::PurvaPhalguni => "Purva Phalguni",
            Self::UttaraPhalguni => "Uttara Phalguni",
            Self::Hasta => "Hasta",
            Self::Chitra => "Chitra",
            Self::Swati => "Swati",
            Self::Vishakha => "Vishakha",
            Self::Anuradha => "Anuradha",
            Self::Jyeshtha => "Jyeshtha",
            Self::Mula => "Mula",
            Self::PurvaAshadha => "Purva Ashadha",
            Self::UttaraAshadha => "Uttara Ashadha",
            Self::Shravana => "Shravana",
            Self::Dhanishta => "Dhanishta",
            Self::Shatabhisha => "Shatabhisha",
            Self::PurvaBhadrapada => "Purva Bhadrapada",
            Self::UttaraBhadrapada => "Uttara Bhadrapada",
            Self::Revati => "Revati",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Nakshatra {
        ALL_NAKSHATRAS[index % 27]
    }
}

impl Serialize for Nakshatra {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NakshatraPlacement {
    pub name: Nakshatra,
    /// Quarter of the nakshatra, 1..=4.
    pub pada: u8,
    /// Degrees elapsed within the nakshatra, in [0, 360/27).
    pub degree: f64,
}

/// Map an ecliptic longitude to its nakshatra and pada.
pub fn map_to_nakshatra(longitude: f64) -> NakshatraPlacement {
    let lon = normalize_360(longitude);
    let index = partition_index(lon, NAKSHATRA_SPAN, 26);
    let within = (lon - index as f64 * NAKSHATRA_SPAN).max(0.0);
    let quarter = partition_index(within, PADA_SPAN, 3);

    NakshatraPlacement {
        name: Nakshatra::from_index(index),
        pada: quarter as u8 + 1,
        degree: within,
    }
}

/// `floor(value / span)`, clamped to `max`, checked against the same
/// `k * span` products callers use as boundaries so that a value sitting
/// exactly on a boundary lands in the upper cell.
fn partition_index(value: f64, span: f64, max: usize) -> usize {
    let mut index = (value / span).floor().max(0.0) as usize;
    if index > 0 && (index as f64) * span > value {
        index -= 1;
    }
    if index < max && ((index + 1) as f64) * span <= value {
        index += 1;
    }
    index.min(max)
}
