// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::services::nakshatra::{map_to_nakshatra, NakshatraPlacement};
use crate::services::zodiac::{map_to_zodiac, normalize_360, ZodiacPlacement};

/// A civil date and clock time with its offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CivilMoment {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Hours east of UTC; fractional offsets such as 5.5 are allowed.
    pub utc_offset_hours: f64,
}

/// Days since the Julian epoch, always in Universal Time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct JulianDay(pub f64);

/// The instant a position query is about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTime {
    pub jd: JulianDay,
    /// 1-based ordinal of the civil date the instant was given in.
    pub day_of_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    /// Ascending lunar node.
    Rahu,
    /// Descending lunar node.
    Ketu,
}

/// The nine bodies of a chart, in display order.
pub const ALL_BODIES: [CelestialBody; 9] = [
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Rahu,
    CelestialBody::Ketu,
];

/// Bodies reported by the current-positions endpoint (no lunar nodes).
pub const VISIBLE_BODIES: [CelestialBody; 7] = [
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
];

impl CelestialBody {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Serialize for CelestialBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Where a body sits on the ecliptic and how it is moving.
///
/// Ketu carries no latitude, distance or speed of its own; those fields are
/// `None` and left out of the JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipticPosition {
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Degrees per day in longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    pub retrograde: bool,
}

impl EclipticPosition {
    /// Position from raw coordinates; retrograde when `speed` is negative.
    pub fn from_motion(longitude: f64, latitude: f64, distance: f64, speed: f64) -> Self {
        EclipticPosition {
            longitude: normalize_360(longitude),
            latitude: Some(latitude),
            distance: Some(distance),
            speed: Some(speed),
            retrograde: speed < 0.0,
        }
    }

    /// The descending node opposite `rahu`.
    pub fn ketu_from(rahu: &EclipticPosition) -> Self {
        EclipticPosition {
            longitude: normalize_360(rahu.longitude + 180.0),
            latitude: None,
            distance: None,
            speed: None,
            retrograde: true,
        }
    }
}

/// An ecliptic position annotated with its sign and nakshatra.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedPosition {
    #[serde(flatten)]
    pub position: EclipticPosition,
    pub sign: ZodiacPlacement,
    pub nakshatra: NakshatraPlacement,
}

impl PlacedPosition {
    pub fn new(position: EclipticPosition) -> Self {
        PlacedPosition {
            sign: map_to_zodiac(position.longitude),
            nakshatra: map_to_nakshatra(position.longitude),
            position,
        }
    }
}

/// Per-body positions, serialized as a JSON object keyed by body name in
/// chart order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanetTable(pub Vec<(CelestialBody, PlacedPosition)>);

impl PlanetTable {
    pub fn get(&self, body: CelestialBody) -> Option<&PlacedPosition> {
        self.0.iter().find(|(b, _)| *b == body).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PlanetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(body, placed)| (body.name(), placed)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AscendantPoint {
    pub longitude: f64,
    pub sign: ZodiacPlacement,
    pub nakshatra: NakshatraPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidheavenPoint {
    pub longitude: f64,
    pub sign: ZodiacPlacement,
}

/// Chart angles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HousesResult {
    pub ascendant: AscendantPoint,
    pub mc: MidheavenPoint,
}

impl HousesResult {
    pub fn from_angles(ascendant: f64, midheaven: f64) -> Self {
        let asc = normalize_360(ascendant);
        let mc = normalize_360(midheaven);
        HousesResult {
            ascendant: AscendantPoint {
                longitude: asc,
                sign: map_to_zodiac(asc),
                nakshatra: map_to_nakshatra(asc),
            },
            mc: MidheavenPoint {
                longitude: mc,
                sign: map_to_zodiac(mc),
            },
        }
    }
}

/// A numeric request field that may arrive as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }
}

/// Body of `POST /calculate`. Every field is optional at the wire level so
/// that validation can name all missing fields at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalculateRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub latitude: Option<NumberOrString>,
    pub longitude: Option<NumberOrString>,
    pub timezone: Option<NumberOrString>,
}

/// Normalized request echoed back with the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputEcho {
    pub date: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: f64,
    pub julian_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub input: InputEcho,
    pub ayanamsa: f64,
    pub planets: PlanetTable,
    pub houses: HousesResult,
    pub calculation_time: DateTime<Utc>,
    pub demo_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPositions {
    pub timestamp: DateTime<Utc>,
    pub julian_day: f64,
    pub planets: PlanetTable,
    pub demo_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

/// Round a Julian Day to 1e-5 day (under a second) for display.
pub fn round_julian_day(jd: f64) -> f64 {
    (jd * 100_000.0).round() / 100_000.0
}
