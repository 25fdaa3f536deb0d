// src/services/ephemeris.rs
//! Position provider backed by an external ephemeris engine.
//!
//! The engine itself (Swiss Ephemeris or anything speaking the same
//! contract) sits behind [`EphemerisEngine`]. Its sidereal mode is fixed
//! when it is constructed; every query from here asks for sidereal,
//! speed-bearing coordinates so longitudes come back ayanamsa-corrected.

use std::ops::BitOr;
use std::str::FromStr;

use log::{debug, error};
use thiserror::Error;

use super::ayanamsa::Ayanamsa;
use super::provider::{PositionProvider, ProviderMode};
use crate::error::ChartError;
use crate::models::{CelestialBody, ChartTime, EclipticPosition, HousesResult, JulianDay};

/// Computation flags understood by the engine (Swiss Ephemeris `SEFLG_*` values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcFlags(pub u32);

impl CalcFlags {
    pub const SWIEPH: CalcFlags = CalcFlags(2);
    pub const SPEED: CalcFlags = CalcFlags(256);
    pub const SIDEREAL: CalcFlags = CalcFlags(64 * 1024);

    pub fn contains(self, other: CalcFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn without(self, other: CalcFlags) -> CalcFlags {
        CalcFlags(self.0 & !other.0)
    }
}

impl BitOr for CalcFlags {
    type Output = CalcFlags;

    fn bitor(self, rhs: CalcFlags) -> CalcFlags {
        CalcFlags(self.0 | rhs.0)
    }
}

/// Bodies the engine is asked about. Ketu has no entry: it is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    MeanNode,
    TrueNode,
}

impl EngineBody {
    /// Swiss Ephemeris `SE_*` planet number.
    pub const fn id(self) -> i32 {
        match self {
            Self::Sun => 0,
            Self::Moon => 1,
            Self::Mercury => 2,
            Self::Venus => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::MeanNode => 10,
            Self::TrueNode => 11,
        }
    }
}

/// Which lunar node model stands in for Rahu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    True,
    Mean,
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "true" | "true_node" => Ok(NodeKind::True),
            "mean" | "mean_node" => Ok(NodeKind::Mean),
            other => Err(format!("Invalid node type: {}. Valid types: [\"true\", \"mean\"]", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HouseSystem {
    #[default]
    WholeSign,
    Placidus,
    Equal,
    Koch,
}

const HOUSE_SYSTEMS: &[(&str, HouseSystem)] = &[
    ("whole_sign", HouseSystem::WholeSign),
    ("placidus", HouseSystem::Placidus),
    ("equal", HouseSystem::Equal),
    ("koch", HouseSystem::Koch),
];

impl HouseSystem {
    /// Swiss Ephemeris house system letter.
    pub const fn code(self) -> u8 {
        match self {
            Self::WholeSign => b'W',
            Self::Placidus => b'P',
            Self::Equal => b'E',
            Self::Koch => b'K',
        }
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, system)| *system)
            .ok_or_else(|| {
                let valid: Vec<&str> = HOUSE_SYSTEMS.iter().map(|(name, _)| *name).collect();
                format!("Invalid house system: {}. Valid systems: {:?}", s, valid)
            })
    }
}

/// Coordinates as the engine reports them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub distance: f64,
    /// Degrees per day in longitude.
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawHouses {
    /// House cusps 1..=12.
    pub cusps: Vec<f64>,
    pub ascendant: f64,
    pub midheaven: f64,
}

/// A failed engine call: negative status code plus the engine's diagnostic.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        EngineError {
            code,
            message: message.into(),
        }
    }
}

/// Contract of the external ephemeris engine.
pub trait EphemerisEngine: Send + Sync {
    /// Sidereal mode chosen when the engine was initialized.
    fn sidereal_mode(&self) -> Ayanamsa;

    fn position_of(&self, jd: JulianDay, body: EngineBody, flags: CalcFlags) -> Result<RawPosition, EngineError>;

    fn houses_of(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<RawHouses, EngineError>;

    /// Ayanamsa of the configured sidereal mode at `jd`.
    fn ayanamsa(&self, jd: JulianDay) -> Result<f64, EngineError> {
        Ok(self.sidereal_mode().mean_at(jd))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EphemerisSettings {
    pub node: NodeKind,
    pub house_system: HouseSystem,
}

pub struct EphemerisProvider<E> {
    engine: E,
    settings: EphemerisSettings,
}

impl<E: EphemerisEngine> EphemerisProvider<E> {
    pub fn new(engine: E, settings: EphemerisSettings) -> Self {
        EphemerisProvider { engine, settings }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn flags() -> CalcFlags {
        CalcFlags::SWIEPH | CalcFlags::SPEED | CalcFlags::SIDEREAL
    }

    fn engine_body(&self, body: CelestialBody) -> Option<EngineBody> {
        match body {
            CelestialBody::Sun => Some(EngineBody::Sun),
            CelestialBody::Moon => Some(EngineBody::Moon),
            CelestialBody::Mercury => Some(EngineBody::Mercury),
            CelestialBody::Venus => Some(EngineBody::Venus),
            CelestialBody::Mars => Some(EngineBody::Mars),
            CelestialBody::Jupiter => Some(EngineBody::Jupiter),
            CelestialBody::Saturn => Some(EngineBody::Saturn),
            CelestialBody::Rahu => Some(match self.settings.node {
                NodeKind::True => EngineBody::TrueNode,
                NodeKind::Mean => EngineBody::MeanNode,
            }),
            CelestialBody::Ketu => None,
        }
    }
}

fn computation_error(what: &str, err: EngineError) -> ChartError {
    error!("Ephemeris engine failed on {} (status {}): {}", what, err.code, err.message);
    ChartError::Computation(err.message)
}

impl<E: EphemerisEngine> PositionProvider for EphemerisProvider<E> {
    fn mode(&self) -> ProviderMode {
        ProviderMode::Ephemeris
    }

    fn ayanamsa(&self, jd: JulianDay) -> Result<f64, ChartError> {
        self.engine.ayanamsa(jd).map_err(|e| computation_error("ayanamsa", e))
    }

    fn position_of(&self, at: ChartTime, body: CelestialBody) -> Result<EclipticPosition, ChartError> {
        let Some(engine_body) = self.engine_body(body) else {
            let rahu = self.position_of(at, CelestialBody::Rahu)?;
            return Ok(EclipticPosition::ketu_from(&rahu));
        };
        let jd = at.jd;

        let raw = self
            .engine
            .position_of(jd, engine_body, Self::flags())
            .map_err(|e| computation_error(body.name(), e))?;
        debug!("{} at JD {}: lon {:.6} speed {:.6}", body.name(), jd.0, raw.longitude, raw.speed);

        Ok(EclipticPosition::from_motion(raw.longitude, raw.latitude, raw.distance, raw.speed))
    }

    fn houses_of(&self, at: ChartTime, latitude: f64, longitude: f64) -> Result<HousesResult, ChartError> {
        let raw = self
            .engine
            .houses_of(at.jd, latitude, longitude, self.settings.house_system)
            .map_err(|e| computation_error("houses", e))?;
        Ok(HousesResult::from_angles(raw.ascendant, raw.midheaven))
    }
}
