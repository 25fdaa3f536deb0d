// src/services/provider.rs
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;
use crate::models::{CelestialBody, ChartTime, EclipticPosition, HousesResult, JulianDay};

/// Which position source the process was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderMode {
    /// Deterministic pseudo-ephemeris; no data files needed.
    #[default]
    Synthetic,
    /// Real positions from an external ephemeris engine.
    Ephemeris,
}

impl ProviderMode {
    pub const fn name(self) -> &'static str {
        match self {
            ProviderMode::Synthetic => "synthetic",
            ProviderMode::Ephemeris => "ephemeris",
        }
    }

    pub fn is_demo(self) -> bool {
        self == ProviderMode::Synthetic
    }
}

impl fmt::Display for ProviderMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synthetic" | "demo" => Ok(ProviderMode::Synthetic),
            "ephemeris" | "swisseph" => Ok(ProviderMode::Ephemeris),
            other => Err(format!(
                "Invalid ephemeris mode: {}. Valid modes: [\"synthetic\", \"ephemeris\"]",
                other
            )),
        }
    }
}

/// Source of sidereal positions and chart angles.
///
/// Implementations hold only configuration fixed at startup, so a single
/// instance is shared by every request.
pub trait PositionProvider: Send + Sync {
    fn mode(&self) -> ProviderMode;

    /// Sidereal correction in degrees at `jd`.
    fn ayanamsa(&self, jd: JulianDay) -> Result<f64, ChartError>;

    /// Sidereal position of `body` at `at`.
    fn position_of(&self, at: ChartTime, body: CelestialBody) -> Result<EclipticPosition, ChartError>;

    /// Ascendant and midheaven for an observer at (`latitude`, `longitude`).
    fn houses_of(&self, at: ChartTime, latitude: f64, longitude: f64) -> Result<HousesResult, ChartError>;
}
