// src/services/synthetic.rs
//! Deterministic pseudo-ephemeris for running without ephemeris data.
//!
//! Positions are plausible and move smoothly from day to day, but they are
//! not astronomy. Each body advances at a fixed nominal rate from a
//! body-specific offset, keyed by the day of the year. The ascendant uses a
//! linear stand-in for sidereal time. Both formulas are illustrative and are
//! kept exactly as published so charts stay reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::ayanamsa::SYNTHETIC_AYANAMSA;
use super::provider::{PositionProvider, ProviderMode};
use super::zodiac::normalize_360;
use crate::error::ChartError;
use crate::models::{CelestialBody, ChartTime, EclipticPosition, HousesResult, JulianDay};

/// Nominal motion in degrees per day. The lunar nodes run backwards.
pub fn nominal_speed(body: CelestialBody) -> f64 {
    match body {
        CelestialBody::Sun => 1.0,
        CelestialBody::Moon => 13.0,
        CelestialBody::Mercury => 4.0,
        CelestialBody::Venus => 1.6,
        CelestialBody::Mars => 0.5,
        CelestialBody::Jupiter => 0.08,
        CelestialBody::Saturn => 0.03,
        CelestialBody::Rahu | CelestialBody::Ketu => -0.05,
    }
}

/// Fixed per-body offset in degrees, taken from the body's name.
pub fn body_salt(body: CelestialBody) -> f64 {
    body.name().as_bytes()[0] as f64 * 7.0
}

/// Longitude before any jitter: `(d * speed + salt) mod 360`.
pub fn base_longitude(day_of_year: u32, body: CelestialBody) -> f64 {
    normalize_360(day_of_year as f64 * nominal_speed(body) + body_salt(body))
}

/// Illustrative ascendant: `(d + geo_longitude / 15) * 0.98 mod 360`.
pub fn synthetic_ascendant(day_of_year: u32, geo_longitude: f64) -> f64 {
    normalize_360((day_of_year as f64 + geo_longitude / 15.0) * 0.98)
}

/// A direct body is reported retrograde when its roll in [0, 1) exceeds
/// this, mimicking apparent loops about one time in ten.
const RETROGRADE_THRESHOLD: f64 = 0.9;

pub struct SyntheticProvider {
    seed: Option<u64>,
}

impl SyntheticProvider {
    /// Jitter drawn from OS entropy.
    pub fn new() -> Self {
        SyntheticProvider { seed: None }
    }

    /// Jitter derived from `seed`, the Julian Day and the body, so the same
    /// query always yields the same position.
    pub fn with_seed(seed: u64) -> Self {
        SyntheticProvider { seed: Some(seed) }
    }

    fn rng_for(&self, jd: JulianDay, body: CelestialBody) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => {
                let mixed = seed
                    ^ jd.0.to_bits().rotate_left(17)
                    ^ (body.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                ChaCha20Rng::seed_from_u64(mixed)
            }
            None => ChaCha20Rng::from_entropy(),
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for SyntheticProvider {
    fn mode(&self) -> ProviderMode {
        ProviderMode::Synthetic
    }

    fn ayanamsa(&self, _jd: JulianDay) -> Result<f64, ChartError> {
        Ok(SYNTHETIC_AYANAMSA)
    }

    fn position_of(&self, at: ChartTime, body: CelestialBody) -> Result<EclipticPosition, ChartError> {
        if body == CelestialBody::Ketu {
            let rahu = self.position_of(at, CelestialBody::Rahu)?;
            return Ok(EclipticPosition::ketu_from(&rahu));
        }

        let d = at.day_of_year;
        let speed = nominal_speed(body);
        let mut rng = self.rng_for(at.jd, body);
        let jitter: f64 = rng.gen();
        let roll: f64 = rng.gen();

        Ok(EclipticPosition {
            longitude: base_longitude(d, body),
            latitude: Some((d as f64 * 0.1).sin() * 5.0),
            distance: Some(1.0 + (d as f64 * 0.05).sin() * 0.1),
            speed: Some(speed * (0.9 + jitter * 0.2)),
            retrograde: speed < 0.0 || roll > RETROGRADE_THRESHOLD,
        })
    }

    fn houses_of(&self, at: ChartTime, _latitude: f64, longitude: f64) -> Result<HousesResult, ChartError> {
        let ascendant = synthetic_ascendant(at.day_of_year, longitude);
        Ok(HousesResult::from_angles(ascendant, ascendant + 90.0))
    }
}
