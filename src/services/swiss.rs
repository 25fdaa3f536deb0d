// src/services/swiss.rs
//! Swiss Ephemeris engine (enabled with the `swisseph` feature).
//!
//! The bindings expose tropical positions only, so sidereal requests are
//! served by subtracting the configured ayanamsa from the tropical result.
//!
//! The bindings also have no way to set the data directory. The library
//! reads its data files from its built-in default location (or
//! `SE_EPHE_PATH` in the environment). `SWISS_EPHEMERIS_PATH` is only checked
//! to exist at startup, so a missing installation fails fast.

use std::path::PathBuf;

use log::info;
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};

use super::ayanamsa::Ayanamsa;
use super::ephemeris::{CalcFlags, EngineBody, EngineError, EphemerisEngine, HouseSystem, RawHouses, RawPosition};
use super::zodiac::normalize_360;
use crate::models::JulianDay;

/// Status code used for failures the bindings report without one.
const SWE_ERR: i32 = -1;

pub struct SwissEphemeris {
    sidereal_mode: Ayanamsa,
}

impl SwissEphemeris {
    pub fn new(ephemeris_path: PathBuf, sidereal_mode: Ayanamsa) -> Result<Self, EngineError> {
        if !ephemeris_path.exists() {
            return Err(EngineError::new(
                SWE_ERR,
                format!(
                    "Ephemeris path {} does not exist. Please ensure Swiss Ephemeris data files are installed.",
                    ephemeris_path.display()
                ),
            ));
        }
        info!(
            "Swiss Ephemeris ready: found data directory {}, sidereal mode {}",
            ephemeris_path.display(),
            sidereal_mode
        );
        Ok(SwissEphemeris { sidereal_mode })
    }
}

impl EphemerisEngine for SwissEphemeris {
    fn sidereal_mode(&self) -> Ayanamsa {
        self.sidereal_mode
    }

    fn position_of(&self, jd: JulianDay, body: EngineBody, flags: CalcFlags) -> Result<RawPosition, EngineError> {
        let tropical = flags.without(CalcFlags::SIDEREAL);
        let result = calc_ut(jd.0, body.id() as u32, tropical.0)
            .map_err(|e| EngineError::new(SWE_ERR, format!("{}", e)))?;

        let out = result.out;
        let mut longitude = out[0];
        if flags.contains(CalcFlags::SIDEREAL) {
            longitude -= self.ayanamsa(jd)?;
        }

        Ok(RawPosition {
            longitude: normalize_360(longitude),
            latitude: out[1],
            distance: out[2],
            speed: out[3],
        })
    }

    fn houses_of(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        system: HouseSystem,
    ) -> Result<RawHouses, EngineError> {
        let (c, a) = houses_ex(jd.0, CalcFlags::SWIEPH.0 as i32, latitude, longitude, system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);
        let ayanamsa = self.ayanamsa(jd)?;

        let tropical_cusps = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];

        Ok(RawHouses {
            cusps: tropical_cusps.iter().map(|c| normalize_360(c - ayanamsa)).collect(),
            ascendant: normalize_360(ascmc.ascendant - ayanamsa),
            midheaven: normalize_360(ascmc.mc - ayanamsa),
        })
    }
}
