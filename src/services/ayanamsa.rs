// src/services/ayanamsa.rs
//! Sidereal reference systems (ayanamsa).
//!
//! Each system is anchored by its value at J2000.0; the value at any other
//! epoch adds the IAU 2006 general precession in ecliptic longitude.

use std::fmt;
use std::str::FromStr;

use crate::models::JulianDay;

/// Julian Day of the J2000.0 epoch.
pub const J2000_JD: f64 = 2_451_545.0;

/// Fixed ayanamsa reported by the synthetic ephemeris (approximate present-day Lahiri).
pub const SYNTHETIC_AYANAMSA: f64 = 24.1267;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ayanamsa {
    /// Chitrapaksha: Spica at 0° Libra.
    #[default]
    Lahiri,
    Raman,
    Krishnamurti,
    FaganBradley,
    Yukteshwar,
}

const ALL_AYANAMSAS: [Ayanamsa; 5] = [
    Ayanamsa::Lahiri,
    Ayanamsa::Raman,
    Ayanamsa::Krishnamurti,
    Ayanamsa::FaganBradley,
    Ayanamsa::Yukteshwar,
];

impl Ayanamsa {
    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lahiri => "lahiri",
            Self::Raman => "raman",
            Self::Krishnamurti => "krishnamurti",
            Self::FaganBradley => "fagan_bradley",
            Self::Yukteshwar => "yukteshwar",
        }
    }

    /// Ayanamsa at J2000.0 in degrees.
    pub const fn reference_j2000_deg(self) -> f64 {
        match self {
            Self::Lahiri => 23.853,
            Self::Raman => 22.370,
            Self::Krishnamurti => 23.850,
            Self::FaganBradley => 24.736,
            Self::Yukteshwar => 22.376,
        }
    }

    /// Mean ayanamsa in degrees at `jd`.
    pub fn mean_at(self, jd: JulianDay) -> f64 {
        let t = (jd.0 - J2000_JD) / 36_525.0;
        self.reference_j2000_deg() + general_precession_arcsec(t) / 3600.0
    }
}

impl fmt::Display for Ayanamsa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ayanamsa {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "chitrapaksha" => return Ok(Self::Lahiri),
            "kp" => return Ok(Self::Krishnamurti),
            _ => {}
        }
        ALL_AYANAMSAS
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = ALL_AYANAMSAS.iter().map(|a| a.name()).collect();
                format!("Invalid ayanamsa: {}. Valid ayanamsas: {:?}", s, valid)
            })
    }
}

/// IAU 2006 general precession in ecliptic longitude, arcseconds, for `t`
/// Julian centuries since J2000.0.
fn general_precession_arcsec(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    5028.796195 * t + 1.1054348 * t2 + 0.00007964 * t3 - 0.000023857 * t4 - 0.0000000383 * t5
}
