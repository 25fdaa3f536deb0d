// src/services/zodiac.rs
//! Sidereal longitude to zodiac sign mapping.
//!
//! The ecliptic is split into 12 signs of 30 degrees each, starting at
//! Aries (Mesha) at 0 degrees of the sidereal zodiac.

use serde::Serialize;

/// Width of one sign in degrees.
pub const SIGN_SPAN: f64 = 30.0;

/// The 12 zodiac signs from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All signs in order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Sanskrit (rashi) name.
    pub const fn rashi_name(self) -> &'static str {
        match self {
            Self::Aries => "Mesha",
            Self::Taurus => "Vrishabha",
            Self::Gemini => "Mithuna",
            Self::Cancer => "Karka",
            Self::Leo => "Simha",
            Self::Virgo => "Kanya",
            Self::Libra => "Tula",
            Self::Scorpio => "Vrischika",
            Self::Sagittarius => "Dhanu",
            Self::Capricorn => "Makara",
            Self::Aquarius => "Kumbha",
            Self::Pisces => "Meena",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Sign {
        ALL_SIGNS[index % 12]
    }
}

impl Serialize for Sign {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Position of a longitude within its sign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZodiacPlacement {
    pub sign: Sign,
    /// Whole degrees within the sign (0..=29).
    pub degree: u32,
    /// Whole arc-minutes past `degree` (0..=59).
    pub minute: u32,
    /// The normalized longitude this placement was derived from.
    pub total_degree: f64,
    pub formatted: String,
}

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = ((deg % 360.0) + 360.0) % 360.0;
    // (-tiny + 360) can round up to exactly 360
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Map an ecliptic longitude to its sign, degree and minute.
pub fn map_to_zodiac(longitude: f64) -> ZodiacPlacement {
    let lon = normalize_360(longitude);
    let index = ((lon / SIGN_SPAN).floor() as usize).min(11);
    let sign = Sign::from_index(index);

    let within = lon - index as f64 * SIGN_SPAN;
    let degree = (within.floor() as u32).min(29);
    let minute = (((within - degree as f64) * 60.0).floor() as u32).min(59);

    ZodiacPlacement {
        sign,
        degree,
        minute,
        total_degree: lon,
        formatted: format_placement(sign, degree, minute),
    }
}

fn format_placement(sign: Sign, degree: u32, minute: u32) -> String {
    format!("{} {}°{:02}'", sign.name(), degree, minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps() {
        assert_eq!(normalize_360(0.0), 0.0);
        assert_eq!(normalize_360(360.0), 0.0);
        assert!((normalize_360(-10.0) - 350.0).abs() < 1e-12);
        assert!((normalize_360(730.0) - 10.0).abs() < 1e-10);
        assert!((normalize_360(-370.0) - 350.0).abs() < 1e-10);
    }

    #[test]
    fn normalize_tiny_negative_stays_below_360() {
        let r = normalize_360(-1e-17);
        assert!((0.0..360.0).contains(&r), "r = {r}");
    }

    #[test]
    fn aries_start() {
        let z = map_to_zodiac(0.0);
        assert_eq!(z.sign, Sign::Aries);
        assert_eq!((z.degree, z.minute), (0, 0));
        assert_eq!(z.formatted, "Aries 0°00'");
    }

    #[test]
    fn degree_and_minute() {
        let z = map_to_zodiac(14.0 + 7.5 / 60.0);
        assert_eq!(z.sign, Sign::Aries);
        assert_eq!((z.degree, z.minute), (14, 7));
        assert_eq!(z.formatted, "Aries 14°07'");
    }

    #[test]
    fn sign_boundaries() {
        for (i, sign) in ALL_SIGNS.iter().enumerate() {
            let z = map_to_zodiac(i as f64 * 30.0);
            assert_eq!(z.sign, *sign);
            assert_eq!(z.degree, 0);
        }
        assert_eq!(map_to_zodiac(359.999).sign, Sign::Pisces);
    }

    #[test]
    fn normalization_invariance() {
        for x in [-725.3, -360.0, -0.5, 45.25, 359.99, 400.0, 1000.75] {
            assert_eq!(map_to_zodiac(x), map_to_zodiac(normalize_360(x)), "x = {x}");
        }
    }

    #[test]
    fn round_trip_within_one_minute() {
        let mut lon = 0.0;
        while lon < 360.0 {
            let z = map_to_zodiac(lon);
            let back = z.sign.index() as f64 * 30.0 + z.degree as f64 + z.minute as f64 / 60.0;
            assert!(lon - back >= -1e-9 && lon - back < 1.0 / 60.0, "lon {lon} -> {back}");
            lon += 0.37;
        }
    }

    #[test]
    fn rashi_names() {
        assert_eq!(Sign::Aries.rashi_name(), "Mesha");
        assert_eq!(Sign::Pisces.rashi_name(), "Meena");
    }
}
