// src/services/reference.rs
use serde::Serialize;

use super::nakshatra::{ALL_NAKSHATRAS, NAKSHATRA_SPAN};
use super::zodiac::ALL_SIGNS;

const ELEMENTS: [&str; 4] = ["Fire", "Earth", "Air", "Water"];

const SIGN_RULERS: [&str; 12] = [
    "Mars", "Venus", "Mercury", "Moon", "Sun", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Saturn",
    "Jupiter",
];

/// Vimshottari order of nakshatra lords, repeating every nine mansions.
const NAKSHATRA_LORDS: [&str; 9] = [
    "Ketu", "Venus", "Sun", "Moon", "Mars", "Rahu", "Jupiter", "Saturn", "Mercury",
];

#[derive(Debug, Clone, Serialize)]
pub struct SignInfo {
    pub index: usize,
    pub name: &'static str,
    pub rashi: &'static str,
    pub element: &'static str,
    pub ruling_planet: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NakshatraInfo {
    /// 1-based, Ashwini = 1.
    pub index: usize,
    pub name: &'static str,
    pub degrees: String,
    pub ruling_planet: &'static str,
}

pub fn sign_table() -> Vec<SignInfo> {
    ALL_SIGNS
        .iter()
        .enumerate()
        .map(|(i, sign)| SignInfo {
            index: i,
            name: sign.name(),
            rashi: sign.rashi_name(),
            element: ELEMENTS[i % 4],
            ruling_planet: SIGN_RULERS[i],
        })
        .collect()
}

pub fn nakshatra_table() -> Vec<NakshatraInfo> {
    ALL_NAKSHATRAS
        .iter()
        .enumerate()
        .map(|(i, nakshatra)| NakshatraInfo {
            index: i + 1,
            name: nakshatra.name(),
            degrees: format!(
                "{:.2}° - {:.2}°",
                i as f64 * NAKSHATRA_SPAN,
                (i + 1) as f64 * NAKSHATRA_SPAN
            ),
            ruling_planet: NAKSHATRA_LORDS[i % 9],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_signs_with_elements() {
        let signs = sign_table();
        assert_eq!(signs.len(), 12);
        assert_eq!(signs[0].name, "Aries");
        assert_eq!(signs[0].element, "Fire");
        assert_eq!(signs[3].element, "Water");
        assert_eq!(signs[11].ruling_planet, "Jupiter");
    }

    #[test]
    fn nakshatra_spans_and_lords() {
        let table = nakshatra_table();
        assert_eq!(table.len(), 27);
        assert_eq!(table[0].index, 1);
        assert_eq!(table[0].degrees, "0.00° - 13.33°");
        assert_eq!(table[26].degrees, "346.67° - 360.00°");
        assert_eq!(table[9].ruling_planet, "Ketu");
        assert_eq!(table[26].name, "Revati");
        assert_eq!(table[26].ruling_planet, "Mercury");
    }
}
