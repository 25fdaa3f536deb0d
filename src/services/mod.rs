// src/services/mod.rs
pub mod ayanamsa;
pub mod calendar;
pub mod chart;
pub mod ephemeris;
pub mod nakshatra;
pub mod provider;
pub mod reference;
#[cfg(feature = "swisseph")]
pub mod swiss;
pub mod synthetic;
pub mod zodiac;
