// src/handlers/mod.rs
pub mod chart;
pub mod error;
pub mod info;
pub mod planets;
pub mod reference;
