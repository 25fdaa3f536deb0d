// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use crate::services::ayanamsa::Ayanamsa;
use crate::services::ephemeris::{HouseSystem, NodeKind};
use crate::services::provider::{PositionProvider, ProviderMode};
use crate::services::synthetic::SyntheticProvider;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub mode: ProviderMode,
    pub ephemeris_path: PathBuf,
    pub ayanamsa: Ayanamsa,
    pub house_system: HouseSystem,
    pub node: NodeKind,
    pub synthetic_seed: Option<u64>,
    pub computation_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: DEFAULT_PORT,
            mode: ProviderMode::Synthetic,
            ephemeris_path: PathBuf::from(DEFAULT_EPHEMERIS_PATH),
            ayanamsa: Ayanamsa::Lahiri,
            house_system: HouseSystem::WholeSign,
            node: NodeKind::True,
            synthetic_seed: None,
            computation_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                defaults.port
            }
        };

        let mode = parse_or(&lookup, "EPHEMERIS_MODE", defaults.mode)?;
        let ayanamsa = parse_or(&lookup, "AYANAMSA", defaults.ayanamsa)?;
        let house_system = parse_or(&lookup, "HOUSE_SYSTEM", defaults.house_system)?;
        let node = parse_or(&lookup, "NODE_TYPE", defaults.node)?;

        let ephemeris_path = lookup("SWISS_EPHEMERIS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.ephemeris_path);

        let synthetic_seed = lookup("SYNTHETIC_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("SYNTHETIC_SEED must be an unsigned integer, got '{}'", raw))
            })
            .transpose()?;

        let computation_timeout = match lookup("COMPUTATION_TIMEOUT_MS") {
            Some(raw) => {
                let ms = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("COMPUTATION_TIMEOUT_MS must be a number, got '{}'", raw))?;
                if ms == 0 {
                    return Err(anyhow!("COMPUTATION_TIMEOUT_MS must be greater than zero"));
                }
                Duration::from_millis(ms)
            }
            None => defaults.computation_timeout,
        };

        let config = AppConfig {
            port,
            mode,
            ephemeris_path,
            ayanamsa,
            house_system,
            node,
            synthetic_seed,
            computation_timeout,
        };
        info!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Construct the position provider selected by `mode`.
    pub fn build_provider(&self) -> Result<Arc<dyn PositionProvider>> {
        match self.mode {
            ProviderMode::Synthetic => {
                let provider = match self.synthetic_seed {
                    Some(seed) => SyntheticProvider::with_seed(seed),
                    None => SyntheticProvider::new(),
                };
                info!("Using synthetic ephemeris (seed: {:?})", self.synthetic_seed);
                Ok(Arc::new(provider))
            }
            ProviderMode::Ephemeris => self.build_ephemeris_provider(),
        }
    }

    #[cfg(feature = "swisseph")]
    fn build_ephemeris_provider(&self) -> Result<Arc<dyn PositionProvider>> {
        use crate::services::ephemeris::{EphemerisProvider, EphemerisSettings};
        use crate::services::swiss::SwissEphemeris;

        let engine = SwissEphemeris::new(self.ephemeris_path.clone(), self.ayanamsa)
            .context("Failed to initialize Swiss Ephemeris")?;
        let settings = EphemerisSettings {
            node: self.node,
            house_system: self.house_system,
        };
        Ok(Arc::new(EphemerisProvider::new(engine, settings)))
    }

    #[cfg(not(feature = "swisseph"))]
    fn build_ephemeris_provider(&self) -> Result<Arc<dyn PositionProvider>> {
        Err(anyhow!(
            "EPHEMERIS_MODE=ephemeris requires building with the `swisseph` feature"
        ))
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr<Err = String>,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.parse::<T>().map_err(|e| anyhow!("{}: {}", key, e)),
        None => Ok(default),
    }
}
