// src/handlers/info.rs
use std::time::Instant;

use chrono::Utc;
use log::info;
use serde_json::{json, Map, Value};
use warp::reply::Json;
use warp::Rejection;

use crate::services::chart::{ChartService, DEMO_CHART_NOTE};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Every route the server answers, with a short description.
pub const ENDPOINTS: [(&str, &str); 6] = [
    ("GET /", "API information"),
    ("GET /health", "Health check"),
    ("POST /calculate", "Calculate chart"),
    ("GET /planets", "Current planets"),
    ("GET /signs", "Zodiac signs info"),
    ("GET /nakshatras", "Nakshatras info"),
];

pub fn endpoint_listing() -> Value {
    let listing: Map<String, Value> = ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), Value::from(*description)))
        .collect();
    Value::Object(listing)
}

pub async fn get_info(service: ChartService) -> Result<Json, Rejection> {
    info!("Handling request for API info.");

    let mode = service.mode();
    let mut body = json!({
        "message": "Vedic Astrology Chart API",
        "version": API_VERSION,
        "mode": mode.name(),
        "status": "Running",
        "endpoints": endpoint_listing(),
    });
    if mode.is_demo() {
        body["note"] = Value::from(DEMO_CHART_NOTE);
    }
    Ok(warp::reply::json(&body))
}

pub async fn get_health(service: ChartService, started: Instant) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "mode": service.mode().name(),
        "uptime": started.elapsed().as_secs_f64(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_every_route() {
        let listing = endpoint_listing();
        let map = listing.as_object().unwrap();
        assert_eq!(map.len(), 6);
        assert_eq!(map["POST /calculate"], json!("Calculate chart"));
    }
}
