// src/handlers/reference.rs
use log::info;
use serde_json::json;
use warp::reply::Json;
use warp::Rejection;

use crate::services::reference::{nakshatra_table, sign_table};

pub async fn get_signs() -> Result<Json, Rejection> {
    info!("Handling request to list zodiac signs.");
    Ok(warp::reply::json(&json!({ "zodiac_signs": sign_table() })))
}

pub async fn get_nakshatras() -> Result<Json, Rejection> {
    info!("Handling request to list nakshatras.");
    Ok(warp::reply::json(&json!({ "nakshatras": nakshatra_table() })))
}
