// src/handlers/planets.rs
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::chart::ChartService;

pub async fn get_planets(service: ChartService) -> Result<Json, Rejection> {
    info!("Handling request to get current planetary positions.");

    let positions = service.current_positions().await.map_err(|e| {
        error!("Failed to compute current positions: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    Ok(warp::reply::json(&positions))
}
