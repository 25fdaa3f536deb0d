// src/handlers/chart.rs
use log::{error, info, warn};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::error::ChartError;
use crate::models::CalculateRequest;
use crate::services::chart::ChartService;

pub async fn calculate_chart(request: CalculateRequest, service: ChartService) -> Result<Json, Rejection> {
    info!("Handling request to calculate a chart.");

    match service.calculate(request).await {
        Ok(chart) => Ok(warp::reply::json(&chart)),
        Err(e) => {
            match &e {
                ChartError::Validation(_) | ChartError::Parse(_) => warn!("Rejected chart request: {}", e),
                _ => error!("Chart calculation failed: {}", e),
            }
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}
