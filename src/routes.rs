// src/routes.rs
use std::convert::Infallible;
use std::time::Instant;

use log::{error, info, warn};
use serde_json::json;
use warp::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{MethodNotAllowed, PayloadTooLarge, Rejection, UnsupportedMediaType};
use warp::{Filter, Reply};

use crate::handlers::chart::calculate_chart;
use crate::handlers::error::{required_format, ApiError};
use crate::handlers::info::{endpoint_listing, get_health, get_info};
use crate::handlers::planets::get_planets;
use crate::handlers::reference::{get_nakshatras, get_signs};
use crate::models::CalculateRequest;
use crate::services::chart::ChartService;

const MAX_BODY_BYTES: u64 = 16 * 1024;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status(), api_error.body())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        warn!("Malformed request body: {}", e);
        (
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid request",
                "message": e.to_string(),
                "required_format": required_format(),
            }),
        )
    } else if err.find::<PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            json!({
                "error": "Invalid request",
                "message": format!("Request body exceeds {} bytes", MAX_BODY_BYTES),
            }),
        )
    } else if err.find::<UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            json!({
                "error": "Invalid request",
                "message": "Body must be JSON or URL-encoded form data",
                "required_format": required_format(),
            }),
        )
    } else if err.is_not_found() || err.find::<MethodNotAllowed>().is_some() {
        (
            StatusCode::NOT_FOUND,
            json!({
                "error": "Endpoint not found",
                "available_endpoints": endpoint_listing(),
            }),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("unhandled rejection").body())
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

/// `/calculate` accepts either a JSON or a URL-encoded form body.
fn calculate_body() -> impl Filter<Extract = (CalculateRequest,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES)
        .and(warp::body::json().or(warp::body::form()).unify())
}

pub fn routes(
    service: ChartService,
    started: Instant,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());

    let info_route = warp::path::end()
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_info);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(service_filter.clone())
        .and(warp::any().map(move || started))
        .and_then(get_health);

    let calculate_route = warp::path!("calculate")
        .and(warp::post())
        .and(calculate_body())
        .and(service_filter.clone())
        .and_then(calculate_chart);

    let planets_route = warp::path!("planets")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_planets);

    let signs_route = warp::path!("signs").and(warp::get()).and_then(get_signs);

    let nakshatras_route = warp::path!("nakshatras")
        .and(warp::get())
        .and_then(get_nakshatras);

    info!("All routes configured successfully.");

    info_route
        .or(health_route)
        .or(calculate_route)
        .or(planets_route)
        .or(signs_route)
        .or(nakshatras_route)
        .recover(handle_rejection)
}
