use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::test::request;

use vedic_chart_api::routes::routes;
use vedic_chart_api::services::chart::ChartService;
use vedic_chart_api::services::synthetic::SyntheticProvider;

fn service() -> ChartService {
    ChartService::new(Arc::new(SyntheticProvider::with_seed(42)), Duration::from_secs(5))
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn calculates_a_full_chart() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .json(&json!({
            "date": "2000-01-01",
            "time": "00:00",
            "latitude": 28.6,
            "longitude": 77.2,
            "timezone": 5.5
        }))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let chart = body_json(res.body());

    let planets = chart["planets"].as_object().unwrap();
    assert_eq!(planets.len(), 9);
    for name in ["Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Rahu", "Ketu"] {
        assert!(planets.contains_key(name), "missing {}", name);
        let lon = planets[name]["longitude"].as_f64().unwrap();
        assert!((0.0..360.0).contains(&lon));
    }

    let rahu = planets["Rahu"]["longitude"].as_f64().unwrap();
    let ketu = planets["Ketu"]["longitude"].as_f64().unwrap();
    assert!(((rahu + 180.0) % 360.0 - ketu).abs() < 1e-9);

    // synthetic positions follow the local date (Jan 1), not the UT date (Dec 31)
    let sun = planets["Sun"]["longitude"].as_f64().unwrap();
    assert!((sun - 222.0).abs() < 1e-9, "sun = {}", sun);
    let asc = chart["houses"]["ascendant"]["longitude"].as_f64().unwrap();
    assert!((asc - (1.0 + 77.2 / 15.0) * 0.98).abs() < 1e-9, "asc = {}", asc);
    assert!(chart["houses"]["mc"]["longitude"].is_number());

    let jd = chart["input"]["julian_day"].as_f64().unwrap();
    assert!((jd - (2451544.5 - 5.5 / 24.0)).abs() < 1e-4);
    assert_eq!(chart["demo_mode"], json!(true));
}

#[tokio::test]
async fn missing_date_is_rejected_without_planets() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .json(&json!({ "time": "12:00", "latitude": 28.6, "longitude": 77.2 }))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert!(body.get("planets").is_none());
    assert_eq!(body["missing"], json!(["date"]));
    assert!(body["required_format"].is_object());
}

#[tokio::test]
async fn lists_every_missing_field() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .json(&json!({}))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert_eq!(body["missing"], json!(["date", "time", "latitude", "longitude"]));
}

#[tokio::test]
async fn bad_date_is_a_client_error() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .json(&json!({
            "date": "2000-02-30",
            "time": "10:00",
            "latitude": 0,
            "longitude": 0
        }))
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert!(body["message"].as_str().unwrap().contains("2000-02-30"));
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .header("content-type", "application/json")
        .body("{\"date\": ")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res.body());
    assert!(body["required_format"].is_object());
}

#[tokio::test]
async fn accepts_form_bodies_and_numeric_strings() {
    let api = routes(service(), Instant::now());
    let res = request()
        .method("POST")
        .path("/calculate")
        .header("content-type", "application/x-www-form-urlencoded")
        .body("date=1990-06-15&time=14%3A30&latitude=51.5&longitude=-0.12&timezone=1")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let chart = body_json(res.body());
    assert_eq!(chart["input"]["latitude"], json!(51.5));
    assert_eq!(chart["input"]["timezone"], json!(1.0));
}

#[tokio::test]
async fn current_planets_cover_the_visible_bodies() {
    let api = routes(service(), Instant::now());
    let res = request().method("GET").path("/planets").reply(&api).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let planets = body["planets"].as_object().unwrap();
    assert_eq!(planets.len(), 7);
    assert!(!planets.contains_key("Rahu"));
    assert!(body["note"].is_string());
}

#[tokio::test]
async fn reference_tables() {
    let api = routes(service(), Instant::now());

    let signs = request().method("GET").path("/signs").reply(&api).await;
    assert_eq!(signs.status(), StatusCode::OK);
    assert_eq!(body_json(signs.body())["zodiac_signs"].as_array().unwrap().len(), 12);

    let nakshatras = request().method("GET").path("/nakshatras").reply(&api).await;
    assert_eq!(nakshatras.status(), StatusCode::OK);
    let table = body_json(nakshatras.body());
    assert_eq!(table["nakshatras"].as_array().unwrap().len(), 27);
    assert_eq!(table["nakshatras"][0]["name"], json!("Ashwini"));
}

#[tokio::test]
async fn health_and_info() {
    let api = routes(service(), Instant::now());

    let health = request().method("GET").path("/health").reply(&api).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body = body_json(health.body());
    assert_eq!(body["status"], json!("OK"));
    assert_eq!(body["mode"], json!("synthetic"));

    let info = request().method("GET").path("/").reply(&api).await;
    assert_eq!(info.status(), StatusCode::OK);
    assert!(body_json(info.body())["endpoints"]["POST /calculate"].is_string());
}

#[tokio::test]
async fn unknown_route_lists_endpoints() {
    let api = routes(service(), Instant::now());
    let res = request().method("GET").path("/horoscope").reply(&api).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res.body());
    assert_eq!(body["error"], json!("Endpoint not found"));
    assert_eq!(body["available_endpoints"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn wrong_method_falls_through_to_not_found() {
    let api = routes(service(), Instant::now());
    let res = request().method("GET").path("/calculate").reply(&api).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
