// src/services/chart.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::{debug, error, info};

use super::calendar::{julian_day, synthetic_julian_day};
use super::provider::{PositionProvider, ProviderMode};
use crate::error::{ChartError, ValidationError};
use crate::models::{
    round_julian_day, CalculateRequest, CelestialBody, Chart, ChartTime, CivilMoment, CurrentPositions,
    InputEcho, NumberOrString, PlacedPosition, PlanetTable, ALL_BODIES, VISIBLE_BODIES,
};

pub const DEMO_CHART_NOTE: &str = "This is demo data with realistic astronomical movements. \
For actual astrological use, run the service with a real ephemeris (EPHEMERIS_MODE=ephemeris).";

pub const DEMO_PLANETS_NOTE: &str =
    "Current planetary positions (demo). Planets move realistically over time but are not astronomically accurate.";

/// Largest UTC offset in use anywhere (UTC+14, Line Islands).
const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInput {
    pub date: String,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: f64,
}

/// Check that date, time, latitude and longitude are present and usable.
pub fn validate_request(request: &CalculateRequest) -> Result<ChartInput, ValidationError> {
    let mut problems = ValidationError::default();

    let date = present_text(&request.date);
    if date.is_none() {
        problems.missing.push("date");
    }
    let time = present_text(&request.time);
    if time.is_none() {
        problems.missing.push("time");
    }

    let latitude = numeric_field(&request.latitude, "latitude", 90.0, &mut problems);
    let longitude = numeric_field(&request.longitude, "longitude", 180.0, &mut problems);

    let timezone = match &request.timezone {
        None => Some(0.0),
        Some(raw) => match raw.to_f64() {
            Some(tz) if tz.abs() <= MAX_UTC_OFFSET_HOURS => Some(tz),
            Some(_) => {
                problems
                    .invalid
                    .push(format!("timezone must be within [-{0}, {0}] hours", MAX_UTC_OFFSET_HOURS));
                None
            }
            None => {
                problems.invalid.push("timezone must be a number".to_string());
                None
            }
        },
    };

    match (date, time, latitude, longitude, timezone) {
        (Some(date), Some(time), Some(latitude), Some(longitude), Some(timezone)) if problems.is_empty() => {
            Ok(ChartInput {
                date,
                time,
                latitude,
                longitude,
                timezone,
            })
        }
        _ => Err(problems),
    }
}

fn present_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn numeric_field(
    value: &Option<NumberOrString>,
    name: &'static str,
    limit: f64,
    problems: &mut ValidationError,
) -> Option<f64> {
    let Some(raw) = value else {
        problems.missing.push(name);
        return None;
    };
    match raw.to_f64() {
        Some(n) if n.abs() <= limit => Some(n),
        Some(_) => {
            problems.invalid.push(format!("{} must be within [-{}, {}]", name, limit, limit));
            None
        }
        None => {
            problems.invalid.push(format!("{} must be a number", name));
            None
        }
    }
}

fn positions_for(
    provider: &dyn PositionProvider,
    at: ChartTime,
    bodies: &[CelestialBody],
) -> Result<PlanetTable, ChartError> {
    bodies
        .iter()
        .map(|&body| {
            provider
                .position_of(at, body)
                .map(|position| (body, PlacedPosition::new(position)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(PlanetTable)
}

/// Build the full chart for validated input. Any failing body fails the chart.
pub fn assemble_chart(
    provider: &dyn PositionProvider,
    input: &ChartInput,
    now: DateTime<Utc>,
) -> Result<Chart, ChartError> {
    let moment = CivilMoment::parse(&input.date, &input.time, input.timezone)?;
    let at = ChartTime::from_civil(&moment);
    let jd = at.jd;
    debug!("{} {} (UTC{:+}) -> JD {}", input.date, input.time, input.timezone, jd.0);

    let ayanamsa = provider.ayanamsa(jd)?;
    let planets = positions_for(provider, at, &ALL_BODIES)?;
    let houses = provider.houses_of(at, input.latitude, input.longitude)?;
    let demo_mode = provider.mode().is_demo();

    Ok(Chart {
        input: InputEcho {
            date: input.date.clone(),
            time: input.time.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
            timezone: input.timezone,
            julian_day: round_julian_day(jd.0),
        },
        ayanamsa,
        planets,
        houses,
        calculation_time: now,
        demo_mode,
        note: demo_mode.then_some(DEMO_CHART_NOTE),
    })
}

/// Positions of the seven visible bodies at `now`.
pub fn current_positions_at(
    provider: &dyn PositionProvider,
    now: DateTime<Utc>,
) -> Result<CurrentPositions, ChartError> {
    let moment = CivilMoment {
        year: now.year(),
        month: now.month(),
        day: now.day(),
        hour: now.hour(),
        minute: now.minute(),
        second: now.second(),
        utc_offset_hours: 0.0,
    };
    let jd = julian_day(&moment);
    let planets = positions_for(provider, ChartTime::at_ut(jd), &VISIBLE_BODIES)?;
    let demo_mode = provider.mode().is_demo();

    let reported_jd = if demo_mode {
        synthetic_julian_day(&moment)
    } else {
        jd.0
    };

    Ok(CurrentPositions {
        timestamp: now,
        julian_day: round_julian_day(reported_jd),
        planets,
        demo_mode,
        note: demo_mode.then_some(DEMO_PLANETS_NOTE),
    })
}

/// Runs chart computations off the async workers, under a time limit.
#[derive(Clone)]
pub struct ChartService {
    provider: Arc<dyn PositionProvider>,
    timeout: Duration,
}

impl ChartService {
    pub fn new(provider: Arc<dyn PositionProvider>, timeout: Duration) -> Self {
        ChartService { provider, timeout }
    }

    pub fn mode(&self) -> ProviderMode {
        self.provider.mode()
    }

    pub async fn calculate(&self, request: CalculateRequest) -> Result<Chart, ChartError> {
        let input = validate_request(&request)?;
        info!(
            "Calculating chart for {} {} at ({}, {}) UTC{:+}",
            input.date, input.time, input.latitude, input.longitude, input.timezone
        );

        let provider = Arc::clone(&self.provider);
        self.run_blocking(move || assemble_chart(provider.as_ref(), &input, Utc::now()))
            .await
    }

    pub async fn current_positions(&self) -> Result<CurrentPositions, ChartError> {
        let provider = Arc::clone(&self.provider);
        self.run_blocking(move || current_positions_at(provider.as_ref(), Utc::now()))
            .await
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, ChartError>
    where
        F: FnOnce() -> Result<T, ChartError> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(job)).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                error!("Chart computation task failed: {}", join_error);
                Err(ChartError::Internal(join_error.to_string()))
            }
            Err(_) => {
                error!("Chart computation exceeded {} ms", self.timeout.as_millis());
                Err(ChartError::Computation(format!(
                    "Ephemeris computation timed out after {} ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EclipticPosition, HousesResult, JulianDay};
    use crate::services::synthetic::SyntheticProvider;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CalculateRequest {
        serde_json::from_value(value).unwrap()
    }

    fn delhi_2000() -> CalculateRequest {
        request(json!({
            "date": "2000-01-01",
            "time": "00:00",
            "latitude": 28.6,
            "longitude": 77.2,
            "timezone": 5.5
        }))
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_latitude_is_reported() {
        let err = validate_request(&request(json!({
            "date": "2000-01-01",
            "time": "00:00",
            "longitude": 77.2
        })))
        .unwrap_err();
        assert_eq!(err.missing, vec!["latitude"]);
        assert!(err.invalid.is_empty());
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let err = validate_request(&CalculateRequest::default()).unwrap_err();
        assert_eq!(err.missing, vec!["date", "time", "latitude", "longitude"]);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let err = validate_request(&request(json!({
            "date": "  ",
            "time": "00:00",
            "latitude": 1,
            "longitude": 2
        })))
        .unwrap_err();
        assert_eq!(err.missing, vec!["date"]);
    }

    #[test]
    fn out_of_range_and_non_numeric_fields_are_invalid() {
        let err = validate_request(&request(json!({
            "date": "2000-01-01",
            "time": "00:00",
            "latitude": 95.0,
            "longitude": "east",
            "timezone": 20
        })))
        .unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.invalid.len(), 3);
        assert!(err.invalid[0].starts_with("latitude"));
        assert!(err.invalid[1].starts_with("longitude"));
        assert!(err.invalid[2].starts_with("timezone"));
    }

    #[test]
    fn timezone_defaults_to_utc() {
        let input = validate_request(&request(json!({
            "date": "2000-01-01",
            "time": "00:00",
            "latitude": "28.6",
            "longitude": "77.2"
        })))
        .unwrap();
        assert_eq!(input.timezone, 0.0);
        assert_eq!(input.latitude, 28.6);
    }

    #[test]
    fn end_to_end_synthetic_chart() {
        let provider = SyntheticProvider::with_seed(11);
        let input = validate_request(&delhi_2000()).unwrap();
        let chart = assemble_chart(&provider, &input, fixed_now()).unwrap();

        assert_eq!(chart.planets.len(), 9);
        for body in ALL_BODIES {
            assert!(chart.planets.get(body).is_some(), "{:?} missing", body);
        }
        let expected_jd = 2_451_544.5 - 5.5 / 24.0;
        assert!((chart.input.julian_day - expected_jd).abs() < 1e-4, "jd {}", chart.input.julian_day);
        assert_eq!(chart.ayanamsa, 24.1267);
        assert!(chart.demo_mode);
        assert_eq!(chart.calculation_time, fixed_now());

        let value = serde_json::to_value(&chart).unwrap();
        assert!(value["houses"]["ascendant"]["nakshatra"]["name"].is_string());
        assert!(value["houses"]["mc"]["sign"]["formatted"].is_string());
        assert_eq!(value["input"]["timezone"], json!(5.5));

        // local date is Jan 1 even though the UT date is Dec 31
        let sun = chart.planets.get(CelestialBody::Sun).unwrap();
        assert!((sun.position.longitude - 222.0).abs() < 1e-9);
        assert_eq!(sun.sign.sign.name(), "Scorpio");
    }

    #[test]
    fn parse_errors_surface_before_computation() {
        let provider = SyntheticProvider::new();
        let input = ChartInput {
            date: "2000-02-30".into(),
            time: "00:00".into(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: 0.0,
        };
        let err = assemble_chart(&provider, &input, fixed_now()).unwrap_err();
        assert!(matches!(err, ChartError::Parse(_)));
    }

    struct FailingMoon;

    impl PositionProvider for FailingMoon {
        fn mode(&self) -> ProviderMode {
            ProviderMode::Ephemeris
        }

        fn ayanamsa(&self, _jd: JulianDay) -> Result<f64, ChartError> {
            Ok(23.85)
        }

        fn position_of(&self, _at: ChartTime, body: CelestialBody) -> Result<EclipticPosition, ChartError> {
            if body == CelestialBody::Moon {
                return Err(ChartError::Computation("illegal planet number 1".into()));
            }
            Ok(EclipticPosition::from_motion(10.0, 0.0, 1.0, 1.0))
        }

        fn houses_of(&self, _at: ChartTime, _lat: f64, _lon: f64) -> Result<HousesResult, ChartError> {
            Ok(HousesResult::from_angles(0.0, 270.0))
        }
    }

    #[test]
    fn one_failing_body_fails_the_chart() {
        let input = validate_request(&delhi_2000()).unwrap();
        let err = assemble_chart(&FailingMoon, &input, fixed_now()).unwrap_err();
        assert_eq!(err, ChartError::Computation("illegal planet number 1".into()));
    }

    #[test]
    fn current_positions_cover_visible_bodies() {
        let provider = SyntheticProvider::with_seed(5);
        let current = current_positions_at(&provider, fixed_now()).unwrap();
        assert_eq!(current.planets.len(), 7);
        assert!(current.planets.get(CelestialBody::Rahu).is_none());
        assert!(current.demo_mode);
        // 2024-05-01 12:00 UT is JD 2460432.0
        assert!((current.julian_day - 2_460_432.0).abs() < 1.0);
    }

    #[test]
    fn ephemeris_mode_reports_calendar_julian_day() {
        let current = current_positions_at(&FixedProvider, fixed_now()).unwrap();
        assert!((current.julian_day - 2_460_432.0).abs() < 1e-6);
        assert!(!current.demo_mode);
        assert!(current.note.is_none());
    }

    struct FixedProvider;

    impl PositionProvider for FixedProvider {
        fn mode(&self) -> ProviderMode {
            ProviderMode::Ephemeris
        }

        fn ayanamsa(&self, _jd: JulianDay) -> Result<f64, ChartError> {
            Ok(23.85)
        }

        fn position_of(&self, _at: ChartTime, _body: CelestialBody) -> Result<EclipticPosition, ChartError> {
            Ok(EclipticPosition::from_motion(10.0, 0.0, 1.0, 1.0))
        }

        fn houses_of(&self, _at: ChartTime, _lat: f64, _lon: f64) -> Result<HousesResult, ChartError> {
            Ok(HousesResult::from_angles(0.0, 270.0))
        }
    }

    struct SlowProvider;

    impl PositionProvider for SlowProvider {
        fn mode(&self) -> ProviderMode {
            ProviderMode::Ephemeris
        }

        fn ayanamsa(&self, _jd: JulianDay) -> Result<f64, ChartError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(23.85)
        }

        fn position_of(&self, _at: ChartTime, _body: CelestialBody) -> Result<EclipticPosition, ChartError> {
            Ok(EclipticPosition::from_motion(0.0, 0.0, 1.0, 1.0))
        }

        fn houses_of(&self, _at: ChartTime, _lat: f64, _lon: f64) -> Result<HousesResult, ChartError> {
            Ok(HousesResult::from_angles(0.0, 270.0))
        }
    }

    #[tokio::test]
    async fn slow_engine_times_out_as_computation_error() {
        let service = ChartService::new(Arc::new(SlowProvider), Duration::from_millis(20));
        let err = service.calculate(delhi_2000()).await.unwrap_err();
        match err {
            ChartError::Computation(message) => assert!(message.contains("timed out")),
            other => panic!("expected computation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn validation_happens_before_any_computation() {
        let service = ChartService::new(Arc::new(SlowProvider), Duration::from_millis(20));
        let err = service
            .calculate(request(json!({ "date": "2000-01-01", "time": "00:00", "longitude": 77.2 })))
            .await
            .unwrap_err();
        match err {
            ChartError::Validation(v) => assert_eq!(v.missing, vec!["latitude"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn service_calculates_with_synthetic_provider() {
        let service = ChartService::new(Arc::new(SyntheticProvider::with_seed(9)), Duration::from_secs(5));
        let chart = service.calculate(delhi_2000()).await.unwrap();
        assert_eq!(chart.planets.len(), 9);
        assert_eq!(service.mode(), ProviderMode::Synthetic);
    }
}
