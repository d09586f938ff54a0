//! OpenWeather current-conditions client

use std::time::Duration;

use serde::Deserialize;

use crate::state::{LookupTarget, Unit, WeatherResult};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Lookup error type
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed provider response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("provider response has no weather condition")]
    MissingCondition,
}

// ============================================================================
// Response shape (only the consumed fields)
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    #[serde(default)]
    sys: Option<Sys>,
    main: Main,
    wind: Wind,
    #[serde(default)]
    visibility: Option<u32>,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    id: u32,
    main: String,
    description: String,
}

impl CurrentResponse {
    fn into_result(self, unit: Unit) -> Result<WeatherResult, LookupError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(LookupError::MissingCondition)?;

        Ok(WeatherResult {
            city: self.name,
            country: self.sys.and_then(|sys| sys.country).unwrap_or_default(),
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            condition: condition.main,
            description: condition.description,
            condition_id: condition.id,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
            visibility: self.visibility,
            unit,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch current conditions for a city name or a coordinate pair.
    pub async fn current(
        &self,
        target: &LookupTarget,
        unit: Unit,
    ) -> Result<WeatherResult, LookupError> {
        let mut query: Vec<(&str, String)> = match target {
            LookupTarget::City(city) => vec![("q", city.clone())],
            LookupTarget::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        query.push(("appid", self.api_key.clone()));
        query.push(("units", unit.as_param().to_string()));

        tracing::debug!(lookup = ?target, units = unit.as_param(), "requesting current weather");

        let response = self.http.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: CurrentResponse = serde_json::from_str(&body)?;
        parsed.into_result(unit)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
