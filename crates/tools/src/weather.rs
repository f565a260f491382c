//! OpenWeatherMap Current Weather

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use agent_stack_core::{Secret, ToolKind};

use crate::error::ToolResult;
use crate::http::send_json;
use crate::trait_def::StackTool;

const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const TOOL_NAME: &str = "Weather";

/// Current conditions for one location, metric units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub description: String,
    pub wind_speed: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl WeatherReport {
    pub fn summary(&self) -> String {
        let place = if self.country.is_empty() {
            self.location.clone()
        } else {
            format!("{}, {}", self.location, self.country)
        };
        let mut text = format!(
            "Weather in {}: {}, {:.1}°C (feels like {:.1}°C), humidity {}%, wind {:.1} m/s",
            place, self.description, self.temperature, self.feels_like, self.humidity, self.wind_speed
        );
        if let Some(ts) = self.timestamp {
            text.push_str(&format!(" (observed {})", ts.format("%Y-%m-%d %H:%M UTC")));
        }
        text
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: OwmSys,
    #[serde(default)]
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    dt: i64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

impl From<OwmResponse> for WeatherReport {
    fn from(data: OwmResponse) -> Self {
        let timestamp = match data.dt {
            0 => None,
            dt => Utc.timestamp_opt(dt, 0).single(),
        };
        Self {
            location: data.name,
            country: data.sys.country,
            temperature: data.main.temp,
            feels_like: data.main.feels_like,
            humidity: data.main.humidity,
            description: data
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_default(),
            wind_speed: data.wind.speed,
            timestamp,
        }
    }
}

/// Weather tool. Requires an OpenWeatherMap API key.
pub struct WeatherTool {
    name: String,
    api_key: Secret,
    client: reqwest::Client,
    api_url: String,
}

impl WeatherTool {
    pub fn new(name: Option<String>, api_key: Secret, client: reqwest::Client) -> Self {
        Self {
            name: name.unwrap_or_else(|| TOOL_NAME.to_string()),
            api_key,
            client,
            api_url: OPENWEATHER_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Current weather for a location name such as `"Paris"` or `"Austin,US"`.
    pub async fn current(&self, location: &str) -> ToolResult<WeatherReport> {
        let request = self.client.get(&self.api_url).query(&[
            ("q", location),
            ("appid", self.api_key.expose()),
            ("units", "metric"),
        ]);
        let data: OwmResponse = send_json(request, TOOL_NAME).await?;
        Ok(WeatherReport::from(data))
    }
}

/// Pull a location out of a free-text request.
///
/// Takes whatever follows the last " in ", " for " or " at ", trimmed of
/// trailing punctuation; falls back to the whole text.
pub fn extract_location(text: &str) -> String {
    // ASCII lowering keeps byte offsets valid for `text`.
    let lower = text.to_ascii_lowercase();
    let start = [" in ", " for ", " at "]
        .iter()
        .filter_map(|marker| lower.rfind(marker).map(|idx| idx + marker.len()))
        .max();
    let candidate = match start {
        Some(idx) => &text[idx..],
        None => text,
    };
    candidate
        .trim()
        .trim_end_matches(|c: char| c == '?' || c == '!' || c == '.')
        .trim()
        .to_string()
}

#[async_trait]
impl StackTool for WeatherTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Weather
    }

    fn supports_process(&self) -> bool {
        true
    }

    async fn process(&self, text: &str) -> ToolResult<Option<String>> {
        let location = extract_location(text);
        if location.is_empty() {
            return Ok(None);
        }
        tracing::debug!("[Weather] looking up '{}'", location);
        let report = self.current(&location).await?;
        Ok(Some(report.summary()))
    }
}
