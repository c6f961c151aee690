use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::icon::WeatherIcon;

/// A city lookup as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    /// Returns `None` when nothing is left after trimming.
    pub fn parse(input: &str) -> Option<Self> {
        let city = input.trim();
        if city.is_empty() {
            None
        } else {
            Some(Self {
                city: city.to_string(),
            })
        }
    }
}

/// Outcome of fetching JSON from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Success { payload: Value },
    Failure { status_code: u16, message: String },
}

impl ProviderResult {
    /// The provider's `cod` field as a string.
    ///
    /// The provider sends it as a number for current weather and as a string
    /// for forecasts, so both are normalized here. Failures report their HTTP
    /// status instead.
    pub fn code(&self) -> String {
        match self {
            ProviderResult::Success { payload } => match payload.get("cod") {
                Some(Value::String(code)) => code.clone(),
                Some(Value::Number(code)) => code.to_string(),
                _ => String::new(),
            },
            ProviderResult::Failure { status_code, .. } => status_code.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code() == "200"
    }

    /// Human-readable failure reason, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ProviderResult::Success { payload } => payload.get("message").and_then(Value::as_str),
            ProviderResult::Failure { message, .. } => Some(message.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherViewModel {
    pub location_label: String,
    pub temperature_celsius: i64,
    pub condition: String,
    pub humidity_percent: i64,
    pub wind_speed: f64,
    pub icon_key: WeatherIcon,
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastItem {
    pub date_label: String,
    pub icon_key: WeatherIcon,
    pub temperature_celsius: i64,
}

/// Why the forecast strip shows a note instead of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastNote {
    CouldNotLoad,
    NoneAvailable,
}

impl ForecastNote {
    pub fn message(&self) -> &'static str {
        match self {
            ForecastNote::CouldNotLoad => "Could not load forecast.",
            ForecastNote::NoneAvailable => "No forecast available for upcoming days at 12:00.",
        }
    }
}

/// At most four daily items in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ForecastViewModel {
    pub items: Vec<ForecastItem>,
    pub note: Option<ForecastNote>,
}

impl ForecastViewModel {
    pub fn with_note(note: ForecastNote) -> Self {
        Self {
            items: Vec::new(),
            note: Some(note),
        }
    }
}

// Provider payload shapes. Only the fields the view models read are declared.

#[derive(Debug, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: i64,
}

#[derive(Debug, Deserialize)]
pub struct OwCondition {
    pub id: i64,
    #[serde(default)]
    pub main: String,
}

#[derive(Debug, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub main: OwMain,
    pub weather: Vec<OwCondition>,
    pub wind: OwWind,
}

#[derive(Debug, Deserialize)]
pub struct OwForecastEntry {
    pub dt_txt: String,
    pub main: OwMain,
    pub weather: Vec<OwCondition>,
}

/// Entries stay raw until selected, so a malformed entry outside the
/// selection cannot spoil the forecast.
#[derive(Debug, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<Value>,
}
