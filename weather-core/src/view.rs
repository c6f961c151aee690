//! Turns backend payloads into render-ready view models.
//!
//! Current weather and forecast fail differently: a bad current-weather
//! payload yields [`NotFoundSignal`] so the caller can change route, while a
//! bad forecast only yields a note inside the weather view.

use chrono::{Local, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::icon::WeatherIcon;
use crate::model::{
    ForecastItem, ForecastNote, ForecastViewModel, OwCurrentResponse, OwForecastEntry,
    OwForecastResponse, ProviderResult, WeatherViewModel,
};

/// Time of day used to pick one forecast entry per day.
pub const REFERENCE_TIME_OF_DAY: &str = "12:00:00";

/// Upper bound on forecast items shown.
pub const MAX_FORECAST_DAYS: usize = 4;

/// The current-weather fetch did not produce usable data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("weather data not found")]
pub struct NotFoundSignal;

/// Dates a render pass is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDate {
    /// Shown as the current-weather date label.
    pub local: NaiveDate,
    /// Forecast entries on this day are skipped. The provider's timestamps are UTC.
    pub utc: NaiveDate,
}

impl RenderDate {
    pub fn now() -> Self {
        Self {
            local: Local::now().date_naive(),
            utc: Utc::now().date_naive(),
        }
    }
}

pub fn build_weather_view(
    result: &ProviderResult,
    today: NaiveDate,
) -> Result<WeatherViewModel, NotFoundSignal> {
    if !result.is_ok() {
        let message = result.message().unwrap_or("Unknown error");
        log::error!("Weather data error: {message}");
        return Err(NotFoundSignal);
    }
    let ProviderResult::Success { payload } = result else {
        return Err(NotFoundSignal);
    };

    let parsed: OwCurrentResponse = serde_json::from_value(payload.clone()).map_err(|err| {
        log::error!("Failed to parse current weather payload: {err}");
        NotFoundSignal
    })?;

    let Some(condition) = parsed.weather.first() else {
        log::error!("No weather conditions for {:?}", parsed.name);
        return Err(NotFoundSignal);
    };

    Ok(WeatherViewModel {
        location_label: parsed.name.clone(),
        temperature_celsius: round_half_up(parsed.main.temp),
        condition: condition.main.clone(),
        humidity_percent: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        icon_key: WeatherIcon::from_condition_id(condition.id),
        date_label: weekday_date_label(today),
    })
}

pub fn build_forecast_view(result: &ProviderResult, today: NaiveDate) -> ForecastViewModel {
    if !result.is_ok() {
        let message = result.message().unwrap_or("Unknown error");
        log::error!("Forecast data error: {message}");
        return ForecastViewModel::with_note(ForecastNote::CouldNotLoad);
    }
    let ProviderResult::Success { payload } = result else {
        return ForecastViewModel::with_note(ForecastNote::CouldNotLoad);
    };

    let parsed: OwForecastResponse = match serde_json::from_value(payload.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("Failed to parse forecast payload: {err}");
            return ForecastViewModel::with_note(ForecastNote::CouldNotLoad);
        }
    };

    // Only the selected entries have to be well formed.
    let mut items = Vec::new();
    for entry in select_daily_entries(&parsed.list, today) {
        match serde_json::from_value::<OwForecastEntry>(entry.clone()) {
            Ok(entry) => items.push(forecast_item(&entry)),
            Err(err) => {
                log::error!("Failed to parse forecast entry: {err}");
                return ForecastViewModel::with_note(ForecastNote::CouldNotLoad);
            }
        }
    }

    if items.is_empty() {
        ForecastViewModel::with_note(ForecastNote::NoneAvailable)
    } else {
        ForecastViewModel { items, note: None }
    }
}

/// Entries sampled at [`REFERENCE_TIME_OF_DAY`] on days other than `today`,
/// in input order, capped at [`MAX_FORECAST_DAYS`].
///
/// Timestamps are read from `dt_txt` and compared lexically in the provider's
/// `YYYY-MM-DD HH:MM:SS` form. Any other format, or no `dt_txt` at all,
/// matches nothing.
pub fn select_daily_entries(entries: &[Value], today: NaiveDate) -> Vec<&Value> {
    let today = today.format("%Y-%m-%d").to_string();
    entries
        .iter()
        .filter(|entry| {
            let stamp = entry.get("dt_txt").and_then(Value::as_str);
            match stamp.and_then(|stamp| stamp.split_once(' ')) {
                Some((date, time)) => time == REFERENCE_TIME_OF_DAY && date != today,
                None => false,
            }
        })
        .take(MAX_FORECAST_DAYS)
        .collect()
}

fn forecast_item(entry: &OwForecastEntry) -> ForecastItem {
    let date = match entry.dt_txt.split_once(' ') {
        Some((date, _)) => date,
        None => entry.dt_txt.as_str(),
    };
    let date_label = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|date| date.format("%b %d").to_string())
        .unwrap_or_else(|_| date.to_string());

    // Entries without a condition render as cloudy.
    let icon_key = entry
        .weather
        .first()
        .map(|condition| WeatherIcon::from_condition_id(condition.id))
        .unwrap_or(WeatherIcon::Clouds);

    ForecastItem {
        date_label,
        icon_key,
        temperature_celsius: round_half_up(entry.main.temp),
    }
}

/// e.g. "Mon, 05 Feb"
pub fn weekday_date_label(date: NaiveDate) -> String {
    date.format("%a, %d %b").to_string()
}

/// Halves round toward positive infinity, so -2.5 becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
