use std::fmt::Write;

use weather_core::{ForecastItem, ForecastViewModel, ViewState, WeatherViewModel};

/// Paint a view as plain text.
pub fn render(view: &ViewState) -> String {
    match view {
        ViewState::Hidden => String::new(),
        ViewState::Search => {
            "Search City\nStart typing a city name to see its weather.".to_string()
        }
        ViewState::NotFound { message } => format!("Search City Not Found\n{message}"),
        ViewState::Weather { weather, forecast } => {
            let mut out = render_weather(weather);
            out.push('\n');
            out.push_str(&render_forecast(forecast));
            out
        }
    }
}

fn render_weather(weather: &WeatherViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", weather.location_label, weather.date_label);
    let _ = writeln!(
        out,
        "{} °C  {}  [{}]",
        weather.temperature_celsius, weather.condition, weather.icon_key
    );
    let _ = write!(
        out,
        "Humidity {}%  Wind Speed {} M/s",
        weather.humidity_percent, weather.wind_speed
    );
    out
}

fn render_forecast(forecast: &ForecastViewModel) -> String {
    if let Some(note) = forecast.note {
        return note.message().to_string();
    }

    forecast
        .items
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_item(item: &ForecastItem) -> String {
    format!(
        "{}  [{}]  {} °C",
        item.date_label, item.icon_key, item.temperature_celsius
    )
}
