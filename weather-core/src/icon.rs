use serde::Serialize;
use std::fmt;

/// Icon shown for a provider weather-condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
}

impl WeatherIcon {
    /// Classify a provider condition code.
    pub fn from_condition_id(id: i64) -> Self {
        match id {
            i64::MIN..=232 => WeatherIcon::Thunderstorm,
            233..=321 => WeatherIcon::Drizzle,
            322..=531 => WeatherIcon::Rain,
            532..=622 => WeatherIcon::Snow,
            623..=781 => WeatherIcon::Atmosphere,
            800 => WeatherIcon::Clear,
            _ => WeatherIcon::Clouds,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Thunderstorm => "thunderstorm",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Atmosphere => "atmosphere",
            WeatherIcon::Clear => "clear",
            WeatherIcon::Clouds => "clouds",
        }
    }

    pub fn asset_path(&self) -> String {
        format!("/assets/weather/{}.svg", self.as_str())
    }

    pub const fn all() -> &'static [WeatherIcon] {
        &[
            WeatherIcon::Thunderstorm,
            WeatherIcon::Drizzle,
            WeatherIcon::Rain,
            WeatherIcon::Snow,
            WeatherIcon::Atmosphere,
            WeatherIcon::Clear,
            WeatherIcon::Clouds,
        ]
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
