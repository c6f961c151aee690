use crate::provider::openweather::OpenWeatherProvider;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod openweather;

/// How a provider call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error(
        "provider responded with status {status}: {}",
        .message.as_deref().unwrap_or("<no message>")
    )]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    /// No usable response arrived.
    #[error("provider request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Raw current-weather payload for `city`.
    async fn current_weather(&self, city: &str) -> Result<Value, ProviderError>;

    /// Raw forecast payload for `city`.
    async fn forecast(&self, city: &str) -> Result<Value, ProviderError>;
}

/// Construct a provider when a credential is available.
///
/// Blank keys count as missing.
pub fn provider_from_key(
    api_key: Option<&str>,
    base_url: &str,
) -> Option<Box<dyn WeatherProvider>> {
    let api_key = api_key.map(str::trim).filter(|key| !key.is_empty())?;
    let provider = OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url.to_owned());
    Some(Box::new(provider))
}
