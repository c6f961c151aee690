//! The two backend endpoints and how their failures are reported.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::provider::{ProviderError, WeatherProvider, provider_from_key};

pub const CONFIGURATION_ERROR_MESSAGE: &str = "Server configuration error: API key missing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Weather,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
        }
    }

    /// Used when the provider rejects a request without saying why.
    pub fn upstream_fallback(&self) -> &'static str {
        match self {
            Endpoint::Weather => "Error fetching weather data",
            Endpoint::Forecast => "Error fetching forecast data",
        }
    }

    /// Used when no response came back at all.
    pub fn transport_fallback(&self) -> &'static str {
        match self {
            Endpoint::Weather => "Internal server error while fetching weather",
            Endpoint::Forecast => "Internal server error while fetching forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-request failure. Each variant knows its HTTP status and the
/// message sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    #[error("Server configuration error: API key missing")]
    Configuration,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{message}")]
    Transport { message: String, cause: String },
}

impl ProxyError {
    pub fn from_provider(endpoint: Endpoint, err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, message } => ProxyError::Upstream {
                status,
                message: message.unwrap_or_else(|| endpoint.upstream_fallback().to_string()),
            },
            ProviderError::Transport(cause) => ProxyError::Transport {
                message: endpoint.transport_fallback().to_string(),
                cause,
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::Configuration | ProxyError::Transport { .. } => 500,
            ProxyError::Upstream { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ProxyError::Configuration => CONFIGURATION_ERROR_MESSAGE,
            ProxyError::Upstream { message, .. } | ProxyError::Transport { message, .. } => message,
        }
    }
}

/// Holds the provider, if a credential was configured. Carries no other
/// state between requests.
#[derive(Debug, Clone)]
pub struct ProxyEndpoints {
    provider: Option<Arc<dyn WeatherProvider>>,
}

impl ProxyEndpoints {
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>) -> Self {
        Self { provider }
    }

    pub fn from_settings(api_key: Option<&str>, provider_url: &str) -> Self {
        Self::new(provider_from_key(api_key, provider_url).map(Arc::from))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn current_weather(&self, city: &str) -> Result<Value, ProxyError> {
        self.call(Endpoint::Weather, city).await
    }

    pub async fn forecast(&self, city: &str) -> Result<Value, ProxyError> {
        self.call(Endpoint::Forecast, city).await
    }

    async fn call(&self, endpoint: Endpoint, city: &str) -> Result<Value, ProxyError> {
        let Some(provider) = &self.provider else {
            log::error!("API key is missing, refusing {endpoint} request for {city:?}");
            return Err(ProxyError::Configuration);
        };

        let result = match endpoint {
            Endpoint::Weather => provider.current_weather(city).await,
            Endpoint::Forecast => provider.forecast(city).await,
        };

        result.map_err(|err| {
            log::error!("Error fetching {endpoint} for {city:?}: {err}");
            ProxyError::from_provider(endpoint, err)
        })
    }
}
