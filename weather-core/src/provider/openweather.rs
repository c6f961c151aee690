use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch(&self, resource: &str, city: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/{resource}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| {
                ProviderError::Transport(format!(
                    "Failed to send request to OpenWeather ({resource}): {err}"
                ))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            ProviderError::Transport(format!(
                "Failed to read OpenWeather {resource} response body: {err}"
            ))
        })?;

        if !status.is_success() {
            log::debug!(
                "OpenWeather {resource} request failed with status {status}: {}",
                truncate_body(&body)
            );
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            ProviderError::Transport(format!(
                "Failed to parse OpenWeather {resource} JSON: {err}: {}",
                truncate_body(&body)
            ))
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<Value, ProviderError> {
        self.fetch("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<Value, ProviderError> {
        self.fetch("forecast", city).await
    }
}

/// The `message` field of an error body, when the body is JSON and has one.
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_owned)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> OpenWeatherProvider {
        OpenWeatherProvider::with_base_url("KEY".into(), base_url)
    }

    #[tokio::test]
    async fn current_weather_passes_payload_through() {
        let mock_server = MockServer::start().await;
        let payload = json!({ "cod": 200, "name": "Paris", "main": { "temp": 14.7 } });

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let value = client(mock_server.uri())
            .current_weather("Paris")
            .await
            .unwrap();

        assert_eq!(value, payload);
    }

    #[tokio::test]
    async fn forecast_hits_forecast_resource() {
        let mock_server = MockServer::start().await;
        let body = json!({ "cod": "200", "list": [] });

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = client(format!("{}/", mock_server.uri()));
        let value = provider.forecast("New York").await.unwrap();

        assert_eq!(value["cod"], "200");
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_message() {
        let mock_server = MockServer::start().await;
        let body = json!({ "cod": "404", "message": "city not found" });

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(body))
            .mount(&mock_server)
            .await;

        let provider = client(mock_server.uri());
        let err = provider.current_weather("Zzzzz").await.unwrap_err();

        assert_eq!(
            err,
            ProviderError::Upstream {
                status: 404,
                message: Some("city not found".into()),
            }
        );
    }

    #[tokio::test]
    async fn upstream_error_without_json_has_no_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let provider = client(mock_server.uri());
        let err = provider.forecast("Paris").await.unwrap_err();

        assert_eq!(
            err,
            ProviderError::Upstream {
                status: 502,
                message: None,
            }
        );
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        let provider = client("http://127.0.0.1:1".into());
        let err = provider.current_weather("Paris").await.unwrap_err();

        assert!(matches!(err, ProviderError::Transport(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
