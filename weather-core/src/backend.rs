//! Front-end access to the backend's `/weather` and `/forecast` routes.
//!
//! Fetching never fails outright: every error becomes a
//! [`ProviderResult::Failure`] that the view-model builders understand.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::model::ProviderResult;
use crate::proxy::Endpoint;
use crate::route::encode_component;

const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to fetch data";

/// Fetches JSON from a URL.
#[async_trait]
pub trait FetchJson: Send + Sync {
    async fn fetch_json(&self, url: &str) -> ProviderResult;
}

#[async_trait]
impl<T: FetchJson + ?Sized> FetchJson for Arc<T> {
    async fn fetch_json(&self, url: &str) -> ProviderResult {
        (**self).fetch_json(url).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FetchJson for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> ProviderResult {
        log::debug!("GET {url}");

        let res = match self.http.get(url).send().await {
            Ok(res) => res,
            Err(err) => {
                log::error!("Error fetching {url} from backend: {err}");
                return transport_failure();
            }
        };

        let status = res.status();
        let body: Option<Value> = match res.json().await {
            Ok(body) => Some(body),
            Err(err) => {
                log::debug!("Response from {url} is not JSON: {err}");
                None
            }
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            log::error!("Error fetching {url} from backend: {status} {message}");
            return ProviderResult::Failure {
                status_code: status.as_u16(),
                message,
            };
        }

        match body {
            Some(payload) => ProviderResult::Success { payload },
            None => transport_failure(),
        }
    }
}

fn transport_failure() -> ProviderResult {
    ProviderResult::Failure {
        status_code: 500,
        message: TRANSPORT_FAILURE_MESSAGE.to_string(),
    }
}

/// Builds endpoint URLs under a base such as `http://localhost:3001/api`.
#[derive(Debug, Clone)]
pub struct BackendClient<F = HttpFetcher> {
    base_url: String,
    fetcher: F,
}

impl BackendClient<HttpFetcher> {
    pub fn new(base_url: &str) -> Self {
        Self::with_fetcher(base_url, HttpFetcher::new())
    }
}

impl<F: FetchJson> BackendClient<F> {
    pub fn with_fetcher(base_url: &str, fetcher: F) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    pub fn url(&self, endpoint: Endpoint, city: &str) -> String {
        let city = encode_component(city);
        format!("{}/{}/{city}", self.base_url, endpoint.as_str())
    }

    pub async fn weather(&self, city: &str) -> ProviderResult {
        let url = self.url(Endpoint::Weather, city);
        self.fetcher.fetch_json(&url).await
    }

    pub async fn forecast(&self, city: &str) -> ProviderResult {
        let url = self.url(Endpoint::Forecast, city);
        self.fetcher.fetch_json(&url).await
    }
}
