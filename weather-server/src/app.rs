use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderValue, Method},
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use weather_core::ProxyEndpoints;

use crate::error::ApiError;

// Anything that goes in here must be a handle or pointer that can be cloned.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyEndpoints>,
}

pub fn create_app(proxy: ProxyEndpoints, allowed_origin: HeaderValue) -> Router {
    let state = AppState {
        proxy: Arc::new(proxy),
    };

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([allowed_origin]))
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(get_index))
        .route("/api/weather/{city}", get(get_current_weather))
        .route("/api/forecast/{city}", get(get_forecast))
        .layer(cors)
        .with_state(state)
}

async fn get_index() -> &'static str {
    "Server is running!"
}

async fn get_current_weather(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(city) = city?;
    log::debug!("current weather requested for {city:?}");
    Ok(Json(state.proxy.current_weather(&city).await?))
}

async fn get_forecast(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(city) = city?;
    log::debug!("forecast requested for {city:?}");
    Ok(Json(state.proxy.forecast(&city).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ORIGIN: &str = "http://localhost:5173";

    fn app_for(api_key: Option<&str>, provider_url: &str) -> Router {
        create_app(
            ProxyEndpoints::from_settings(api_key, provider_url),
            HeaderValue::from_static(ORIGIN),
        )
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn index_reports_liveness() {
        let app = app_for(None, "http://unused");
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Server is running!");
    }

    #[tokio::test]
    async fn missing_key_fails_without_calling_provider() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        for uri in ["/api/weather/Paris", "/api/forecast/Paris"] {
            let (status, body) = get_json(app_for(None, &mock_server.uri()), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body,
                json!({ "message": "Server configuration error: API key missing" })
            );
        }
    }

    #[tokio::test]
    async fn weather_passes_provider_payload_through() {
        let mock_server = MockServer::start().await;
        let payload = json!({
            "cod": 200,
            "name": "New York",
            "main": { "temp": 14.7, "humidity": 60 },
            "weather": [{ "id": 800, "main": "Clear" }],
            "wind": { "speed": 2.1 }
        });

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "New York"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let app = app_for(Some("KEY"), &mock_server.uri());
        let (status, body) = get_json(app, "/api/weather/New%20York").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn provider_status_and_message_are_forwarded() {
        let mock_server = MockServer::start().await;
        let not_found = json!({ "cod": "404", "message": "city not found" });

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(not_found))
            .mount(&mock_server)
            .await;

        let app = app_for(Some("KEY"), &mock_server.uri());
        let (status, body) = get_json(app, "/api/weather/Zzzzz").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "city not found" }));
    }

    #[tokio::test]
    async fn provider_error_without_message_uses_fallback() {
        let mock_server = MockServer::start().await;
        let unauthorized = json!({ "cod": 401 });

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_json(unauthorized))
            .mount(&mock_server)
            .await;

        let app = app_for(Some("KEY"), &mock_server.uri());
        let (status, body) = get_json(app, "/api/forecast/Paris").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "Error fetching forecast data" }));
    }

    #[tokio::test]
    async fn unreachable_provider_is_500() {
        let app = app_for(Some("KEY"), "http://127.0.0.1:1");
        let (status, body) = get_json(app, "/api/forecast/Paris").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "message": "Internal server error while fetching forecast" })
        );
    }

    #[tokio::test]
    async fn undecodable_city_is_json_bad_request() {
        for uri in ["/api/weather/%FF", "/api/forecast/%FF"] {
            let (status, body) = get_json(app_for(Some("KEY"), "http://unused"), uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            let message = body["message"].as_str().unwrap_or_default();
            assert!(message.contains("UTF-8"), "unexpected body {body}");
        }
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_only() {
        let request = |origin: &'static str| {
            Request::builder()
                .uri("/")
                .header(header::ORIGIN, origin)
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app_for(None, "http://unused")
            .oneshot(request(ORIGIN))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static(ORIGIN))
        );

        let other = app_for(None, "http://unused")
            .oneshot(request("http://evil.example"))
            .await
            .unwrap();
        let allow_origin = other.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        assert!(allow_origin.is_none());
    }
}
