use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use weather_core::ProxyError;

/// Every failed request becomes a JSON body with a `message` field.
#[derive(Debug)]
pub enum ApiError {
    Proxy(ProxyError),
    /// The city segment could not be extracted, e.g. it is not valid UTF-8.
    Path(PathRejection),
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        ApiError::Proxy(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Path(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Proxy(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.message().to_string())
            }
            ApiError::Path(rejection) => {
                log::warn!("Rejected request path: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}
