use crate::error::PaymentError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PaymentError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure leaves as `{ "error": "..." }`. Upstream and internal
/// details are logged, never sent to the client.
impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            PaymentError::ValidationError(msg) => msg.clone(),
            PaymentError::Unauthenticated => "Not authenticated".to_string(),
            PaymentError::NotFound(what) => format!("Not found: {what}"),
            PaymentError::UpstreamError { service, .. } => {
                error!(error = %self, "Upstream call failed");
                format!("The {service} is unavailable")
            }
            _ => {
                error!(error = %self, "Request failed");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_kind() {
        assert_eq!(
            PaymentError::ValidationError("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(PaymentError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            PaymentError::NotFound("invoice x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PaymentError::upstream("payment gateway", "timeout").status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            PaymentError::InternalError("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
