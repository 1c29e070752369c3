//! HTTP response types for the anbridge server

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body of a successful submission or admin action
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResult {
    pub success: bool,
}

impl SuccessResult {
    pub fn ok() -> Self {
        SuccessResult { success: true }
    }

    pub fn http_success() -> HttpResponse {
        HttpResponse::Ok().json(SuccessResult::ok())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorData {
    pub status: u16,
}

/// Error body: `{"code": "no_endpoint", "message": "...", "data": {"status": 400}}`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResult {
    pub code: String,
    pub message: String,
    pub data: ErrorData,
}

impl ErrorResult {
    pub fn new(status: u16, code: &str, message: String) -> Self {
        ErrorResult {
            code: code.to_string(),
            message,
            data: ErrorData { status },
        }
    }

    pub fn http_response(status: u16, code: &str, message: String) -> HttpResponse {
        let status_code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponseBuilder::new(status_code).json(ErrorResult::new(status, code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_shape() {
        let body = serde_json::to_value(ErrorResult::new(
            400,
            "no_data",
            "No data received".to_string(),
        ))
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"code": "no_data", "message": "No data received", "data": {"status": 400}})
        );
    }

    #[test]
    fn test_success_result_shape() {
        assert_eq!(
            serde_json::to_string(&SuccessResult::ok()).unwrap(),
            r#"{"success":true}"#
        );
    }

    #[test]
    fn test_unknown_status_falls_back_to_500() {
        let response = ErrorResult::http_response(1000, "an_api_error", String::new());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
