// Error handling for the HTTP surface
// Maps domain errors onto the `{code, message, data: {status}}` body

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;

pub use anbridge_common::SubmissionError;

use crate::model::response::ErrorResult;
use crate::service::log_store::LogStoreError;

/// Rejections of the admin-only endpoints
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Log access is disabled: no admin token configured")]
    Disabled,

    #[error("Invalid or missing admin token")]
    Denied,
}

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct ApiError {
    inner: anyhow::Error,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        ApiError { inner: value }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(value: SubmissionError) -> Self {
        ApiError {
            inner: value.into(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(value: AccessError) -> Self {
        ApiError {
            inner: value.into(),
        }
    }
}

impl From<LogStoreError> for ApiError {
    fn from(value: LogStoreError) -> Self {
        ApiError {
            inner: value.into(),
        }
    }
}

impl ApiError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        if let Some(e) = self.downcast_ref::<SubmissionError>() {
            return ErrorResult::http_response(e.status(), e.code(), e.message());
        }

        if let Some(e) = self.downcast_ref::<AccessError>() {
            return match e {
                AccessError::Disabled => ErrorResult::http_response(403, "forbidden", e.to_string()),
                AccessError::Denied => ErrorResult::http_response(401, "unauthorized", e.to_string()),
            };
        }

        if let Some(e) = self.downcast_ref::<LogStoreError>() {
            return match e {
                LogStoreError::NotFound(_) => {
                    ErrorResult::http_response(404, "log_not_found", e.to_string())
                }
                LogStoreError::Io { .. } => {
                    ErrorResult::http_response(500, "log_io_error", e.to_string())
                }
            };
        }

        ErrorResult::http_response(500, "server_error", self.inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_rt::test]
    async fn test_submission_error_response() {
        let (status, body) = body_of(SubmissionError::NoEndpoint.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "no_endpoint");
        assert_eq!(body["data"]["status"], 400);
    }

    #[actix_rt::test]
    async fn test_upstream_error_passes_status_and_body() {
        let error = SubmissionError::UpstreamApi {
            status: 422,
            body: "email invalid".to_string(),
        };
        let (status, body) = body_of(error.into()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "an_api_error");
        assert_eq!(body["message"], "email invalid");
        assert_eq!(body["data"]["status"], 422);
    }

    #[actix_rt::test]
    async fn test_access_errors() {
        let (status, body) = body_of(AccessError::Denied.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");

        let (status, _) = body_of(AccessError::Disabled.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_other_errors_are_server_errors() {
        let (status, body) = body_of(anyhow::anyhow!("boom").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "server_error");
        assert_eq!(body["message"], "boom");
    }
}
