//! Error types and error codes for anbridge
//!
//! This module defines:
//! - `SubmissionError`: the terminal failure kinds of a webhook submission
//! - `ErrorCode`: structured numeric error codes for API responses

use serde::{Deserialize, Serialize};

/// Terminal failures of a single webhook submission. None of them is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("No data received")]
    NoData,

    #[error("No Action Network endpoint configured for this form")]
    NoEndpoint,

    #[error("Basic authentication required for this form")]
    Unauthorized,

    #[error("Action Network API key not configured")]
    NoApiKey,

    #[error("transport error: {0}")]
    UpstreamTransport(String),

    #[error("upstream returned {status}: {body}")]
    UpstreamApi { status: u16, body: String },
}

impl SubmissionError {
    /// HTTP status the webhook answers with for this failure.
    pub fn status(&self) -> u16 {
        match self {
            SubmissionError::NoData | SubmissionError::NoEndpoint => 400,
            SubmissionError::Unauthorized => 401,
            SubmissionError::NoApiKey | SubmissionError::UpstreamTransport(_) => 500,
            SubmissionError::UpstreamApi { status, .. } => *status,
        }
    }

    /// Machine-readable string code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::NoData => "no_data",
            SubmissionError::NoEndpoint => "no_endpoint",
            SubmissionError::Unauthorized => "unauthorized",
            SubmissionError::NoApiKey => "no_api_key",
            SubmissionError::UpstreamTransport(_) | SubmissionError::UpstreamApi { .. } => {
                "an_api_error"
            }
        }
    }

    /// Human-readable message carried in the error body.
    ///
    /// Upstream failures surface the transport message or the upstream body verbatim.
    pub fn message(&self) -> String {
        match self {
            SubmissionError::UpstreamTransport(message) => message.clone(),
            SubmissionError::UpstreamApi { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Numeric error code for this failure class.
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            SubmissionError::NoData => DATA_EMPTY,
            SubmissionError::NoEndpoint => ENDPOINT_NOT_CONFIGURED,
            SubmissionError::Unauthorized => ACCESS_DENIED,
            SubmissionError::NoApiKey => API_KEY_NOT_CONFIGURED,
            SubmissionError::UpstreamTransport(_) => UPSTREAM_TRANSPORT_ERROR,
            SubmissionError::UpstreamApi { .. } => UPSTREAM_API_ERROR,
        }
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_EMPTY: ErrorCode<'static> = ErrorCode {
    code: 20001,
    message: "submission data is empty",
};

pub const ENDPOINT_NOT_CONFIGURED: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "form endpoint not configured",
};

pub const API_KEY_NOT_CONFIGURED: ErrorCode<'static> = ErrorCode {
    code: 30001,
    message: "api key not configured",
};

pub const UPSTREAM_TRANSPORT_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30002,
    message: "upstream transport error",
};

pub const UPSTREAM_API_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30003,
    message: "upstream api error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_error_status() {
        assert_eq!(SubmissionError::NoData.status(), 400);
        assert_eq!(SubmissionError::NoEndpoint.status(), 400);
        assert_eq!(SubmissionError::Unauthorized.status(), 401);
        assert_eq!(SubmissionError::NoApiKey.status(), 500);
        assert_eq!(
            SubmissionError::UpstreamTransport("timed out".to_string()).status(),
            500
        );
        assert_eq!(
            SubmissionError::UpstreamApi {
                status: 422,
                body: "{}".to_string()
            }
            .status(),
            422
        );
    }

    #[test]
    fn test_submission_error_codes() {
        assert_eq!(SubmissionError::NoData.code(), "no_data");
        assert_eq!(SubmissionError::NoEndpoint.code(), "no_endpoint");
        assert_eq!(SubmissionError::NoApiKey.code(), "no_api_key");
        assert_eq!(
            SubmissionError::UpstreamTransport(String::new()).code(),
            "an_api_error"
        );
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = SubmissionError::UpstreamApi {
            status: 422,
            body: r#"{"error":"bad email"}"#.to_string(),
        };
        assert_eq!(err.message(), r#"{"error":"bad email"}"#);
        assert_eq!(err.error_code(), UPSTREAM_API_ERROR);
    }

    #[test]
    fn test_submission_error_display() {
        assert_eq!(SubmissionError::NoData.to_string(), "No data received");
        assert_eq!(
            SubmissionError::NoApiKey.message(),
            "Action Network API key not configured"
        );
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(SubmissionError::NoData.error_code(), DATA_EMPTY);
        assert_eq!(SubmissionError::NoEndpoint.error_code(), ENDPOINT_NOT_CONFIGURED);
        assert_eq!(SubmissionError::Unauthorized.error_code(), ACCESS_DENIED);
        assert_eq!(SubmissionError::NoApiKey.error_code(), API_KEY_NOT_CONFIGURED);
        assert_eq!(
            SubmissionError::UpstreamTransport(String::new()).error_code(),
            UPSTREAM_TRANSPORT_ERROR
        );
    }
}
