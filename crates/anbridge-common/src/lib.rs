//! anbridge Common - Shared types and constants
//!
//! This crate provides the foundational types used across all anbridge components:
//! - Submission error kinds and error codes
//! - Wire constants shared by the webhook and the outbound client

pub mod error;

pub use error::{ErrorCode, SubmissionError};

/// Header used to authenticate against the Action Network API
pub const OSDI_API_TOKEN_HEADER: &str = "OSDI-API-Token";

/// Path segment every outbound endpoint must end with
pub const SUBMISSIONS_SUFFIX: &str = "/submissions";

/// Default timeout for the outbound submission call, in seconds
pub const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 20;

/// Default REST namespace the webhook is mounted under
pub const DEFAULT_REST_NAMESPACE: &str = "anbridge/v1";

/// Submission parameter keys understood by the field mapper
pub const POST_ID: &str = "post_id";
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const POSTAL_CODE: &str = "postal_code";
pub const CUSTOM: &str = "custom";
