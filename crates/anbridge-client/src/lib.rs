//! anbridge Client - Action Network submission client
//!
//! Builds the person payload from a raw form submission and posts it to the
//! Action Network REST API.

pub mod error;
pub mod http;
pub mod model;

pub use error::TransportError;
pub use http::{
    HttpDispatcher, HttpDispatcherConfig, OutboundRequest, SubmissionDispatcher, UpstreamResponse,
};
pub use model::{Person, SubmissionParams, SubmissionPayload};
