//! HTTP API handlers

pub mod logs;
pub mod route;
pub mod submit;
pub mod validation;
