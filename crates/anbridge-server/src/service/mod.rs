//! Business services

pub mod log_store;
pub mod webhook;
