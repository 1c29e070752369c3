//! Data models and types

pub mod app_state;
pub mod config;
pub mod form;
pub mod response;

pub use app_state::AppState;
pub use config::{Cli, Configuration};
pub use form::{BasicAuth, FormConfig, FormConfigStore, StaticFormStore};
