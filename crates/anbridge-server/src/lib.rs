// anbridge server - relays website form submissions to the Action Network API
// and serves the submission log and per-form validation settings

pub mod api; // HTTP handlers and routes
pub mod error; // Error handling and HTTP error mapping
pub mod model; // Configuration, form settings and response types
pub mod service; // Webhook pipeline and submission log
pub mod startup; // Logging and server bootstrap

pub use model::{AppState, Configuration};
