//! Shared state handed to every HTTP handler

use std::sync::Arc;

use crate::model::form::FormConfigStore;
use crate::service::log_store::LogStore;
use crate::service::webhook::WebhookHandler;

pub struct AppState {
    pub webhook: WebhookHandler,
    pub forms: Arc<dyn FormConfigStore>,
    pub log_store: Arc<LogStore>,
    /// Bearer token guarding the log endpoints; `None` disables them
    pub admin_token: Option<String>,
}
