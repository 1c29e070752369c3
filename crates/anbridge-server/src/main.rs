//! Main entry point for the anbridge server.
//!
//! Loads configuration, wires the webhook pipeline and starts the HTTP server.

use std::sync::Arc;

use anbridge_client::{HttpDispatcher, HttpDispatcherConfig};
use anbridge_server::{
    model::{AppState, Configuration, StaticFormStore},
    service::{
        log_store::LogStore,
        webhook::{WebhookHandler, WebhookSettings},
    },
    startup,
};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize configuration and logging
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();
    let namespace = configuration.rest_namespace();

    // Form settings are fixed for the lifetime of the process
    let forms = StaticFormStore::new(configuration.forms()?)?;
    info!("Loaded {} form configuration(s)", forms.len());

    let settings = WebhookSettings::from_configuration(&configuration);
    if settings.api_key.is_none() {
        warn!("No Action Network API key configured; submissions will be rejected");
    }

    let dispatcher = HttpDispatcher::new(
        HttpDispatcherConfig::default().with_connect_timeout(configuration.connect_timeout_ms()),
    )?;

    let log_store = Arc::new(LogStore::new(configuration.submission_log_file()));
    info!("Submission log: {}", log_store.path().display());

    let admin_token = configuration.admin_token();
    if admin_token.is_none() {
        warn!("No admin token configured; log endpoints are disabled");
    }

    let forms = Arc::new(forms);
    let app_state = Arc::new(AppState {
        webhook: WebhookHandler::new(
            settings,
            forms.clone(),
            Arc::new(dispatcher),
            log_store.clone(),
        ),
        forms,
        log_store,
        admin_token,
    });

    info!(
        "Starting anbridge server on {}:{} under /{}",
        server_address, server_port, namespace
    );

    startup::main_server(app_state, namespace, server_address, server_port)?.await?;

    info!("anbridge server stopped");
    Ok(())
}
