//! Webhook ingestion: resolve the form, map the fields, forward to Action Network.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use tracing::debug;

use anbridge_client::{OutboundRequest, SubmissionDispatcher, SubmissionParams, SubmissionPayload};
use anbridge_common::{CUSTOM, POST_ID, SubmissionError};

use crate::model::config::Configuration;
use crate::model::form::{BasicAuth, FormConfig, FormConfigStore, parse_form_id};
use crate::service::log_store::{LogLevel, LogStore};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Settings the handler reads at request time
#[derive(Clone, Debug)]
pub struct WebhookSettings {
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl WebhookSettings {
    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            api_key: configuration.api_key(),
            timeout: configuration.submission_timeout(),
        }
    }
}

/// Parse a webhook body: a non-empty JSON object, otherwise form-encoded pairs.
///
/// Form keys shaped `custom[name]` are collected into a nested `custom` object.
/// A body declared as form data is never read as JSON, and an undeclared body
/// that looks like JSON is never read as form data. Returns an empty map when
/// nothing usable was sent.
pub fn parse_submission_body(content_type: Option<&str>, body: &[u8]) -> SubmissionParams {
    let mime = content_type
        .and_then(|c| c.split(';').next())
        .map(|c| c.trim().to_ascii_lowercase());
    let declared_form = mime.as_deref() == Some(FORM_CONTENT_TYPE);

    if !declared_form
        && let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body)
        && !map.is_empty()
    {
        return map;
    }

    let undeclared_form = mime.is_none() && !looks_like_json(body);
    if declared_form || undeclared_form {
        parse_form_body(body)
    } else {
        Map::new()
    }
}

fn looks_like_json(body: &[u8]) -> bool {
    matches!(
        body.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{') | Some(b'[')
    )
}

fn parse_form_body(body: &[u8]) -> SubmissionParams {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();
    let mut params = Map::new();
    let mut custom = Map::new();
    for (key, value) in pairs {
        if key.is_empty() {
            continue;
        }
        match custom_field_name(&key) {
            Some(name) => {
                custom.insert(name.to_string(), Value::String(value));
            }
            None => {
                params.insert(key, Value::String(value));
            }
        }
    }
    if !custom.is_empty() {
        params.insert(CUSTOM.to_string(), Value::Object(custom));
    }
    params
}

fn custom_field_name(key: &str) -> Option<&str> {
    key.strip_prefix("custom[")?
        .strip_suffix(']')
        .filter(|name| !name.is_empty())
}

/// Whether an `Authorization` header carries exactly these credentials
pub fn basic_auth_matches(header: Option<&str>, expected: &BasicAuth) -> bool {
    let Some(encoded) = header.and_then(|h| {
        let (scheme, rest) = h.trim().split_once(' ')?;
        scheme.eq_ignore_ascii_case("basic").then_some(rest.trim())
    }) else {
        return false;
    };

    let Ok(decoded) = STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(credentials) = String::from_utf8(decoded) else {
        return false;
    };

    match credentials.split_once(':') {
        Some((username, password)) => {
            username == expected.username && password == expected.password
        }
        None => false,
    }
}

pub struct WebhookHandler {
    settings: WebhookSettings,
    forms: Arc<dyn FormConfigStore>,
    dispatcher: Arc<dyn SubmissionDispatcher>,
    log: Arc<LogStore>,
}

impl WebhookHandler {
    pub fn new(
        settings: WebhookSettings,
        forms: Arc<dyn FormConfigStore>,
        dispatcher: Arc<dyn SubmissionDispatcher>,
        log: Arc<LogStore>,
    ) -> Self {
        Self {
            settings,
            forms,
            dispatcher,
            log,
        }
    }

    /// Process one webhook body end to end
    pub async fn handle(
        &self,
        content_type: Option<&str>,
        body: &[u8],
        authorization: Option<&str>,
    ) -> Result<(), SubmissionError> {
        self.log
            .record(LogLevel::Info, &format!("Webhook hit ({} bytes)", body.len()))
            .await;

        let params = parse_submission_body(content_type, body);
        if params.is_empty() {
            self.log
                .record(LogLevel::Error, "No data received in submission.")
                .await;
            return Err(SubmissionError::NoData);
        }

        let form = self.resolve_form(&params).await?;
        let form_id = form.form_id;

        if let Some(expected) = &form.basic_auth
            && !basic_auth_matches(authorization, expected)
        {
            self.log
                .record(
                    LogLevel::Error,
                    &format!("Basic auth failed for post_id: {}", form_id),
                )
                .await;
            return Err(SubmissionError::Unauthorized);
        }

        let url = form.submission_url();
        self.log
            .record(
                LogLevel::Info,
                &format!("Using AN endpoint: {} for post_id: {}", url, form_id),
            )
            .await;

        let Some(api_key) = self.settings.api_key.as_deref() else {
            self.log
                .record(
                    LogLevel::Error,
                    "No Action Network API key configured. Set anbridge.api_key.",
                )
                .await;
            return Err(SubmissionError::NoApiKey);
        };

        let payload = SubmissionPayload::from_params(&params, &form.resolved_tags());
        let request = OutboundRequest::submission(&url, api_key, &payload, self.settings.timeout)
            .map_err(|e| SubmissionError::UpstreamTransport(e.to_string()))?;
        self.log
            .record(
                LogLevel::Info,
                &format!("Sending to AN for post_id: {}: {}", form_id, request.body),
            )
            .await;

        let response = match self.dispatcher.post(request).await {
            Ok(response) => response,
            Err(e) => {
                let error = SubmissionError::UpstreamTransport(e.to_string());
                self.log
                    .record(
                        LogLevel::Error,
                        &format!(
                            "AN API error for post_id: {} (code {}): {}",
                            form_id,
                            error.error_code().code,
                            e
                        ),
                    )
                    .await;
                return Err(error);
            }
        };

        if !response.is_success() {
            self.log
                .record(
                    LogLevel::Error,
                    &format!(
                        "AN API error response ({}) for post_id: {}: {}",
                        response.status, form_id, response.body
                    ),
                )
                .await;
            return Err(SubmissionError::UpstreamApi {
                status: response.status,
                body: response.body,
            });
        }

        self.log
            .record(
                LogLevel::Success,
                &format!(
                    "AN response ({}) for post_id: {}: {}",
                    response.status, form_id, response.body
                ),
            )
            .await;
        Ok(())
    }

    async fn resolve_form(&self, params: &SubmissionParams) -> Result<FormConfig, SubmissionError> {
        let raw_id = params.get(POST_ID).cloned().unwrap_or(Value::Null);
        let Some(form_id) = parse_form_id(&raw_id) else {
            self.log
                .record(
                    LogLevel::Error,
                    &format!("Submission has no usable post_id ({}), cannot send to AN.", raw_id),
                )
                .await;
            return Err(SubmissionError::NoEndpoint);
        };

        match self.forms.get(form_id) {
            Some(form) if form.has_endpoint() => {
                debug!(form_id, "Resolved form configuration");
                Ok(form)
            }
            _ => {
                self.log
                    .record(
                        LogLevel::Error,
                        &format!(
                            "The form with post_id: {} does not have an endpoint, so data cannot be sent to AN.",
                            form_id
                        ),
                    )
                    .await;
                Err(SubmissionError::NoEndpoint)
            }
        }
    }
}
