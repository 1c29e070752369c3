//! Per-form configuration and the store it is looked up from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use anbridge_common::SUBMISSIONS_SUFFIX;
use anbridge_validation::{ValidationConfigError, ValidationRule, ValidationSettings, check_rules};

/// Credentials a form's webhook posts must present
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Settings of one form, keyed by its numeric id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub form_id: u64,
    #[serde(default)]
    pub endpoint: String,
    /// Comma-separated tag list, split at resolve time
    #[serde(default)]
    pub tags: String,
    /// Inbound gate: when set, webhook posts for this form must carry a
    /// matching `Authorization: Basic` header. Earlier releases stored these
    /// credentials without ever enforcing them.
    #[serde(default)]
    pub basic_auth: Option<BasicAuth>,
    #[serde(default)]
    pub validation: Vec<ValidationRule>,
    /// Admin reference only, never used in requests
    #[serde(default)]
    pub management_url: Option<String>,
}

impl FormConfig {
    pub fn new(form_id: u64, endpoint: &str) -> Self {
        Self {
            form_id,
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_string();
        self
    }

    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.basic_auth = Some(BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    /// Endpoint the submission is posted to
    pub fn submission_url(&self) -> String {
        normalize_endpoint(&self.endpoint)
    }

    pub fn resolved_tags(&self) -> Vec<String> {
        resolve_tags(&self.tags)
    }

    pub fn validation_settings(&self) -> ValidationSettings {
        ValidationSettings::from_rules(&self.validation)
    }
}

/// Append `/submissions` unless the endpoint already ends with it
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.ends_with(SUBMISSIONS_SUFFIX) {
        endpoint.to_string()
    } else {
        format!("{}{}", endpoint.trim_end_matches('/'), SUBMISSIONS_SUFFIX)
    }
}

/// Split a comma-separated tag list and trim each tag. Segments are kept
/// as-is, empty ones included; only an unset list yields no tags.
pub fn resolve_tags(tags: &str) -> Vec<String> {
    if tags.is_empty() {
        return Vec::new();
    }
    tags.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Parse a form id as carried in `post_id`. Zero is never a valid id.
pub fn parse_form_id(raw: &serde_json::Value) -> Option<u64> {
    let id = match raw {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (id != 0).then_some(id)
}

/// Read-only lookup of form settings
pub trait FormConfigStore: Send + Sync {
    fn get(&self, form_id: u64) -> Option<FormConfig>;

    fn all(&self) -> Vec<FormConfig>;
}

/// Form store backed by a fixed map loaded at startup
#[derive(Clone, Debug, Default)]
pub struct StaticFormStore {
    forms: BTreeMap<u64, FormConfig>,
}

impl StaticFormStore {
    /// Build the store, rejecting forms whose validation rules are malformed
    pub fn new(forms: Vec<FormConfig>) -> Result<Self, ValidationConfigError> {
        let mut map = BTreeMap::new();
        for form in forms {
            check_rules(&form.validation)?;
            map.insert(form.form_id, form);
        }
        Ok(Self { forms: map })
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl FormConfigStore for StaticFormStore {
    fn get(&self, form_id: u64) -> Option<FormConfig> {
        self.forms.get(&form_id).cloned()
    }

    fn all(&self) -> Vec<FormConfig> {
        self.forms.values().cloned().collect()
    }
}
