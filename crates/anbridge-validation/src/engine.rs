//! Per-form validation state machine.
//!
//! `FormValidator` drives a [`FormSurface`], the rendered form it is attached
//! to. On attach it snapshots and strips the native validation attributes so
//! the browser's own popups cannot pre-empt the configured messages; a passing
//! submit restores them exactly before the native submission proceeds.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::custom::CustomValidators;
use crate::rule::{ValidationRule, ValidationType};
use crate::validators::{self, FieldInput};

/// Native HTML validation attributes of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeAttributes {
    pub required: bool,
    pub pattern: Option<String>,
    /// The `type` attribute, e.g. `email` or `tel`
    pub input_type: Option<String>,
}

impl NativeAttributes {
    /// Attributes of a field with native validation disabled
    pub fn stripped() -> Self {
        Self {
            required: false,
            pattern: None,
            input_type: Some("text".to_string()),
        }
    }
}

/// The rendered form the validator is attached to.
///
/// Fields are addressed by their canonical name. Lookups for a name the form
/// does not render return `None` and the field is skipped.
pub trait FormSurface {
    fn field_names(&self) -> Vec<String>;

    fn value(&self, field: &str) -> Option<String>;

    fn native_attributes(&self, field: &str) -> Option<NativeAttributes>;

    fn set_native_attributes(&mut self, field: &str, attributes: &NativeAttributes);

    fn show_error(&mut self, field: &str, message: &str);

    fn clear_error(&mut self, field: &str);

    fn scroll_into_view(&mut self, field: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Blocked,
    Passed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Valid,
    Invalid,
}

/// What the submit handler tells the host to do with the submit event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

pub struct FormValidator<S: FormSurface> {
    surface: S,
    rules: Vec<ValidationRule>,
    custom: CustomValidators,
    state: FormState,
    snapshot: HashMap<String, NativeAttributes>,
    stripped: bool,
    field_states: HashMap<String, FieldState>,
    errors: Vec<FieldError>,
}

impl<S: FormSurface> FormValidator<S> {
    /// Attach to `surface`. Inactive rules are dropped.
    pub fn attach(surface: S, rules: Vec<ValidationRule>, custom: CustomValidators) -> Self {
        let rules: Vec<ValidationRule> = rules.into_iter().filter(|r| r.is_active()).collect();

        let mut validator = Self {
            surface,
            rules,
            custom,
            state: FormState::Idle,
            snapshot: HashMap::new(),
            stripped: false,
            field_states: HashMap::new(),
            errors: Vec::new(),
        };
        validator.strip_native_validation();

        debug!(rules = validator.rules.len(), "Form validator attached");
        validator
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn field_state(&self, field: &str) -> Option<FieldState> {
        self.field_states.get(field).copied()
    }

    /// Errors from the most recent submit attempt
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Handle a submit attempt
    pub fn on_submit(&mut self) -> SubmitDecision {
        if !self.stripped {
            self.strip_native_validation();
        }
        self.state = FormState::Validating;

        let errors = self.validate_all();
        self.clear_all_errors();

        if errors.is_empty() {
            self.restore_native_validation();
            self.errors = errors;
            self.state = FormState::Passed;
            info!("Form validation passed");
            return SubmitDecision::Proceed;
        }

        for error in &errors {
            self.surface.show_error(&error.field, &error.message);
        }
        if let Some(first) = errors.first() {
            self.surface.scroll_into_view(&first.field);
        }

        info!(errors = errors.len(), "Form validation failed, submission cancelled");
        self.errors = errors;
        self.state = FormState::Blocked;
        SubmitDecision::Cancel
    }

    /// Live validation when a field loses focus
    pub fn on_blur(&mut self, field: &str) -> FieldState {
        match self.validate_field(field) {
            Some(message) => {
                self.surface.show_error(field, &message);
                self.field_states.insert(field.to_string(), FieldState::Invalid);
                FieldState::Invalid
            }
            None => {
                self.surface.clear_error(field);
                self.field_states.insert(field.to_string(), FieldState::Valid);
                FieldState::Valid
            }
        }
    }

    /// Live validation while typing: only ever clears an error.
    pub fn on_input(&mut self, field: &str) -> Option<FieldState> {
        if self.validate_field(field).is_none() {
            self.surface.clear_error(field);
            self.field_states.insert(field.to_string(), FieldState::Valid);
            return Some(FieldState::Valid);
        }
        self.field_states.get(field).copied()
    }

    /// Check every configured field. A field reports at most one error.
    pub fn validate_all(&self) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = Vec::new();
        for rule in &self.rules {
            if errors.iter().any(|e| e.field == rule.field_name) {
                continue;
            }
            if let Some(message) = self.run_rule(rule) {
                errors.push(FieldError {
                    field: rule.field_name.clone(),
                    message,
                });
            }
        }
        errors
    }

    /// Check one field against its rules
    pub fn validate_field(&self, field: &str) -> Option<String> {
        self.rules
            .iter()
            .filter(|rule| rule.field_name == field)
            .find_map(|rule| self.run_rule(rule))
    }

    fn run_rule(&self, rule: &ValidationRule) -> Option<String> {
        let kind = rule.validation_type?;
        let Some(value) = self.surface.value(&rule.field_name) else {
            debug!(field = %rule.field_name, "Field not rendered, skipping");
            return None;
        };

        let input = FieldInput::new(&value, self.is_natively_required(&rule.field_name));
        let error = match kind {
            ValidationType::Custom => self.custom.run(&rule.field_name, &value),
            _ => validators::check(kind, input, rule.param()),
        }?;

        Some(
            rule.message_override()
                .map(str::to_string)
                .unwrap_or(error),
        )
    }

    fn is_natively_required(&self, field: &str) -> bool {
        self.snapshot
            .get(field)
            .map(|attrs| attrs.required)
            .or_else(|| self.surface.native_attributes(field).map(|attrs| attrs.required))
            .unwrap_or(false)
    }

    fn strip_native_validation(&mut self) {
        let stripped = NativeAttributes::stripped();
        for field in self.surface.field_names() {
            if let Some(original) = self.surface.native_attributes(&field) {
                self.surface.set_native_attributes(&field, &stripped);
                self.snapshot.insert(field, original);
            }
        }
        self.stripped = true;
    }

    fn restore_native_validation(&mut self) {
        for (field, original) in &self.snapshot {
            self.surface.set_native_attributes(field, original);
        }
        self.stripped = false;
    }

    fn clear_all_errors(&mut self) {
        for field in self.surface.field_names() {
            self.surface.clear_error(&field);
        }
    }
}
