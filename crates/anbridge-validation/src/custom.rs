//! Registry of site-supplied custom validators.
//!
//! A `custom` rule on field `member_id` looks up the validator registered as
//! `validateMember_id`. A rule whose validator is missing passes.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

/// Custom check: receives `(value, field_name)` and returns an error message on failure
pub type CustomValidatorFn = Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

/// Name under which the custom validator for `field_name` is registered
pub fn validator_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => format!("validate{}{}", first.to_uppercase(), chars.as_str()),
        None => "validate".to_string(),
    }
}

#[derive(Clone, Default)]
pub struct CustomValidators {
    validators: HashMap<String, CustomValidatorFn>,
}

impl CustomValidators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validator under an explicit name such as `validateMember_id`
    pub fn register<F>(&mut self, name: &str, validator: F) -> &mut Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.insert(name.to_string(), Arc::new(validator));
        self
    }

    /// Register the validator used by `custom` rules on `field_name`
    pub fn register_for_field<F>(&mut self, field_name: &str, validator: F) -> &mut Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        let name = validator_name(field_name);
        self.register(&name, validator)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Run the custom validator for `field_name`, if one is registered
    pub fn run(&self, field_name: &str, value: &str) -> Option<String> {
        let name = validator_name(field_name);
        match self.validators.get(&name) {
            Some(validator) => validator(value, field_name),
            None => {
                debug!(validator = %name, "Custom validator not registered, field passes");
                None
            }
        }
    }
}

impl std::fmt::Debug for CustomValidators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.validators.keys().collect();
        names.sort();
        f.debug_struct("CustomValidators")
            .field("validators", &names)
            .finish()
    }
}
