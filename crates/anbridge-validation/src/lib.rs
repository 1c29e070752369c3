//! anbridge Validation - Pre-submit form validation
//!
//! This crate provides:
//! - Declarative per-field rules (`ValidationRule`)
//! - Built-in validators and a static registry of custom ones
//! - The per-form state machine gating native submission (`FormValidator`)
//! - The settings export format consumed by the browser

pub mod custom;
pub mod engine;
pub mod rule;
pub mod settings;
pub mod validators;

pub use custom::{CustomValidatorFn, CustomValidators, validator_name};
pub use engine::{
    FieldError, FieldState, FormState, FormSurface, FormValidator, NativeAttributes,
    SubmitDecision,
};
pub use rule::{UnknownValidationType, ValidationRule, ValidationType};
pub use settings::{FieldSettings, ValidationConfigError, ValidationSettings, check_rules};
pub use validators::FieldInput;
