//! Validation rule model.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

/// Error returned when a rule type name is not one of the supported kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown validation type: {0}")]
pub struct UnknownValidationType(pub String);

/// Kinds of field rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    Required,
    Email,
    UsZip,
    Phone,
    Url,
    Number,
    MinLength,
    MaxLength,
    Date,
    Custom,
}

impl ValidationType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationType::Required => "required",
            ValidationType::Email => "email",
            ValidationType::UsZip => "us_zip",
            ValidationType::Phone => "phone",
            ValidationType::Url => "url",
            ValidationType::Number => "number",
            ValidationType::MinLength => "min_length",
            ValidationType::MaxLength => "max_length",
            ValidationType::Date => "date",
            ValidationType::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ValidationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ValidationType {
    type Err = UnknownValidationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(ValidationType::Required),
            "email" => Ok(ValidationType::Email),
            "us_zip" => Ok(ValidationType::UsZip),
            "phone" => Ok(ValidationType::Phone),
            "url" => Ok(ValidationType::Url),
            "number" => Ok(ValidationType::Number),
            "min_length" => Ok(ValidationType::MinLength),
            "max_length" => Ok(ValidationType::MaxLength),
            "date" => Ok(ValidationType::Date),
            "custom" => Ok(ValidationType::Custom),
            _ => Err(UnknownValidationType(s.to_string())),
        }
    }
}

/// A single field rule.
///
/// A rule without a type leaves the field to the browser's native validation.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub field_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub validation_type: Option<ValidationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationRule {
    pub fn new(field_name: &str, validation_type: ValidationType) -> Self {
        Self {
            field_name: field_name.to_string(),
            validation_type: Some(validation_type),
            validation_param: None,
            error_message: None,
        }
    }

    pub fn with_param(mut self, param: &str) -> Self {
        self.validation_param = Some(param.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    /// Whether the engine applies this rule at all
    pub fn is_active(&self) -> bool {
        self.validation_type.is_some() && !self.field_name.trim().is_empty()
    }

    /// Parameter, ignoring blank values
    pub fn param(&self) -> Option<&str> {
        self.validation_param
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Message override, ignoring blank values
    pub fn message_override(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_type_round_trips_through_str() {
        for kind in [
            ValidationType::Required,
            ValidationType::UsZip,
            ValidationType::MinLength,
            ValidationType::Custom,
        ] {
            assert_eq!(kind.as_str().parse::<ValidationType>().unwrap(), kind);
        }
        assert!("zipcode".parse::<ValidationType>().is_err());
    }

    #[test]
    fn test_empty_type_means_no_rule() {
        let rule: ValidationRule = serde_json::from_str(
            r#"{"field_name":"email","validation_type":"","error_message":"x"}"#,
        )
        .unwrap();
        assert_eq!(rule.validation_type, None);
        assert!(!rule.is_active());
    }

    #[test]
    fn test_missing_type_means_no_rule() {
        let rule: ValidationRule = serde_json::from_str(r#"{"field_name":"email"}"#).unwrap();
        assert!(!rule.is_active());
    }

    #[test]
    fn test_rule_deserializes_type_and_param() {
        let rule: ValidationRule = serde_json::from_str(
            r#"{"field_name":"bio","validation_type":"max_length","validation_param":" 40 "}"#,
        )
        .unwrap();
        assert_eq!(rule.validation_type, Some(ValidationType::MaxLength));
        assert_eq!(rule.param(), Some("40"));
        assert!(rule.is_active());
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let rule = ValidationRule::new("zip", ValidationType::UsZip)
            .with_param("  ")
            .with_message("");
        assert_eq!(rule.param(), None);
        assert_eq!(rule.message_override(), None);
    }
}
