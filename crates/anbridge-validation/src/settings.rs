//! Wire format of a form's validation settings as published to the browser.
//!
//! ```json
//! {"validation": {"email": {"validation_type": "email", "validation_param": "", "error_message": ""}}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::{UnknownValidationType, ValidationRule, ValidationType};

/// Problems in a configured rule list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationConfigError {
    #[error("rule #{0} has no field name")]
    MissingFieldName(usize),

    #[error("field '{field}': {source}")]
    UnknownType {
        field: String,
        #[source]
        source: UnknownValidationType,
    },

    #[error("field '{field}': '{param}' is not a valid length")]
    InvalidParam { field: String, param: String },
}

/// Reject rule lists the engine would silently misread
pub fn check_rules(rules: &[ValidationRule]) -> Result<(), ValidationConfigError> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.validation_type.is_some() && rule.field_name.trim().is_empty() {
            return Err(ValidationConfigError::MissingFieldName(index));
        }

        let length_rule = matches!(
            rule.validation_type,
            Some(ValidationType::MinLength | ValidationType::MaxLength)
        );
        if let (true, Some(param)) = (length_rule, rule.param())
            && param.parse::<usize>().is_err()
        {
            return Err(ValidationConfigError::InvalidParam {
                field: rule.field_name.clone(),
                param: param.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSettings {
    pub validation_type: String,
    #[serde(default)]
    pub validation_param: String,
    #[serde(default)]
    pub error_message: String,
}

impl FieldSettings {
    pub fn to_rule(&self, field_name: &str) -> Result<ValidationRule, ValidationConfigError> {
        let validation_type = match self.validation_type.trim() {
            "" => None,
            name => Some(name.parse::<ValidationType>().map_err(|source| {
                ValidationConfigError::UnknownType {
                    field: field_name.to_string(),
                    source,
                }
            })?),
        };

        Ok(ValidationRule {
            field_name: field_name.to_string(),
            validation_type,
            validation_param: non_empty(&self.validation_param),
            error_message: non_empty(&self.error_message),
        })
    }
}

impl From<&ValidationRule> for FieldSettings {
    fn from(rule: &ValidationRule) -> Self {
        Self {
            validation_type: rule
                .validation_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            validation_param: rule.validation_param.clone().unwrap_or_default(),
            error_message: rule.error_message.clone().unwrap_or_default(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

/// Validation settings of one form, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub validation: BTreeMap<String, FieldSettings>,
}

impl ValidationSettings {
    /// Build from a rule list. Inactive rules are left out and the first
    /// active rule for a field wins.
    pub fn from_rules(rules: &[ValidationRule]) -> Self {
        let mut validation = BTreeMap::new();
        for rule in rules.iter().filter(|r| r.is_active()) {
            validation
                .entry(rule.field_name.clone())
                .or_insert_with(|| FieldSettings::from(rule));
        }
        Self { validation }
    }

    pub fn is_empty(&self) -> bool {
        self.validation.is_empty()
    }

    pub fn to_rules(&self) -> Result<Vec<ValidationRule>, ValidationConfigError> {
        self.validation
            .iter()
            .map(|(field, settings)| settings.to_rule(field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rules_skips_inactive_and_keeps_first() {
        let rules = vec![
            ValidationRule::new("email", ValidationType::Email).with_message("Bad email"),
            ValidationRule::new("email", ValidationType::Required),
            ValidationRule {
                field_name: "phone".to_string(),
                ..Default::default()
            },
            ValidationRule::new("bio", ValidationType::MaxLength).with_param("40"),
        ];

        let settings = ValidationSettings::from_rules(&rules);
        assert_eq!(settings.validation.len(), 2);
        assert_eq!(settings.validation["email"].validation_type, "email");
        assert_eq!(settings.validation["email"].error_message, "Bad email");
        assert_eq!(settings.validation["bio"].validation_param, "40");
    }

    #[test]
    fn test_wire_shape() {
        let rules = vec![ValidationRule::new("zip", ValidationType::UsZip)];
        let json = serde_json::to_value(ValidationSettings::from_rules(&rules)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "validation": {
                    "zip": {"validation_type": "us_zip", "validation_param": "", "error_message": ""}
                }
            })
        );
    }

    #[test]
    fn test_to_rules_parses_types() {
        let settings: ValidationSettings = serde_json::from_str(
            r#"{"validation": {"phone": {"validation_type": "phone", "validation_param": "", "error_message": "Call me"}}}"#,
        )
        .unwrap();

        let rules = settings.to_rules().unwrap();
        assert_eq!(
            rules,
            vec![ValidationRule::new("phone", ValidationType::Phone).with_message("Call me")]
        );
    }

    #[test]
    fn test_to_rules_rejects_unknown_type() {
        let mut settings = ValidationSettings::default();
        settings.validation.insert(
            "zip".to_string(),
            FieldSettings {
                validation_type: "zipcode".to_string(),
                ..Default::default()
            },
        );

        let err = settings.to_rules().unwrap_err();
        assert!(matches!(err, ValidationConfigError::UnknownType { ref field, .. } if field == "zip"));
    }

    #[test]
    fn test_check_rules() {
        assert!(check_rules(&[ValidationRule::new("bio", ValidationType::MinLength).with_param("5")]).is_ok());
        assert!(check_rules(&[ValidationRule::new("bio", ValidationType::MinLength)]).is_ok());
        assert_eq!(
            check_rules(&[ValidationRule::new("bio", ValidationType::MaxLength).with_param("ten")]),
            Err(ValidationConfigError::InvalidParam {
                field: "bio".to_string(),
                param: "ten".to_string(),
            })
        );
        assert_eq!(
            check_rules(&[ValidationRule::new(" ", ValidationType::Email)]),
            Err(ValidationConfigError::MissingFieldName(0))
        );
    }
}
