//! Built-in field validators.
//!
//! Every validator except `required` accepts a blank value unless the field
//! is natively required, in which case the blank value is reported with the
//! required message.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::rule::ValidationType;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const US_ZIP_MESSAGE: &str = "Please enter a valid US ZIP code (5 or 9 digits).";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number.";
pub const URL_MESSAGE: &str = "Please enter a valid URL.";
pub const NUMBER_MESSAGE: &str = "Please enter a valid number.";
pub const DATE_MESSAGE: &str = "Please enter a valid date.";

pub const DEFAULT_MIN_LENGTH: usize = 3;
pub const DEFAULT_MAX_LENGTH: usize = 255;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"));

static US_ZIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("Invalid regex pattern"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// The value a rule is checked against
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    pub value: &'a str,
    /// Whether the field carried the native `required` attribute
    pub required: bool,
}

impl<'a> FieldInput<'a> {
    pub fn new(value: &'a str, required: bool) -> Self {
        Self { value, required }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Run a built-in rule. `Custom` has no built-in behaviour and always passes here.
pub fn check(kind: ValidationType, input: FieldInput<'_>, param: Option<&str>) -> Option<String> {
    if kind == ValidationType::Required {
        return required(input.value);
    }
    if kind == ValidationType::Custom {
        return None;
    }

    if is_blank(input.value) {
        return input.required.then(|| REQUIRED_MESSAGE.to_string());
    }

    match kind {
        ValidationType::Email => email(input.value),
        ValidationType::UsZip => us_zip(input.value),
        ValidationType::Phone => phone(input.value),
        ValidationType::Url => url(input.value),
        ValidationType::Number => number(input.value),
        ValidationType::MinLength => min_length(input.value, length_param(param, DEFAULT_MIN_LENGTH)),
        ValidationType::MaxLength => max_length(input.value, length_param(param, DEFAULT_MAX_LENGTH)),
        ValidationType::Date => date(input.value),
        ValidationType::Required | ValidationType::Custom => None,
    }
}

fn length_param(param: Option<&str>, default: usize) -> usize {
    param.and_then(|p| p.trim().parse().ok()).unwrap_or(default)
}

pub fn required(value: &str) -> Option<String> {
    is_blank(value).then(|| REQUIRED_MESSAGE.to_string())
}

pub fn email(value: &str) -> Option<String> {
    (!EMAIL_REGEX.is_match(value)).then(|| EMAIL_MESSAGE.to_string())
}

pub fn us_zip(value: &str) -> Option<String> {
    (!US_ZIP_REGEX.is_match(value)).then(|| US_ZIP_MESSAGE.to_string())
}

pub fn phone(value: &str) -> Option<String> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (!(10..=11).contains(&digits)).then(|| PHONE_MESSAGE.to_string())
}

pub fn url(value: &str) -> Option<String> {
    url::Url::parse(value.trim())
        .is_err()
        .then(|| URL_MESSAGE.to_string())
}

pub fn number(value: &str) -> Option<String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => None,
        _ => Some(NUMBER_MESSAGE.to_string()),
    }
}

pub fn min_length(value: &str, min: usize) -> Option<String> {
    (value.chars().count() < min)
        .then(|| format!("Please enter at least {} characters.", min))
}

pub fn max_length(value: &str, max: usize) -> Option<String> {
    (value.chars().count() > max)
        .then(|| format!("Please enter no more than {} characters.", max))
}

pub fn date(value: &str) -> Option<String> {
    let value = value.trim();
    let parsed = DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
        || DateTime::parse_from_rfc3339(value).is_ok();
    (!parsed).then(|| DATE_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn optional(value: &str) -> FieldInput<'_> {
        FieldInput::new(value, false)
    }

    #[test]
    fn test_required() {
        assert!(check(ValidationType::Required, optional(""), None).is_some());
        assert!(check(ValidationType::Required, optional("   "), None).is_some());
        assert!(check(ValidationType::Required, optional("x"), None).is_none());
    }

    #[test]
    fn test_email() {
        assert!(check(ValidationType::Email, optional("a@b.co"), None).is_none());
        assert_eq!(
            check(ValidationType::Email, optional("abc"), None).as_deref(),
            Some(EMAIL_MESSAGE)
        );
        assert!(check(ValidationType::Email, optional("a@b"), None).is_some());
        assert!(check(ValidationType::Email, optional("a b@c.de"), None).is_some());
        assert!(check(ValidationType::Email, optional(""), None).is_none());
    }

    #[test]
    fn test_blank_required_field_reports_required() {
        assert_eq!(
            check(ValidationType::Email, FieldInput::new("", true), None).as_deref(),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(
            check(ValidationType::Phone, FieldInput::new("  ", true), None).as_deref(),
            Some(REQUIRED_MESSAGE)
        );
    }

    #[test]
    fn test_us_zip() {
        assert!(check(ValidationType::UsZip, optional("20001"), None).is_none());
        assert!(check(ValidationType::UsZip, optional("20001-1234"), None).is_none());
        assert!(check(ValidationType::UsZip, optional("2000"), None).is_some());
        assert!(check(ValidationType::UsZip, optional("200011234"), None).is_some());
        assert!(check(ValidationType::UsZip, optional("20001-12"), None).is_some());
    }

    #[test]
    fn test_phone() {
        assert!(check(ValidationType::Phone, optional("(555) 123-4567"), None).is_none());
        assert!(check(ValidationType::Phone, optional("1-555-123-4567"), None).is_none());
        assert!(check(ValidationType::Phone, optional("12345"), None).is_some());
        assert!(check(ValidationType::Phone, optional("555 123 4567 890"), None).is_some());
    }

    #[test]
    fn test_url() {
        assert!(check(ValidationType::Url, optional("https://actionnetwork.org/forms/x"), None).is_none());
        assert!(check(ValidationType::Url, optional("actionnetwork.org"), None).is_some());
        assert!(check(ValidationType::Url, optional("/relative/path"), None).is_some());
    }

    #[test]
    fn test_number() {
        assert!(check(ValidationType::Number, optional("42"), None).is_none());
        assert!(check(ValidationType::Number, optional("-3.5"), None).is_none());
        assert!(check(ValidationType::Number, optional("1e3"), None).is_none());
        assert!(check(ValidationType::Number, optional("forty"), None).is_some());
        assert!(check(ValidationType::Number, optional("NaN"), None).is_some());
    }

    #[test]
    fn test_length_bounds_and_defaults() {
        assert!(check(ValidationType::MinLength, optional("ab"), None).is_some());
        assert!(check(ValidationType::MinLength, optional("abc"), None).is_none());
        assert!(check(ValidationType::MinLength, optional("abcd"), Some("5")).is_some());
        assert!(check(ValidationType::MinLength, optional("ab"), Some("oops")).is_some());

        let long = "x".repeat(256);
        assert!(check(ValidationType::MaxLength, optional(&long), None).is_some());
        assert!(check(ValidationType::MaxLength, optional(&long[..255]), None).is_none());
        assert_eq!(
            check(ValidationType::MaxLength, optional("abcdef"), Some("5")).as_deref(),
            Some("Please enter no more than 5 characters.")
        );
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(check(ValidationType::MaxLength, optional("ééé"), Some("3")).is_none());
    }

    #[test]
    fn test_date() {
        assert!(check(ValidationType::Date, optional("2025-08-06"), None).is_none());
        assert!(check(ValidationType::Date, optional("08/06/2025"), None).is_none());
        assert!(check(ValidationType::Date, optional("2025-08-06T21:39:03Z"), None).is_none());
        assert!(check(ValidationType::Date, optional("2025-02-30"), None).is_some());
        assert!(check(ValidationType::Date, optional("tomorrow"), None).is_some());
    }

    #[test]
    fn test_custom_has_no_builtin_behaviour() {
        assert!(check(ValidationType::Custom, FieldInput::new("", true), None).is_none());
    }

    proptest! {
        #[test]
        fn prop_required_passes_any_non_blank(value in "\\s*[a-zA-Z0-9]\\PC*") {
            prop_assert!(required(&value).is_none());
        }

        #[test]
        fn prop_phone_accepts_ten_or_eleven_digits(digits in "[0-9]{10,11}", sep in "[ ()-]{0,3}") {
            let formatted = format!("{}{}{}", &digits[..3], sep, &digits[3..]);
            prop_assert!(phone(&formatted).is_none());
        }

        #[test]
        fn prop_phone_rejects_short_numbers(digits in "[0-9]{1,9}") {
            prop_assert!(phone(&digits).is_some());
        }
    }
}
