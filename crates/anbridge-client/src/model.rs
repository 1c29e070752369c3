//! Outbound submission payload and the field mapper that builds it.
//!
//! The Action Network person schema nests every contact attribute in a
//! single-element list. Keys are always emitted, even when the submission
//! did not carry the field, because the upstream API expects them present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use anbridge_common::{CUSTOM, EMAIL, FIRST_NAME, LAST_NAME, PHONE, POSTAL_CODE};

/// Flat parameter set received by the webhook.
pub type SubmissionParams = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub address: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub postal_code: String,
}

/// Person record in the Action Network submission schema
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub given_name: String,
    pub family_name: String,
    pub email_addresses: Vec<EmailAddress>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub postal_addresses: Vec<PostalAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
}

/// Body of `POST <endpoint>/submissions`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub person: Person,
    pub add_tags: Vec<String>,
}

impl SubmissionPayload {
    /// Map a raw submission onto the person schema.
    ///
    /// This never fails: absent fields become empty strings and the nested
    /// `custom` object, when present and non-empty, is copied verbatim.
    pub fn from_params(params: &SubmissionParams, tags: &[String]) -> Self {
        let custom_fields = match params.get(CUSTOM) {
            Some(Value::Object(custom)) if !custom.is_empty() => Some(custom.clone()),
            _ => None,
        };

        SubmissionPayload {
            person: Person {
                given_name: field_text(params, FIRST_NAME),
                family_name: field_text(params, LAST_NAME),
                email_addresses: vec![EmailAddress {
                    address: field_text(params, EMAIL),
                }],
                phone_numbers: vec![PhoneNumber {
                    number: field_text(params, PHONE),
                }],
                postal_addresses: vec![PostalAddress {
                    postal_code: field_text(params, POSTAL_CODE),
                }],
                custom_fields,
            },
            add_tags: tags.to_vec(),
        }
    }
}

/// Text of a flat field. Strings pass through untouched, null or missing
/// becomes empty, other scalars keep their JSON rendering.
fn field_text(params: &SubmissionParams, key: &str) -> String {
    match params.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn params(value: Value) -> SubmissionParams {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_maps_fixed_fields() {
        let p = params(json!({
            "post_id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.org",
            "phone": "555-123-4567",
            "postal_code": "20001"
        }));
        let payload = SubmissionPayload::from_params(&p, &["x".to_string(), "y".to_string()]);

        assert_eq!(payload.person.given_name, "Ada");
        assert_eq!(payload.person.family_name, "Lovelace");
        assert_eq!(payload.person.email_addresses[0].address, "ada@example.org");
        assert_eq!(payload.person.phone_numbers[0].number, "555-123-4567");
        assert_eq!(payload.person.postal_addresses[0].postal_code, "20001");
        assert_eq!(payload.add_tags, vec!["x", "y"]);
        assert!(payload.person.custom_fields.is_none());
    }

    #[test]
    fn test_missing_fields_are_empty_not_omitted() {
        let payload = SubmissionPayload::from_params(&params(json!({"post_id": 1})), &[]);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "person": {
                    "given_name": "",
                    "family_name": "",
                    "email_addresses": [{"address": ""}],
                    "phone_numbers": [{"number": ""}],
                    "postal_addresses": [{"postal_code": ""}]
                },
                "add_tags": []
            })
        );
    }

    #[test]
    fn test_custom_fields_copied_verbatim() {
        let p = params(json!({
            "first_name": "A",
            "custom": {"employer": "ACME", "shift": 2, "union_member": true}
        }));
        let payload = SubmissionPayload::from_params(&p, &[]);

        assert_eq!(
            Value::Object(payload.person.custom_fields.unwrap()),
            json!({"employer": "ACME", "shift": 2, "union_member": true})
        );
    }

    #[test]
    fn test_empty_custom_is_omitted() {
        let p = params(json!({"custom": {}}));
        let value = serde_json::to_value(SubmissionPayload::from_params(&p, &[])).unwrap();
        assert!(value["person"].get("custom_fields").is_none());
    }

    #[test]
    fn test_non_string_scalars_keep_json_text() {
        let p = params(json!({"postal_code": 20001, "phone": null}));
        let payload = SubmissionPayload::from_params(&p, &[]);
        assert_eq!(payload.person.postal_addresses[0].postal_code, "20001");
        assert_eq!(payload.person.phone_numbers[0].number, "");
    }

    proptest! {
        #[test]
        fn prop_mapping_is_deterministic(
            first in ".*",
            email in ".*",
            tags in proptest::collection::vec("[a-z ]{0,8}", 0..5),
        ) {
            let p = params(json!({"first_name": first, "email": email}));
            let a = serde_json::to_vec(&SubmissionPayload::from_params(&p, &tags)).unwrap();
            let b = serde_json::to_vec(&SubmissionPayload::from_params(&p, &tags)).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
