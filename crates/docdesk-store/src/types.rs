//! Wire types shared by every gateway implementation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One field's value: exactly one of string, integer or boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// `stringValue`
    String(String),
    /// `integerValue`
    Integer(i64),
    /// `booleanValue`
    Boolean(bool),
}

/// Encoded fields ready to send, keyed by field name.
///
/// Only fields that carry a value are present; the keys double as the update
/// mask for patch requests.
pub type FieldSet = BTreeMap<String, TypedValue>;

/// A field value as it appears on the wire.
///
/// The store's JSON mapping is a tagged object. Tags this panel does not
/// handle (`doubleValue`, `timestampValue`, ...) are ignored on read, which
/// leaves all three members empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "int64")]
    pub integer_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
}

impl FieldValue {
    /// The first present member in the fixed order string, integer, boolean.
    pub fn typed(&self) -> Option<TypedValue> {
        if let Some(s) = &self.string_value {
            return Some(TypedValue::String(s.clone()));
        }
        if let Some(n) = self.integer_value {
            return Some(TypedValue::Integer(n));
        }
        self.boolean_value.map(TypedValue::Boolean)
    }
}

impl From<TypedValue> for FieldValue {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::String(s) => Self {
                string_value: Some(s),
                ..Self::default()
            },
            TypedValue::Integer(n) => Self {
                integer_value: Some(n),
                ..Self::default()
            },
            TypedValue::Boolean(b) => Self {
                boolean_value: Some(b),
                ..Self::default()
            },
        }
    }
}

/// A document as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource path.
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// The document id: the last segment of the resource path.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// The collection id: the segment before the document id.
    pub fn collection(&self) -> Option<&str> {
        self.name.rsplit('/').nth(1)
    }

    /// Typed view of a single field.
    pub fn typed_field(&self, name: &str) -> Option<TypedValue> {
        self.fields.get(name).and_then(FieldValue::typed)
    }
}

/// A bearer credential issued by the identity service.
///
/// Lives only in memory. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token for the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

// --- Internal request/response bodies ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    pub id_token: String,
}

#[derive(Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Serialize)]
pub(crate) struct WriteBody {
    pub fields: BTreeMap<String, FieldValue>,
}

impl WriteBody {
    pub fn from_fields(fields: &FieldSet) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v.clone())))
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: Option<String>,
}

/// int64 travels as a JSON string; numbers are accepted on read too.
mod int64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => s.serialize_str(&n.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        match Option::<Repr>::deserialize(d)? {
            None => Ok(None),
            Some(Repr::Number(n)) => Ok(Some(n)),
            Some(Repr::Text(t)) => t.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn integer_serializes_as_string() {
        let v = FieldValue::from(TypedValue::Integer(2));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({ "integerValue": "2" }));
    }

    #[test]
    fn integer_reads_string_or_number() {
        let a: FieldValue = serde_json::from_str(r#"{"integerValue":"7"}"#).unwrap();
        let b: FieldValue = serde_json::from_str(r#"{"integerValue":7}"#).unwrap();
        assert_eq!(a.typed(), Some(TypedValue::Integer(7)));
        assert_eq!(a, b);
    }

    #[test]
    fn boolean_false_serializes_explicitly() {
        let v = FieldValue::from(TypedValue::Boolean(false));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, serde_json::json!({ "booleanValue": false }));
    }

    #[test]
    fn unsupported_tag_reads_as_empty() {
        let v: FieldValue = serde_json::from_str(r#"{"doubleValue":1.5}"#).unwrap();
        assert_eq!(v, FieldValue::default());
        assert_eq!(v.typed(), None);
    }

    #[test]
    fn typed_prefers_string_then_integer_then_boolean() {
        let v = FieldValue {
            string_value: None,
            integer_value: Some(0),
            boolean_value: Some(true),
        };
        assert_eq!(v.typed(), Some(TypedValue::Integer(0)));
    }

    #[test]
    fn document_id_and_collection_from_path() {
        let doc: Document = serde_json::from_str(
            r#"{"name":"projects/p/databases/(default)/documents/students/abc","fields":{}}"#,
        )
        .unwrap();
        assert_eq!(doc.id(), "abc");
        assert_eq!(doc.collection(), Some("students"));
    }

    #[test]
    fn document_without_fields_key_parses() {
        let doc: Document =
            serde_json::from_str(r#"{"name":"projects/p/databases/(default)/documents/a/b"}"#)
                .unwrap();
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("secret-token");
        assert_eq!(format!("{cred:?}"), "Credential([redacted])");
        assert_eq!(cred.bearer(), "secret-token");
    }
}
