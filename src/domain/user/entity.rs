//! User record and candidate payload types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::validation::positive_id;

/// A user stored in the users collection
///
/// Only `id`, `name` and `email` are understood; any other key sent by a
/// client is kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl UserRecord {
    /// Create a record with no pass-through fields
    pub fn new(id: Option<u64>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Build a record from a candidate that already passed creation checks
    pub fn from_candidate(candidate: UserCandidate) -> Self {
        let id = candidate.requested_id();

        Self {
            id,
            name: into_text(candidate.name).unwrap_or_default(),
            email: into_text(candidate.email).unwrap_or_default(),
            extra: candidate.extra,
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Shallow-merge an update payload over this record
    ///
    /// Fields present in the candidate replace the stored ones, absent
    /// fields are left alone. A name or email that is not a string never
    /// replaces the stored text.
    pub fn merge(&mut self, candidate: UserCandidate) {
        if candidate.raw_id().is_some() {
            self.id = candidate.requested_id();
        }

        if let Some(name) = into_text(candidate.name) {
            self.name = name;
        }

        if let Some(email) = into_text(candidate.email) {
            self.email = email;
        }

        self.extra.extend(candidate.extra);
    }
}

/// A text field of a candidate as the validator sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput<'a> {
    /// Absent, or a falsy JSON value: `null`, `false`, `0` or `""`
    Missing,
    Text(&'a str),
    /// Any other non-string value
    NotText,
}

impl<'a> TextInput<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Self::Missing,
            Some(Value::String(s)) if s.is_empty() => Self::Missing,
            Some(Value::String(s)) => Self::Text(s),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Self::Missing,
            Some(_) => Self::NotText,
        }
    }
}

/// Unvalidated payload meant to become, or update, a [`UserRecord`]
///
/// Known fields stay raw JSON values so that wrongly typed input reaches
/// validation instead of failing deserialization. A JSON `null` is read as
/// an absent field, and a body that is not an object reads as an empty
/// candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<Value> for UserCandidate {
    fn from(value: Value) -> Self {
        let Value::Object(mut extra) = value else {
            return Self::default();
        };

        let mut take = |key: &str| extra.remove(key).filter(|v| !v.is_null());
        let id = take("id");
        let name = take("name");
        let email = take("email");

        Self {
            id,
            name,
            email,
            extra,
        }
    }
}

impl<'de> Deserialize<'de> for UserCandidate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl UserCandidate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<Value>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<Value>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// True when the payload carried no keys at all
    pub fn is_empty(&self) -> bool {
        self.raw_id().is_none()
            && self.name.as_ref().is_none_or(Value::is_null)
            && self.email.as_ref().is_none_or(Value::is_null)
            && self.extra.is_empty()
    }

    /// The id exactly as sent, if any
    pub fn raw_id(&self) -> Option<&Value> {
        self.id.as_ref().filter(|v| !v.is_null())
    }

    /// The id if it is a positive integer
    pub fn requested_id(&self) -> Option<u64> {
        self.raw_id().and_then(positive_id)
    }

    pub fn name(&self) -> TextInput<'_> {
        TextInput::of(self.name.as_ref())
    }

    pub fn email(&self) -> TextInput<'_> {
        TextInput::of(self.email.as_ref())
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn into_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_parses_known_and_extra_fields() {
        let candidate: UserCandidate = serde_json::from_value(json!({
            "id": 3,
            "name": "Alice",
            "email": "alice@example.com",
            "city": "Lima"
        }))
        .unwrap();

        assert_eq!(candidate.requested_id(), Some(3));
        assert_eq!(candidate.name(), TextInput::Text("Alice"));
        assert_eq!(candidate.email(), TextInput::Text("alice@example.com"));
        assert_eq!(candidate.extra().get("city"), Some(&json!("Lima")));
    }

    #[test]
    fn test_candidate_keeps_non_numeric_id() {
        let candidate: UserCandidate = serde_json::from_value(json!({ "id": "abc" })).unwrap();

        assert_eq!(candidate.raw_id(), Some(&json!("abc")));
        assert_eq!(candidate.requested_id(), None);
    }

    #[test]
    fn test_candidate_null_is_absent() {
        let candidate: UserCandidate = serde_json::from_value(json!({ "id": null })).unwrap();

        assert!(candidate.raw_id().is_none());
        assert!(candidate.is_empty());
    }

    #[test]
    fn test_empty_strings_read_as_missing() {
        let candidate = UserCandidate::new().with_name("").with_email("");

        assert_eq!(candidate.name(), TextInput::Missing);
        assert_eq!(candidate.email(), TextInput::Missing);
        assert!(!candidate.is_empty());
    }

    #[test]
    fn test_falsy_values_read_as_missing() {
        for value in [json!(false), json!(0), json!(0.0), json!("")] {
            let candidate: UserCandidate =
                serde_json::from_value(json!({ "name": value.clone() })).unwrap();

            assert_eq!(candidate.name(), TextInput::Missing, "name: {value}");
            assert!(!candidate.is_empty());
        }
    }

    #[test]
    fn test_wrongly_typed_fields_reach_validation() {
        let candidate: UserCandidate = serde_json::from_value(json!({
            "name": 123,
            "email": ["a@b.com"]
        }))
        .unwrap();

        assert_eq!(candidate.name(), TextInput::NotText);
        assert_eq!(candidate.email(), TextInput::NotText);
    }

    #[test]
    fn test_non_object_body_is_empty_candidate() {
        for body in [json!([]), json!([1, 2]), json!("text"), json!(7), json!(true)] {
            let candidate: UserCandidate = serde_json::from_value(body.clone()).unwrap();
            assert!(candidate.is_empty(), "body: {body}");
        }
    }

    #[test]
    fn test_merge_ignores_non_string_text_fields() {
        let mut record = UserRecord::new(Some(1), "Alice", "alice@example.com");

        record.merge(UserCandidate::new().with_name(false).with_email(""));

        assert_eq!(record.name(), "Alice");
        assert_eq!(record.email(), "");
        assert!(record.extra().is_empty());
    }

    #[test]
    fn test_record_from_candidate() {
        let candidate = UserCandidate::new()
            .with_id(9)
            .with_name("Bob")
            .with_email("bob@example.com")
            .with_field("age", 30);

        let record = UserRecord::from_candidate(candidate);

        assert_eq!(record.id(), Some(9));
        assert_eq!(record.name(), "Bob");
        assert_eq!(record.extra().get("age"), Some(&json!(30)));
    }

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut record = UserRecord::new(Some(1), "Alice", "alice@example.com");

        record.merge(UserCandidate::new().with_email("alice@new.com").with_field("role", "admin"));

        assert_eq!(record.id(), Some(1));
        assert_eq!(record.name(), "Alice");
        assert_eq!(record.email(), "alice@new.com");
        assert_eq!(record.extra().get("role"), Some(&json!("admin")));
    }

    #[test]
    fn test_merge_reassigns_id() {
        let mut record = UserRecord::new(Some(1), "Alice", "alice@example.com");

        record.merge(UserCandidate::new().with_id(12));

        assert_eq!(record.id(), Some(12));
    }

    #[test]
    fn test_record_serialization_flattens_extra() {
        let mut record = UserRecord::new(Some(2), "Carol", "carol@example.com");
        record.merge(UserCandidate::new().with_field("city", "Quito"));

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({ "id": 2, "name": "Carol", "email": "carol@example.com", "city": "Quito" })
        );
    }

    #[test]
    fn test_record_without_id_omits_it() {
        let record = UserRecord::new(None, "Dana", "dana@example.com");
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("id").is_none());
    }
}
