//! Profile model and device body codec
//!
//! The device exchanges profiles as flat JSON objects keyed by field name,
//! with `"Name"` as the object key. Editable fields are decoded into a typed
//! [`FieldMap`]; every other key is carried through untouched so a
//! delete + create cycle never loses device state we do not model.

use std::fmt::{self, Display, Formatter};

use pon_schema::{descriptors, vlan_mask, FieldDescriptor, FieldId, FieldMap, FieldValue, ProfileKind, ValueType};
use serde_json::{Map, Value as JsonValue};

/// Device key holding the profile name
pub const NAME_KEY: &str = "Name";

/// Malformed device body
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyError {
    /// Body is not a JSON object
    #[error("profile body is not a JSON object")]
    NotAnObject,

    /// No string `"Name"` key
    #[error("profile body has no \"Name\"")]
    MissingName,

    /// Field present with the wrong JSON type
    #[error("field {field}: expected {expected}, found {found}")]
    FieldType {
        /// Offending field
        field: FieldId,
        /// Expected JSON shape
        expected: &'static str,
        /// Rendered offending value
        found: String,
    },

    /// VLAN bitmask that does not decode
    #[error("field {field}: {reason}")]
    VlanMask {
        /// Offending field
        field: FieldId,
        /// Decoder message
        reason: String,
    },
}

/// A named profile as held by the device
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    kind: ProfileKind,
    name: String,
    fields: FieldMap,
    extra: Map<String, JsonValue>,
}

impl Profile {
    /// Create an empty profile
    #[must_use]
    pub fn new(kind: ProfileKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            fields: FieldMap::new(),
            extra: Map::new(),
        }
    }

    /// Builder: set a field
    #[must_use]
    pub fn with_field(mut self, id: FieldId, value: FieldValue) -> Self {
        self.fields.insert(id, value);
        self
    }

    /// Builder: set a pass-through device key
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Profile kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    /// Profile name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Editable fields present on the profile
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Mutable access to the editable fields
    #[inline]
    pub fn fields_mut(&mut self) -> &mut FieldMap {
        &mut self.fields
    }

    /// Pass-through device keys
    #[inline]
    #[must_use]
    pub fn extra(&self) -> &Map<String, JsonValue> {
        &self.extra
    }

    /// Current value of a field, or its sentinel if the device omitted it
    #[must_use]
    pub fn value_of(&self, desc: &FieldDescriptor) -> FieldValue {
        self.fields.get(&desc.id).cloned().unwrap_or_else(|| desc.sentinel.value())
    }

    /// Text value of a field, if set
    #[must_use]
    pub fn text(&self, id: FieldId) -> Option<&str> {
        self.fields.get(&id).and_then(FieldValue::as_text)
    }

    /// Same content under another name
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Decode a device body
    ///
    /// # Errors
    ///
    /// Returns [`BodyError`] if the body is not an object, has no name, or
    /// holds an editable field of the wrong shape.
    pub fn from_body(kind: ProfileKind, body: &JsonValue) -> Result<Self, BodyError> {
        let object = body.as_object().ok_or(BodyError::NotAnObject)?;
        let name = object
            .get(NAME_KEY)
            .and_then(JsonValue::as_str)
            .ok_or(BodyError::MissingName)?
            .to_string();

        let table = descriptors(kind);
        let mut fields = FieldMap::new();
        let mut extra = Map::new();

        for (key, raw) in object {
            if key == NAME_KEY {
                continue;
            }
            match table.iter().find(|d| d.id.as_str() == key) {
                Some(desc) => {
                    fields.insert(desc.id, decode_field(desc, raw)?);
                }
                None => {
                    extra.insert(key.clone(), raw.clone());
                }
            }
        }

        Ok(Self { kind, name, fields, extra })
    }

    /// Encode as a device body: pass-through keys, then `"Name"`, then fields
    #[must_use]
    pub fn to_body(&self) -> JsonValue {
        let mut object = self.extra.clone();
        object.insert(NAME_KEY.to_string(), JsonValue::String(self.name.clone()));
        for (id, value) in &self.fields {
            object.insert(id.as_str().to_string(), encode_field(value));
        }
        JsonValue::Object(object)
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.label(), self.name)
    }
}

/// Name carried by a device body, if any
#[must_use]
pub fn body_name(body: &JsonValue) -> Option<&str> {
    body.get(NAME_KEY).and_then(JsonValue::as_str)
}

fn decode_field(desc: &FieldDescriptor, raw: &JsonValue) -> Result<FieldValue, BodyError> {
    let mismatch = |expected| BodyError::FieldType {
        field: desc.id,
        expected,
        found: raw.to_string(),
    };

    match desc.value_type {
        ValueType::Integer | ValueType::Toggle | ValueType::Mode => {
            let value = match raw {
                JsonValue::Number(n) => n.as_i64(),
                JsonValue::String(s) => s.trim().parse().ok(),
                JsonValue::Bool(b) => Some(if *b { 2 } else { 1 }),
                _ => None,
            };
            value.map(FieldValue::Int).ok_or_else(|| mismatch("integer"))
        }
        ValueType::Text => match raw {
            JsonValue::String(s) => Ok(FieldValue::Text(s.clone())),
            JsonValue::Null => Ok(FieldValue::Text(String::new())),
            _ => Err(mismatch("string")),
        },
        ValueType::VlanList => match raw {
            JsonValue::String(s) => vlan_mask::decode(s).map(FieldValue::List).map_err(|e| BodyError::VlanMask {
                field: desc.id,
                reason: e.to_string(),
            }),
            JsonValue::Null => Ok(FieldValue::List(Vec::new())),
            _ => Err(mismatch("hex bitmask string")),
        },
    }
}

fn encode_field(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::Int(v) => JsonValue::from(*v),
        FieldValue::Text(s) => JsonValue::String(s.clone()),
        FieldValue::List(ids) if ids.is_empty() => JsonValue::String(String::new()),
        FieldValue::List(ids) => JsonValue::String(vlan_mask::encode(ids)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decode_splits_typed_and_passthrough_keys() {
        let body = json!({
            "Name": "v100",
            "CVid": "0000000000000008",
            "SVid": 100,
            "SEtherType": "34984",
            "Usage": 3,
        });
        let profile = Profile::from_body(ProfileKind::Vlan, &body).unwrap();

        assert_eq!(profile.name(), "v100");
        assert_eq!(profile.fields()[&FieldId::CVid], FieldValue::List(vec![60]));
        assert_eq!(profile.fields()[&FieldId::SVid], FieldValue::Int(100));
        assert_eq!(profile.fields()[&FieldId::SEtherType], FieldValue::Int(34984));
        assert_eq!(profile.extra().get("Usage"), Some(&json!(3)));
    }

    #[test]
    fn encode_keeps_passthrough_keys() {
        let profile = Profile::new(ProfileKind::Vlan, "v100")
            .with_field(FieldId::SVid, FieldValue::Int(100))
            .with_field(FieldId::CVid, FieldValue::List(vec![]))
            .with_extra("Usage", json!(0));
        let body = profile.to_body();

        assert_eq!(body["Name"], json!("v100"));
        assert_eq!(body["SVid"], json!(100));
        assert_eq!(body["CVid"], json!(""));
        assert_eq!(body["Usage"], json!(0));
        assert_eq!(Profile::from_body(ProfileKind::Vlan, &body).unwrap(), profile);
    }

    #[test]
    fn decode_rejects_bad_shapes() {
        assert_eq!(Profile::from_body(ProfileKind::Vlan, &json!([])), Err(BodyError::NotAnObject));
        assert_eq!(Profile::from_body(ProfileKind::Vlan, &json!({"SVid": 1})), Err(BodyError::MissingName));
        assert!(matches!(
            Profile::from_body(ProfileKind::Vlan, &json!({"Name": "v", "SVid": "abc"})),
            Err(BodyError::FieldType { field: FieldId::SVid, .. })
        ));
        assert!(matches!(
            Profile::from_body(ProfileKind::Vlan, &json!({"Name": "v", "CVid": "xyz"})),
            Err(BodyError::VlanMask { field: FieldId::CVid, .. })
        ));
    }

    #[test]
    fn renamed_is_a_full_copy() {
        let original = Profile::new(ProfileKind::Flow, "f1").with_field(FieldId::UsCdr, FieldValue::Int(64));
        let copy = original.renamed("f2");
        assert_eq!(copy.name(), "f2");
        assert_eq!(copy.fields(), original.fields());
        assert_eq!(original.name(), "f1");
    }
}
