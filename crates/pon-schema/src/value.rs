//! Field values

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

/// Current value of one editable field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integers, toggles and mode codes
    Int(i64),
    /// Free text and profile-name references
    Text(String),
    /// VLAN id lists (encoded as a bitmask on the wire)
    List(Vec<u16>),
}

impl FieldValue {
    /// Integer payload, if this is an integer
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload, if this is text
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List payload, if this is a list
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[u16]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::List(l) => {
                let parts: Vec<String> = l.iter().map(u16::to_string).collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

/// Editable fields of one profile, keyed by identifier
pub type FieldMap = BTreeMap<FieldId, FieldValue>;

/// Read access to the live values of sibling fields.
///
/// Cross-field bounds and gates resolve through this trait, so the validator
/// stays independent of how a profile is held in memory.
pub trait FieldLookup {
    /// Live value of `id`, if present
    fn field(&self, id: FieldId) -> Option<&FieldValue>;

    /// Live integer value of `id`; missing or non-integer reads as 0
    fn int_or_zero(&self, id: FieldId) -> i64 {
        self.field(id).and_then(FieldValue::as_int).unwrap_or(0)
    }
}

impl FieldLookup for FieldMap {
    fn field(&self, id: FieldId) -> Option<&FieldValue> {
        self.get(&id)
    }
}

/// Lookup with no sibling fields
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoFields;

impl FieldLookup for NoFields {
    fn field(&self, _id: FieldId) -> Option<&FieldValue> {
        None
    }
}
