//! Field descriptors
//!
//! A [`FieldDescriptor`] is the complete, static description of one editable
//! field: what it holds, which values are legal, what "not configured" looks
//! like and what to do with a well-typed value that falls outside the domain.
//! Descriptor tables are built from the `const` constructors below.

use std::fmt::{self, Display, Formatter};

use crate::field::FieldId;
use crate::kind::ProfileKind;
use crate::value::{FieldLookup, FieldValue};

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Tri-state boolean: 0 unset, 1 false, 2 true
    Toggle,
    /// Bounded integer
    Integer,
    /// Free text (including profile-name references)
    Text,
    /// List of VLAN ids, bitmask-encoded on the device
    VlanList,
    /// One of a fixed set of codes
    Mode,
}

impl ValueType {
    /// Short lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::VlanList => "vlan-list",
            Self::Mode => "mode",
        }
    }
}

/// One enumerated mode value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode {
    /// Device code
    pub code: i64,
    /// Operator-facing label
    pub label: &'static str,
}

impl Mode {
    /// Create mode entry
    #[must_use]
    pub const fn new(code: i64, label: &'static str) -> Self {
        Self { code, label }
    }
}

/// Lower or upper bound of an integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Constant
    Fixed(i64),
    /// Live value of a sibling field
    Field(FieldId),
    /// Sum of the live values of several sibling fields
    Sum(&'static [FieldId]),
}

impl Bound {
    /// Resolve against live sibling values; missing fields read as 0
    #[must_use]
    pub fn resolve(&self, live: &dyn FieldLookup) -> i64 {
        match self {
            Self::Fixed(v) => *v,
            Self::Field(id) => live.int_or_zero(*id),
            Self::Sum(ids) => ids.iter().fold(0_i64, |acc, id| acc.saturating_add(live.int_or_zero(*id))),
        }
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => write!(f, "{v}"),
            Self::Field(id) => write!(f, "{id}"),
            Self::Sum(ids) => {
                let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                f.write_str(&names.join("+"))
            }
        }
    }
}

/// Set of legal values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// 1 or 2
    Toggle,
    /// Inclusive integer range
    Range {
        /// Lower bound
        lo: Bound,
        /// Upper bound
        hi: Bound,
    },
    /// Enumerated codes
    Modes(&'static [Mode]),
    /// Text of the restricted character set, at most `max_len` characters
    Text {
        /// Maximum length in characters
        max_len: usize,
    },
    /// VLAN ids within an inclusive range
    VlanList {
        /// Lowest legal id
        lo: u16,
        /// Highest legal id
        hi: u16,
    },
}

impl Domain {
    /// Look up a mode by code
    #[must_use]
    pub fn mode(&self, code: i64) -> Option<&'static Mode> {
        match self {
            Self::Modes(modes) => modes.iter().find(|m| m.code == code),
            _ => None,
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => f.write_str("true|false"),
            Self::Range { lo, hi } => write!(f, "[{lo}, {hi}]"),
            Self::Modes(modes) => {
                let parts: Vec<String> = modes.iter().map(|m| format!("{}={}", m.code, m.label)).collect();
                f.write_str(&parts.join(" "))
            }
            Self::Text { max_len } => write!(f, "text(<= {max_len})"),
            Self::VlanList { lo, hi } => write!(f, "vlan ids [{lo}, {hi}]"),
        }
    }
}

/// "Not configured" representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// Integer marker (`-1`, `0`, or a default code)
    Int(i64),
    /// Empty string
    EmptyText,
    /// Empty list
    EmptyList,
}

impl Sentinel {
    /// Sentinel as a field value
    #[must_use]
    pub fn value(&self) -> FieldValue {
        match self {
            Self::Int(v) => FieldValue::Int(*v),
            Self::EmptyText => FieldValue::Text(String::new()),
            Self::EmptyList => FieldValue::List(Vec::new()),
        }
    }

    /// Whether `value` is this sentinel
    #[must_use]
    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Int(s), FieldValue::Int(v)) => s == v,
            (Self::EmptyText, FieldValue::Text(t)) => t.is_empty(),
            (Self::EmptyList, FieldValue::List(l)) => l.is_empty(),
            _ => false,
        }
    }
}

/// Treatment of a well-typed, out-of-domain input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClampPolicy {
    /// Reset to the sentinel
    Sentinel,
    /// Reset to a fixed default
    Default(i64),
    /// Leave the current value in place ("not settable")
    KeepCurrent,
}

/// Condition on a sibling field under which a field may be set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gate {
    /// Controlling field
    pub field: FieldId,
    /// Values of the controlling field that open the gate
    pub any_of: &'static [i64],
}

impl Gate {
    /// Whether the gate is open for the given live values
    #[must_use]
    pub fn holds(&self, live: &dyn FieldLookup) -> bool {
        self.any_of.contains(&live.int_or_zero(self.field))
    }
}

/// Static description of one editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    /// Field identifier
    pub id: FieldId,
    /// Semantic type
    pub value_type: ValueType,
    /// Legal values
    pub domain: Domain,
    /// "Not configured" value
    pub sentinel: Sentinel,
    /// Out-of-domain treatment
    pub clamp: ClampPolicy,
    /// Settable only while the gate holds
    pub gate: Option<Gate>,
    /// Integer inputs are rounded up to a multiple of this
    pub step: Option<i64>,
    /// Value must name an existing profile of this kind
    pub reference: Option<ProfileKind>,
    /// One-line operator help
    pub help: &'static str,
}

impl FieldDescriptor {
    const fn base(id: FieldId, value_type: ValueType, domain: Domain, sentinel: Sentinel, clamp: ClampPolicy) -> Self {
        Self {
            id,
            value_type,
            domain,
            sentinel,
            clamp,
            gate: None,
            step: None,
            reference: None,
            help: "",
        }
    }

    /// Integer in `[lo, hi]`; out-of-range input resets to `sentinel`
    #[must_use]
    pub const fn int(id: FieldId, lo: i64, hi: i64, sentinel: i64) -> Self {
        Self::base(
            id,
            ValueType::Integer,
            Domain::Range { lo: Bound::Fixed(lo), hi: Bound::Fixed(hi) },
            Sentinel::Int(sentinel),
            ClampPolicy::Sentinel,
        )
    }

    /// Integer in `[lo, hi]`; out-of-range input resets to `default`
    #[must_use]
    pub const fn int_or_default(id: FieldId, lo: i64, hi: i64, default: i64) -> Self {
        Self::base(
            id,
            ValueType::Integer,
            Domain::Range { lo: Bound::Fixed(lo), hi: Bound::Fixed(hi) },
            Sentinel::Int(default),
            ClampPolicy::Default(default),
        )
    }

    /// Tri-state toggle, unset by default
    #[must_use]
    pub const fn toggle(id: FieldId) -> Self {
        Self::base(id, ValueType::Toggle, Domain::Toggle, Sentinel::Int(0), ClampPolicy::Sentinel)
    }

    /// Free text of at most `max_len` characters
    #[must_use]
    pub const fn text(id: FieldId, max_len: usize) -> Self {
        Self::base(id, ValueType::Text, Domain::Text { max_len }, Sentinel::EmptyText, ClampPolicy::Sentinel)
    }

    /// VLAN id list within `[lo, hi]`
    #[must_use]
    pub const fn vlan_list(id: FieldId, lo: u16, hi: u16) -> Self {
        Self::base(id, ValueType::VlanList, Domain::VlanList { lo, hi }, Sentinel::EmptyList, ClampPolicy::Sentinel)
    }

    /// Enumerated mode; unknown codes reset to `default`
    #[must_use]
    pub const fn mode(id: FieldId, modes: &'static [Mode], default: i64) -> Self {
        Self::base(id, ValueType::Mode, Domain::Modes(modes), Sentinel::Int(default), ClampPolicy::Default(default))
    }

    /// Replace the range bounds of an integer field
    #[must_use]
    pub const fn with_bounds(self, lo: Bound, hi: Bound) -> Self {
        Self { domain: Domain::Range { lo, hi }, ..self }
    }

    /// Leave the current value in place on out-of-domain input
    #[must_use]
    pub const fn keep_current(self) -> Self {
        Self { clamp: ClampPolicy::KeepCurrent, ..self }
    }

    /// Settable only while `field` holds one of `any_of`
    #[must_use]
    pub const fn gated(self, field: FieldId, any_of: &'static [i64]) -> Self {
        Self { gate: Some(Gate { field, any_of }), ..self }
    }

    /// Round integer input up to a multiple of `step`
    #[must_use]
    pub const fn step(self, step: i64) -> Self {
        Self { step: Some(step), ..self }
    }

    /// Value names a profile of `kind`
    #[must_use]
    pub const fn references(self, kind: ProfileKind) -> Self {
        Self { reference: Some(kind), ..self }
    }

    /// Attach operator help
    #[must_use]
    pub const fn help(self, help: &'static str) -> Self {
        Self { help, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldMap;

    #[test]
    fn sum_bound_reads_live_values() {
        let mut live = FieldMap::new();
        live.insert(FieldId::FixedDataRate, FieldValue::Int(256));
        live.insert(FieldId::AssuredDataRate, FieldValue::Int(512));
        let bound = Bound::Sum(&[FieldId::FixedDataRate, FieldId::AssuredDataRate]);
        assert_eq!(bound.resolve(&live), 768);
        assert_eq!(Bound::Field(FieldId::MaxDataRate).resolve(&live), 0);
    }

    #[test]
    fn sum_bound_saturates() {
        let mut live = FieldMap::new();
        live.insert(FieldId::FixedDataRate, FieldValue::Int(i64::MAX));
        live.insert(FieldId::AssuredDataRate, FieldValue::Int(1));
        let bound = Bound::Sum(&[FieldId::FixedDataRate, FieldId::AssuredDataRate]);
        assert_eq!(bound.resolve(&live), i64::MAX);
    }

    #[test]
    fn builders_compose() {
        const D: FieldDescriptor = FieldDescriptor::int(FieldId::UsCdr, 128, 2_500_000, 0)
            .with_bounds(Bound::Fixed(128), Bound::Field(FieldId::UsPdr))
            .keep_current()
            .help("committed rate");
        assert_eq!(D.clamp, ClampPolicy::KeepCurrent);
        assert_eq!(D.domain, Domain::Range { lo: Bound::Fixed(128), hi: Bound::Field(FieldId::UsPdr) });
        assert_eq!(D.help, "committed rate");
        assert!(D.gate.is_none());
    }

    #[test]
    fn sentinel_matches_only_its_shape() {
        assert!(Sentinel::Int(-1).matches(&FieldValue::Int(-1)));
        assert!(!Sentinel::Int(-1).matches(&FieldValue::Int(0)));
        assert!(Sentinel::EmptyText.matches(&FieldValue::Text(String::new())));
        assert!(!Sentinel::EmptyList.matches(&FieldValue::Text(String::new())));
    }
}
