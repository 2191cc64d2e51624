//! Value validation
//!
//! [`apply`] is the single entry point every field edit goes through. It never
//! rejects a well-typed value: out-of-domain input is clamped according to the
//! field's [`ClampPolicy`]. Only input that cannot be read as the field's type
//! at all is reported as [`Outcome::InputError`].

use std::fmt::{self, Display, Formatter};

use crate::descriptor::{ClampPolicy, Domain, FieldDescriptor, ValueType};
use crate::field::FieldId;
use crate::kind::ProfileKind;
use crate::value::{FieldLookup, FieldValue, NoFields};

/// Characters allowed in free-text fields besides ASCII alphanumerics
pub const TEXT_PUNCTUATION: &[char] = &['-', '_', '/', '.', '[', ']', '(', ')', ':'];

/// Raw input that cannot be read as the field's type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Integer field, non-integer input
    #[error("'{input}' is not an integer")]
    NotAnInteger {
        /// Offending input
        input: String,
    },

    /// Mode field, neither a code nor a known label
    #[error("'{input}' is not a known mode (expected one of: {expected})")]
    UnknownMode {
        /// Offending input
        input: String,
        /// Rendered list of legal modes
        expected: String,
    },

    /// Toggle field, unrecognised word
    #[error("'{input}' is not a toggle value (true/false/toggle)")]
    NotAToggle {
        /// Offending input
        input: String,
    },

    /// Text field, forbidden character
    #[error("'{input}' contains invalid character '{ch}'")]
    InvalidCharacter {
        /// Offending input
        input: String,
        /// First forbidden character
        ch: char,
    },

    /// List field, not a single acceptable element
    #[error("'{input}' contains no valid VLAN id")]
    NoValidElements {
        /// Offending input
        input: String,
    },

    /// Reference field naming a profile that does not exist
    #[error("{kind} profile '{name}' does not exist")]
    DanglingReference {
        /// Referenced kind
        kind: ProfileKind,
        /// Name that failed to resolve
        name: String,
    },
}

/// Why a value was clamped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClampReason {
    /// Outside `[lo, hi]`; reset to sentinel or default
    OutOfRange {
        /// Resolved lower bound
        lo: i64,
        /// Resolved upper bound
        hi: i64,
    },
    /// Outside `[lo, hi]` where the field keeps its current value
    NotSettable {
        /// Resolved lower bound
        lo: i64,
        /// Resolved upper bound
        hi: i64,
    },
    /// The controlling field's value does not allow this field to be set
    Gated {
        /// Controlling field
        by: FieldId,
    },
    /// Mode code not in the enumeration
    UnknownCode(i64),
    /// Text longer than allowed
    TooLong {
        /// Maximum length
        max_len: usize,
    },
}

impl Display for ClampReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { lo, hi } => write!(f, "out of range [{lo}, {hi}]"),
            Self::NotSettable { lo, hi } => write!(f, "not settable outside [{lo}, {hi}]"),
            Self::Gated { by } => write!(f, "not settable with current {by}"),
            Self::UnknownCode(code) => write!(f, "unknown code {code}"),
            Self::TooLong { max_len } => write!(f, "longer than {max_len} characters"),
        }
    }
}

/// Result classification of one field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Input stored as given (after normalisation such as rounding)
    Accepted,
    /// Well-typed input outside the domain
    Clamped(ClampReason),
    /// List input where only some elements were valid
    PartiallyAccepted {
        /// Elements that were dropped
        rejected: Vec<String>,
    },
    /// Empty input; current value kept
    Unchanged,
    /// Input could not be read as the field's type
    InputError(ValidationError),
}

impl Outcome {
    /// Whether the edit was unreadable
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputError(_))
    }

    /// Short lowercase label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Clamped(_) => "clamped",
            Self::PartiallyAccepted { .. } => "partial",
            Self::Unchanged => "unchanged",
            Self::InputError(_) => "input-error",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamped(reason) => write!(f, "clamped: {reason}"),
            Self::PartiallyAccepted { rejected } => write!(f, "partially accepted, dropped: {}", rejected.join(" ")),
            Self::InputError(e) => write!(f, "input error: {e}"),
            other => f.write_str(other.label()),
        }
    }
}

/// New value and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Value the field holds after the edit
    pub value: FieldValue,
    /// What happened
    pub outcome: Outcome,
}

impl Applied {
    fn new(value: FieldValue, outcome: Outcome) -> Self {
        Self { value, outcome }
    }

    fn keep(current: &FieldValue, outcome: Outcome) -> Self {
        Self::new(current.clone(), outcome)
    }
}

/// Apply raw input to a field with no sibling values available.
///
/// Field-relative bounds read as 0 and gates stay closed; use [`apply_with`]
/// when editing a loaded profile.
#[must_use]
pub fn apply(desc: &FieldDescriptor, raw: &str, current: &FieldValue) -> Applied {
    apply_with(desc, raw, current, &NoFields)
}

/// Apply raw input to a field, resolving bounds and gates against `live`
#[must_use]
pub fn apply_with(desc: &FieldDescriptor, raw: &str, current: &FieldValue, live: &dyn FieldLookup) -> Applied {
    let input = raw.trim();
    if input.is_empty() {
        return Applied::keep(current, Outcome::Unchanged);
    }

    if let Some(gate) = &desc.gate {
        if !gate.holds(live) {
            return Applied::keep(current, Outcome::Clamped(ClampReason::Gated { by: gate.field }));
        }
    }

    match desc.value_type {
        ValueType::Integer => apply_integer(desc, input, current, live),
        ValueType::Toggle => apply_toggle(desc, input, current),
        ValueType::Mode => apply_mode(desc, input, current),
        ValueType::Text => apply_text(desc, input, current),
        ValueType::VlanList => apply_vlan_list(desc, input, current),
    }
}

fn clamp(desc: &FieldDescriptor, current: &FieldValue, reason: ClampReason) -> Applied {
    match desc.clamp {
        ClampPolicy::Sentinel => Applied::new(desc.sentinel.value(), Outcome::Clamped(reason)),
        ClampPolicy::Default(v) => Applied::new(FieldValue::Int(v), Outcome::Clamped(reason)),
        ClampPolicy::KeepCurrent => {
            let reason = match reason {
                ClampReason::OutOfRange { lo, hi } => ClampReason::NotSettable { lo, hi },
                other => other,
            };
            Applied::keep(current, Outcome::Clamped(reason))
        }
    }
}

fn round_up(value: i64, step: i64) -> i64 {
    if step <= 1 || value <= 0 || value % step == 0 {
        return value;
    }
    (value / step + 1).checked_mul(step).unwrap_or(value)
}

fn apply_integer(desc: &FieldDescriptor, input: &str, current: &FieldValue, live: &dyn FieldLookup) -> Applied {
    let Ok(parsed) = input.parse::<i64>() else {
        return Applied::keep(
            current,
            Outcome::InputError(ValidationError::NotAnInteger { input: input.to_string() }),
        );
    };
    let value = desc.step.map_or(parsed, |step| round_up(parsed, step));

    let (lo, hi) = match &desc.domain {
        Domain::Range { lo, hi } => (lo.resolve(live), hi.resolve(live)),
        _ => (i64::MIN, i64::MAX),
    };

    if (lo..=hi).contains(&value) {
        Applied::new(FieldValue::Int(value), Outcome::Accepted)
    } else {
        clamp(desc, current, ClampReason::OutOfRange { lo, hi })
    }
}

/// Device code for an enabled toggle
pub const TOGGLE_TRUE: i64 = 2;
/// Device code for a disabled toggle
pub const TOGGLE_FALSE: i64 = 1;

fn apply_toggle(desc: &FieldDescriptor, input: &str, current: &FieldValue) -> Applied {
    let word = input.to_ascii_lowercase();
    let code = match word.as_str() {
        "true" | "yes" | "y" | "on" | "enable" | "enabled" => TOGGLE_TRUE,
        "false" | "no" | "n" | "off" | "disable" | "disabled" => TOGGLE_FALSE,
        "toggle" => {
            if current.as_int() == Some(TOGGLE_TRUE) {
                TOGGLE_FALSE
            } else {
                TOGGLE_TRUE
            }
        }
        _ => match word.parse::<i64>() {
            Ok(code) if code == TOGGLE_TRUE || code == TOGGLE_FALSE => code,
            Ok(_) => return clamp(desc, current, ClampReason::OutOfRange { lo: TOGGLE_FALSE, hi: TOGGLE_TRUE }),
            Err(_) => {
                return Applied::keep(
                    current,
                    Outcome::InputError(ValidationError::NotAToggle { input: input.to_string() }),
                )
            }
        },
    };
    Applied::new(FieldValue::Int(code), Outcome::Accepted)
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_ascii_lowercase()
}

fn apply_mode(desc: &FieldDescriptor, input: &str, current: &FieldValue) -> Applied {
    let Domain::Modes(modes) = desc.domain else {
        return Applied::keep(current, Outcome::Unchanged);
    };

    if let Ok(code) = input.parse::<i64>() {
        return if modes.iter().any(|m| m.code == code) {
            Applied::new(FieldValue::Int(code), Outcome::Accepted)
        } else {
            clamp(desc, current, ClampReason::UnknownCode(code))
        };
    }

    let wanted = normalize_label(input);
    match modes.iter().find(|m| normalize_label(m.label) == wanted) {
        Some(mode) => Applied::new(FieldValue::Int(mode.code), Outcome::Accepted),
        None => Applied::keep(
            current,
            Outcome::InputError(ValidationError::UnknownMode {
                input: input.to_string(),
                expected: desc.domain.to_string(),
            }),
        ),
    }
}

/// Whether `ch` may appear in a free-text field
#[inline]
#[must_use]
pub fn is_text_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || TEXT_PUNCTUATION.contains(&ch)
}

fn apply_text(desc: &FieldDescriptor, input: &str, current: &FieldValue) -> Applied {
    if let Some(ch) = input.chars().find(|c| !is_text_char(*c)) {
        return Applied::keep(
            current,
            Outcome::InputError(ValidationError::InvalidCharacter { input: input.to_string(), ch }),
        );
    }

    if let Domain::Text { max_len } = desc.domain {
        if input.chars().count() > max_len {
            return clamp(desc, current, ClampReason::TooLong { max_len });
        }
    }
    Applied::new(FieldValue::Text(input.to_string()), Outcome::Accepted)
}

fn apply_vlan_list(desc: &FieldDescriptor, input: &str, current: &FieldValue) -> Applied {
    let (lo, hi) = match desc.domain {
        Domain::VlanList { lo, hi } => (lo, hi),
        _ => (u16::MIN, u16::MAX),
    };

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    let mut unreadable = false;
    for token in input.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        match token.parse::<i64>() {
            Ok(id) => match u16::try_from(id) {
                Ok(id) if (lo..=hi).contains(&id) => accepted.push(id),
                _ => rejected.push(token.to_string()),
            },
            Err(_) => {
                unreadable = true;
                rejected.push(token.to_string());
            }
        }
    }

    if accepted.is_empty() {
        // Numbers that are all out of range clamp like any other integer.
        if !unreadable {
            return Applied::new(
                desc.sentinel.value(),
                Outcome::Clamped(ClampReason::OutOfRange {
                    lo: i64::from(lo),
                    hi: i64::from(hi),
                }),
            );
        }
        return Applied::keep(
            current,
            Outcome::InputError(ValidationError::NoValidElements { input: input.to_string() }),
        );
    }

    accepted.sort_unstable();
    accepted.dedup();
    let outcome = if rejected.is_empty() {
        Outcome::Accepted
    } else {
        Outcome::PartiallyAccepted { rejected }
    };
    Applied::new(FieldValue::List(accepted), outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Bound, Mode};
    use crate::value::FieldMap;

    const PCP: FieldDescriptor = FieldDescriptor::int(FieldId::MatchUsCPcp, 0, 7, -1);
    const TOGGLE: FieldDescriptor = FieldDescriptor::toggle(FieldId::PortProtect);
    const SCHED_MODES: &[Mode] = &[Mode::new(1, "strict-priority"), Mode::new(2, "weighted-round-robin")];
    const SCHED: FieldDescriptor = FieldDescriptor::mode(FieldId::DsSchedulingMode, SCHED_MODES, 1).keep_current();
    const NAME: FieldDescriptor = FieldDescriptor::text(FieldId::FlowProfileName, 16);
    const VLANS: FieldDescriptor = FieldDescriptor::vlan_list(FieldId::CVid, 2, 4094);

    #[test]
    fn empty_input_is_unchanged() {
        let applied = apply(&PCP, "   ", &FieldValue::Int(3));
        assert_eq!(applied, Applied::new(FieldValue::Int(3), Outcome::Unchanged));
    }

    #[test]
    fn integer_in_range_is_accepted() {
        let applied = apply(&PCP, " 5 ", &FieldValue::Int(-1));
        assert_eq!(applied.value, FieldValue::Int(5));
        assert_eq!(applied.outcome, Outcome::Accepted);
    }

    #[test]
    fn integer_out_of_range_resets_to_sentinel() {
        let applied = apply(&PCP, "8", &FieldValue::Int(3));
        assert_eq!(applied.value, FieldValue::Int(-1));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::OutOfRange { lo: 0, hi: 7 }));
    }

    #[test]
    fn integer_garbage_is_input_error() {
        let applied = apply(&PCP, "seven", &FieldValue::Int(3));
        assert_eq!(applied.value, FieldValue::Int(3));
        assert!(applied.outcome.is_input_error());
    }

    #[test]
    fn dependent_bound_keeps_current_when_violated() {
        const CDR: FieldDescriptor = FieldDescriptor::int(FieldId::UsCdr, 128, 2_500_000, 0)
            .with_bounds(Bound::Fixed(128), Bound::Field(FieldId::UsPdr))
            .keep_current();
        let mut live = FieldMap::new();
        live.insert(FieldId::UsPdr, FieldValue::Int(1000));

        let applied = apply_with(&CDR, "2000", &FieldValue::Int(500), &live);
        assert_eq!(applied.value, FieldValue::Int(500));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::NotSettable { lo: 128, hi: 1000 }));

        let applied = apply_with(&CDR, "900", &FieldValue::Int(500), &live);
        assert_eq!(applied.value, FieldValue::Int(900));
        assert_eq!(applied.outcome, Outcome::Accepted);
    }

    #[test]
    fn step_rounds_up() {
        const RATE: FieldDescriptor = FieldDescriptor::int(FieldId::FixedDataRate, 256, 2_500_000, 0).step(64);
        assert_eq!(apply(&RATE, "300", &FieldValue::Int(0)).value, FieldValue::Int(320));
        assert_eq!(apply(&RATE, "320", &FieldValue::Int(0)).value, FieldValue::Int(320));
    }

    #[test]
    fn closed_gate_leaves_value() {
        const FIXED: FieldDescriptor =
            FieldDescriptor::int(FieldId::FixedDataRate, 256, 2_500_000, 0).gated(FieldId::TcontType, &[1, 5]);
        let mut live = FieldMap::new();
        live.insert(FieldId::TcontType, FieldValue::Int(2));

        let applied = apply_with(&FIXED, "512", &FieldValue::Int(0), &live);
        assert_eq!(applied.value, FieldValue::Int(0));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::Gated { by: FieldId::TcontType }));

        live.insert(FieldId::TcontType, FieldValue::Int(5));
        assert_eq!(apply_with(&FIXED, "512", &FieldValue::Int(0), &live).outcome, Outcome::Accepted);
    }

    #[test]
    fn toggle_words_and_flip() {
        assert_eq!(apply(&TOGGLE, "Yes", &FieldValue::Int(0)).value, FieldValue::Int(TOGGLE_TRUE));
        assert_eq!(apply(&TOGGLE, "off", &FieldValue::Int(2)).value, FieldValue::Int(TOGGLE_FALSE));
        assert_eq!(apply(&TOGGLE, "toggle", &FieldValue::Int(2)).value, FieldValue::Int(TOGGLE_FALSE));
        assert_eq!(apply(&TOGGLE, "toggle", &FieldValue::Int(0)).value, FieldValue::Int(TOGGLE_TRUE));

        let applied = apply(&TOGGLE, "7", &FieldValue::Int(2));
        assert_eq!(applied.value, FieldValue::Int(0));
        assert!(matches!(applied.outcome, Outcome::Clamped(_)));

        assert!(apply(&TOGGLE, "maybe", &FieldValue::Int(2)).outcome.is_input_error());
    }

    #[test]
    fn mode_accepts_code_or_label() {
        assert_eq!(apply(&SCHED, "2", &FieldValue::Int(1)).value, FieldValue::Int(2));
        assert_eq!(apply(&SCHED, "Weighted Round Robin", &FieldValue::Int(1)).value, FieldValue::Int(2));

        let applied = apply(&SCHED, "9", &FieldValue::Int(2));
        assert_eq!(applied.value, FieldValue::Int(2));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::UnknownCode(9)));

        assert!(apply(&SCHED, "fastest", &FieldValue::Int(1)).outcome.is_input_error());
    }

    #[test]
    fn text_charset_and_length() {
        let applied = apply(&NAME, "fp_internet-1", &FieldValue::Text(String::new()));
        assert_eq!(applied.value, FieldValue::Text("fp_internet-1".into()));

        let applied = apply(&NAME, "bad name", &FieldValue::Text("old".into()));
        assert_eq!(applied.value, FieldValue::Text("old".into()));
        assert!(matches!(
            applied.outcome,
            Outcome::InputError(ValidationError::InvalidCharacter { ch: ' ', .. })
        ));

        let applied = apply(&NAME, "a-name-much-too-long", &FieldValue::Text("old".into()));
        assert_eq!(applied.value, FieldValue::Text(String::new()));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::TooLong { max_len: 16 }));
    }

    #[test]
    fn vlan_list_partial_and_empty() {
        let applied = apply(&VLANS, "10 5000 20,10 abc", &FieldValue::List(vec![]));
        assert_eq!(applied.value, FieldValue::List(vec![10, 20]));
        assert_eq!(
            applied.outcome,
            Outcome::PartiallyAccepted { rejected: vec!["5000".to_string(), "abc".to_string()] }
        );

        let applied = apply(&VLANS, "1 4095", &FieldValue::List(vec![7]));
        assert_eq!(applied.value, FieldValue::List(vec![]));
        assert_eq!(applied.outcome, Outcome::Clamped(ClampReason::OutOfRange { lo: 2, hi: 4094 }));

        let applied = apply(&VLANS, "abc 4095", &FieldValue::List(vec![7]));
        assert_eq!(applied.value, FieldValue::List(vec![7]));
        assert!(matches!(applied.outcome, Outcome::InputError(ValidationError::NoValidElements { .. })));

        assert_eq!(apply(&VLANS, "30 2", &FieldValue::List(vec![])).outcome, Outcome::Accepted);
    }
}
