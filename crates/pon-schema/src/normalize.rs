//! Post-edit normalisation
//!
//! An edit to one field can invalidate another: changing the T-CONT type
//! closes the gate on rates the new type cannot carry, and raising a fixed
//! rate can push the maximum rate below its floor. [`normalize`] resets every
//! such field to its sentinel so the profile is back inside its domain.

use crate::descriptor::{Bound, Domain, FieldDescriptor};
use crate::field::FieldId;
use crate::kind::ProfileKind;
use crate::tables::descriptors;
use crate::value::{FieldLookup, FieldMap, FieldValue};

/// Reset fields whose gate is closed or whose field-relative range no longer
/// holds. Returns the fields that were reset, in table order.
pub fn normalize(kind: ProfileKind, fields: &mut FieldMap) -> Vec<FieldId> {
    let mut reset = Vec::new();

    for desc in descriptors(kind) {
        if needs_reset(desc, fields) {
            fields.insert(desc.id, desc.sentinel.value());
            reset.push(desc.id);
        }
    }

    reset
}

fn needs_reset(desc: &FieldDescriptor, live: &FieldMap) -> bool {
    let Some(value) = live.field(desc.id) else {
        return false;
    };
    if desc.sentinel.matches(value) {
        return false;
    }

    if desc.gate.is_some_and(|gate| !gate.holds(live)) {
        return true;
    }
    match (&desc.domain, value) {
        (Domain::Range { lo, hi }, FieldValue::Int(v)) if is_relative(lo) || is_relative(hi) => {
            !(lo.resolve(live)..=hi.resolve(live)).contains(v)
        }
        _ => false,
    }
}

fn is_relative(bound: &Bound) -> bool {
    !matches!(bound, Bound::Fixed(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tcont(kind: i64, fixed: i64, assured: i64, max: i64) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(FieldId::TcontType, FieldValue::Int(kind));
        map.insert(FieldId::TcontId, FieldValue::Int(1));
        map.insert(FieldId::FixedDataRate, FieldValue::Int(fixed));
        map.insert(FieldId::AssuredDataRate, FieldValue::Int(assured));
        map.insert(FieldId::MaxDataRate, FieldValue::Int(max));
        map
    }

    #[test]
    fn type_change_drops_rates_the_type_cannot_carry() {
        // Type 1 carries only a fixed rate.
        let mut fields = tcont(1, 512, 1024, 4096);
        let reset = normalize(ProfileKind::OnuTcont, &mut fields);

        assert_eq!(reset, vec![FieldId::AssuredDataRate, FieldId::MaxDataRate]);
        assert_eq!(fields[&FieldId::FixedDataRate], FieldValue::Int(512));
        assert_eq!(fields[&FieldId::AssuredDataRate], FieldValue::Int(0));
        assert_eq!(fields[&FieldId::MaxDataRate], FieldValue::Int(0));
    }

    #[test]
    fn max_below_committed_sum_is_reset() {
        let mut fields = tcont(5, 2048, 2048, 3072);
        let reset = normalize(ProfileKind::OnuTcont, &mut fields);
        assert_eq!(reset, vec![FieldId::MaxDataRate]);
    }

    #[test]
    fn consistent_profile_is_untouched() {
        let mut fields = tcont(5, 512, 1024, 4096);
        let before = fields.clone();
        assert!(normalize(ProfileKind::OnuTcont, &mut fields).is_empty());
        assert_eq!(fields, before);
    }
}
