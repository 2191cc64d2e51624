use pon_schema::validator::{apply_with, is_text_char};
use pon_schema::{
    descriptors, Domain, FieldDescriptor, FieldId, FieldLookup, FieldMap, FieldValue, Outcome, ProfileKind,
};
use proptest::prelude::*;

/// Live values for a profile of `kind` with every field at its sentinel
fn resting_profile(kind: ProfileKind, tcont_type: i64) -> FieldMap {
    let mut fields: FieldMap = descriptors(kind).iter().map(|d| (d.id, d.sentinel.value())).collect();
    if kind == ProfileKind::OnuTcont {
        fields.insert(FieldId::TcontType, FieldValue::Int(tcont_type));
    }
    fields
}

fn in_domain(desc: &FieldDescriptor, value: &FieldValue, live: &dyn FieldLookup) -> bool {
    match (&desc.domain, value) {
        (Domain::Toggle, FieldValue::Int(v)) => *v == 1 || *v == 2,
        (Domain::Range { lo, hi }, FieldValue::Int(v)) => (lo.resolve(live)..=hi.resolve(live)).contains(v),
        (Domain::Modes(modes), FieldValue::Int(v)) => modes.iter().any(|m| m.code == *v),
        (Domain::Text { max_len }, FieldValue::Text(t)) => t.chars().count() <= *max_len && t.chars().all(is_text_char),
        (Domain::VlanList { lo, hi }, FieldValue::List(ids)) => ids.iter().all(|id| (*lo..=*hi).contains(id)),
        _ => false,
    }
}

fn editable_field() -> impl Strategy<Value = (ProfileKind, &'static FieldDescriptor)> {
    let all: Vec<(ProfileKind, &'static FieldDescriptor)> = ProfileKind::ALL
        .iter()
        .flat_map(|kind| descriptors(*kind).iter().map(move |d| (*kind, d)))
        .collect();
    proptest::sample::select(all)
}

fn raw_input() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|v| v.to_string()),
        (-10i64..5000).prop_map(|v| v.to_string()),
        "[a-zA-Z0-9_ .:-]{1,40}",
        proptest::collection::vec(0u32..5000, 1..6).prop_map(|ids| {
            ids.iter().map(u32::to_string).collect::<Vec<_>>().join(" ")
        }),
        Just("toggle".to_string()),
        Just("true".to_string()),
    ]
}

#[test]
fn tables_are_populated() {
    let count: usize = ProfileKind::ALL.iter().map(|k| descriptors(*k).len()).sum();
    assert!(count > 100);
}

proptest! {
    #[test]
    fn prop_result_is_in_domain_or_sentinel(
        (kind, desc) in editable_field(),
        raw in raw_input(),
        tcont_type in 1i64..=5,
    ) {
        let live = resting_profile(kind, tcont_type);
        let current = desc.sentinel.value();
        let applied = apply_with(desc, &raw, &current, &live);

        match &applied.outcome {
            Outcome::InputError(_) | Outcome::Unchanged => prop_assert_eq!(&applied.value, &current),
            _ => prop_assert!(
                desc.sentinel.matches(&applied.value) || in_domain(desc, &applied.value, &live),
                "{}.{} <- {:?} produced {:?}",
                kind,
                desc.id,
                raw,
                applied.value
            ),
        }
    }

    #[test]
    fn prop_blank_input_is_a_no_op(
        (kind, desc) in editable_field(),
        blank in "[ \t]{0,4}",
        current in prop_oneof![
            any::<i64>().prop_map(FieldValue::Int),
            "[a-z0-9]{0,8}".prop_map(FieldValue::Text),
            proptest::collection::vec(2u16..4095, 0..4).prop_map(FieldValue::List),
        ],
    ) {
        let live = resting_profile(kind, 5);
        let applied = apply_with(desc, &blank, &current, &live);
        prop_assert_eq!(applied.outcome, Outcome::Unchanged);
        prop_assert_eq!(applied.value, current);
    }

    #[test]
    fn prop_clamped_never_leaves_the_domain(
        (kind, desc) in editable_field(),
        value in any::<i64>(),
    ) {
        let live = resting_profile(kind, 5);
        let current = desc.sentinel.value();
        let applied = apply_with(desc, &value.to_string(), &current, &live);
        if let Outcome::Clamped(_) = applied.outcome {
            prop_assert!(desc.sentinel.matches(&applied.value) || in_domain(desc, &applied.value, &live));
        }
    }
}
