use pon_engine::{Intent, ProfileEngine};
use pon_schema::{FieldId, ProfileKind};
use pon_store::{Profile, ProfileStore, StoreError};
use pon_test_utils::{device_store, RecordingStore};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["v1", "a", "b", "c"];

#[derive(Debug, Clone)]
enum Op {
    /// Edit in place, or under `new_name` (rename when unused, copy when in use)
    Modify {
        name: &'static str,
        new_name: Option<&'static str>,
        svid: i64,
        create_fails: bool,
    },
    Delete(&'static str),
}

fn name() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(NAMES.to_vec())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (name(), proptest::option::of(name()), -5i64..5000, proptest::bool::weighted(0.1)).prop_map(
            |(name, new_name, svid, create_fails)| Op::Modify {
                name,
                new_name,
                svid,
                create_fails,
            }
        ),
        name().prop_map(Op::Delete),
    ]
}

fn engine() -> ProfileEngine<RecordingStore> {
    let store = device_store().with_profile(Profile::new(ProfileKind::Vlan, "a"));
    ProfileEngine::new(RecordingStore::new(store))
}

fn run(engine: &ProfileEngine<RecordingStore>, op: &Op) {
    match op {
        Op::Modify {
            name,
            new_name,
            svid,
            create_fails,
        } => {
            let Ok(mut txn) = engine.begin_transaction(ProfileKind::Vlan, name, Intent::Modify) else {
                return;
            };
            if let Some(new_name) = new_name {
                if txn.assign_name(new_name).is_err() {
                    return;
                }
            }
            if txn.apply_field(FieldId::SVid, &svid.to_string()).is_err() {
                return;
            }
            if *create_fails {
                engine.store().fail_next_create(StoreError::Unavailable { reason: "reset".into() });
            }
            let _ = txn.commit(None);
        }
        Op::Delete(name) => {
            let _ = engine.delete(ProfileKind::Vlan, name);
        }
    }
}

proptest! {
    #[test]
    fn prop_transactions_keep_names_unique(ops in proptest::collection::vec(op(), 1..30)) {
        let engine = engine();
        for op in &ops {
            run(&engine, op);

            for name in NAMES {
                prop_assert!(engine.store().inner().count(ProfileKind::Vlan, name) <= 1, "{:?}", op);
            }
            // sp1 references v1, so nothing may remove it
            prop_assert!(engine.store().exists(ProfileKind::Vlan, "v1").unwrap());
        }
    }
}
