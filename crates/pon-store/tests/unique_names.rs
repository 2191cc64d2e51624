use pon_schema::ProfileKind;
use pon_store::{MemoryStore, ProfileStore};
use proptest::prelude::*;
use serde_json::json;

#[derive(Debug, Clone)]
enum Op {
    Create(ProfileKind, &'static str, i64),
    Delete(ProfileKind, &'static str),
}

fn op() -> impl Strategy<Value = Op> {
    let kind = prop_oneof![Just(ProfileKind::Vlan), Just(ProfileKind::Flow)];
    let name = prop_oneof![Just("a"), Just("b"), Just("c")];
    prop_oneof![
        (kind.clone(), name.clone(), 0i64..4094).prop_map(|(k, n, v)| Op::Create(k, n, v)),
        (kind, name).prop_map(|(k, n)| Op::Delete(k, n)),
    ]
}

proptest! {
    #[test]
    fn prop_at_most_one_object_per_name(ops in proptest::collection::vec(op(), 1..40)) {
        let store = MemoryStore::new();
        for op in ops {
            match op {
                Op::Create(kind, name, svid) => {
                    let existed = store.exists(kind, name).unwrap();
                    let result = store.create(kind, &json!({"Name": name, "SVid": svid}));
                    prop_assert_eq!(result.is_ok(), !existed);
                }
                Op::Delete(kind, name) => {
                    let existed = store.exists(kind, name).unwrap();
                    let result = store.delete(kind, name);
                    prop_assert_eq!(result.is_ok(), existed);
                }
            }

            for kind in [ProfileKind::Vlan, ProfileKind::Flow] {
                let listed: Vec<String> = store.list(kind).unwrap().iter().map(|p| p.name().to_string()).collect();
                let mut unique = listed.clone();
                unique.dedup();
                prop_assert_eq!(&listed, &unique);
                for name in ["a", "b", "c"] {
                    prop_assert!(store.count(kind, name) <= 1);
                }
            }
        }
    }
}
