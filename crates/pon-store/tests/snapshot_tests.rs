use pon_schema::{FieldId, FieldValue, ProfileKind};
use pon_store::{DeviceSnapshot, MemoryStore, OnuRegistration, Profile, ProfileStore, SnapshotError, SnapshotStore};
use pretty_assertions::assert_eq;
use serde_json::json;

fn seed() -> DeviceSnapshot {
    MemoryStore::new()
        .with_profile(Profile::new(ProfileKind::Vlan, "v100").with_field(FieldId::SVid, FieldValue::Int(100)))
        .with_profile(
            Profile::new(ProfileKind::Service, "sp1").with_field(FieldId::VlanProfileName, FieldValue::Text("v100".into())),
        )
        .with_onu(OnuRegistration::new("ALCL0001").on_interface("0/1").with_service("sp1"))
        .snapshot()
}

#[test]
fn mutations_are_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olt.json");

    let store = SnapshotStore::initialize(&path, seed()).unwrap();
    store
        .create(ProfileKind::Vlan, &json!({"Name": "v200", "SVid": 200, "Usage": 0}))
        .unwrap();

    let reopened = SnapshotStore::open(&path).unwrap();
    let v200 = reopened.get_by_name(ProfileKind::Vlan, "v200").unwrap();
    assert_eq!(v200.fields()[&FieldId::SVid], FieldValue::Int(200));
    assert_eq!(v200.extra().get("Usage"), Some(&json!(0)));
    assert_eq!(reopened.onu_registry().unwrap().len(), 1);

    reopened.delete(ProfileKind::Vlan, "v200").unwrap();
    let again = SnapshotStore::open(&path).unwrap();
    assert!(!again.exists(ProfileKind::Vlan, "v200").unwrap());
}

#[test]
fn yaml_snapshots_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olt.yaml");

    SnapshotStore::initialize(&path, seed()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("v100"));

    let reopened = SnapshotStore::open(&path).unwrap();
    assert_eq!(reopened.list(ProfileKind::Vlan).unwrap().len(), 1);
}

#[test]
fn failed_mutation_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olt.json");
    let store = SnapshotStore::initialize(&path, seed()).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    // Referenced by sp1
    assert!(store.delete(ProfileKind::Vlan, "v100").is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn duplicate_names_in_a_snapshot_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("olt.json");
    std::fs::write(&path, r#"{"profiles": {"Flow": [{"Name": "f1"}, {"Name": "f1"}]}}"#).unwrap();

    assert!(matches!(SnapshotStore::open(&path), Err(SnapshotError::Content(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SnapshotStore::open(dir.path().join("absent.json")),
        Err(SnapshotError::Io { .. })
    ));
}
