//! In-memory profile store
//!
//! Behaves like the device: one object per `(kind, name)`, create refuses a
//! taken name, and delete refuses a profile something still references.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use pon_schema::ProfileKind;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::onu::OnuRegistration;
use crate::profile::{body_name, BodyError, Profile};
use crate::snapshot::DeviceSnapshot;
use crate::store::{ProfileStore, StoreError};
use crate::usage::{ScanUsageIndex, UsageIndex};

#[derive(Debug, Default)]
struct Inner {
    profiles: BTreeMap<ProfileKind, BTreeMap<String, JsonValue>>,
    onus: Vec<OnuRegistration>,
}

/// Device-like store held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add or replace a profile
    #[must_use]
    pub fn with_profile(self, profile: Profile) -> Self {
        self.inner
            .write()
            .profiles
            .entry(profile.kind())
            .or_default()
            .insert(profile.name().to_string(), profile.to_body());
        self
    }

    /// Builder: register an ONU
    #[must_use]
    pub fn with_onu(self, onu: OnuRegistration) -> Self {
        self.inner.write().onus.push(onu);
        self
    }

    /// Load every profile and ONU of a snapshot
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] if a body has no name, or
    /// [`StoreError::RemoteRejected`] if a kind lists the same name twice.
    pub fn from_snapshot(snapshot: DeviceSnapshot) -> Result<Self, StoreError> {
        let store = Self::new();
        for (kind, bodies) in snapshot.profiles {
            for body in bodies {
                store.create(kind, &body)?;
            }
        }
        store.inner.write().onus = snapshot.onus;
        Ok(store)
    }

    /// Copy of the full store content
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        let inner = self.inner.read();
        DeviceSnapshot {
            profiles: inner
                .profiles
                .iter()
                .filter(|(_, by_name)| !by_name.is_empty())
                .map(|(kind, by_name)| (*kind, by_name.values().cloned().collect()))
                .collect(),
            onus: inner.onus.clone(),
        }
    }

    /// Number of stored profiles of `kind` named `name` (0 or 1)
    #[must_use]
    pub fn count(&self, kind: ProfileKind, name: &str) -> usize {
        self.inner
            .read()
            .profiles
            .get(&kind)
            .map_or(0, |by_name| usize::from(by_name.contains_key(name)))
    }

    /// Names of all stored profiles of `kind`, ascending
    #[must_use]
    pub fn names(&self, kind: ProfileKind) -> Vec<String> {
        self.inner
            .read()
            .profiles
            .get(&kind)
            .map(|by_name| by_name.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ProfileStore for MemoryStore {
    fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, StoreError> {
        debug!(%kind, "list");
        let inner = self.inner.read();
        let Some(by_name) = inner.profiles.get(&kind) else {
            return Ok(Vec::new());
        };
        by_name
            .values()
            .map(|body| Profile::from_body(kind, body).map_err(StoreError::from))
            .collect()
    }

    fn get_by_name(&self, kind: ProfileKind, name: &str) -> Result<Profile, StoreError> {
        debug!(%kind, profile = name, "get");
        let inner = self.inner.read();
        let body = inner
            .profiles
            .get(&kind)
            .and_then(|by_name| by_name.get(name))
            .ok_or_else(|| StoreError::not_found(kind, name))?;
        Ok(Profile::from_body(kind, body)?)
    }

    fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), StoreError> {
        debug!(%kind, profile = name, "delete");
        if self.count(kind, name) == 0 {
            return Err(StoreError::not_found(kind, name));
        }
        if ScanUsageIndex::new(self).is_in_use(kind, name)? {
            return Err(StoreError::rejected("delete", kind, name, "profile is in use"));
        }

        self.inner
            .write()
            .profiles
            .get_mut(&kind)
            .and_then(|by_name| by_name.remove(name))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(kind, name))
    }

    fn create(&self, kind: ProfileKind, body: &JsonValue) -> Result<(), StoreError> {
        let name = body_name(body).ok_or(BodyError::MissingName)?.to_string();
        debug!(%kind, profile = %name, "create");
        Profile::from_body(kind, body)?;

        let mut inner = self.inner.write();
        let by_name = inner.profiles.entry(kind).or_default();
        if by_name.contains_key(&name) {
            return Err(StoreError::rejected("create", kind, &name, "name already exists"));
        }
        by_name.insert(name, body.clone());
        Ok(())
    }

    fn onu_registry(&self) -> Result<Vec<OnuRegistration>, StoreError> {
        debug!("onu registry");
        Ok(self.inner.read().onus.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pon_schema::{FieldId, FieldValue};
    use serde_json::json;

    #[test]
    fn create_refuses_taken_name() {
        let store = MemoryStore::new();
        store.create(ProfileKind::Vlan, &json!({"Name": "v1", "SVid": 10})).unwrap();

        let err = store.create(ProfileKind::Vlan, &json!({"Name": "v1", "SVid": 20})).unwrap_err();
        assert!(matches!(err, StoreError::RemoteRejected { operation: "create", .. }));
        assert_eq!(
            store.get_by_name(ProfileKind::Vlan, "v1").unwrap().fields()[&FieldId::SVid],
            FieldValue::Int(10)
        );

        // Same name under another kind is a different object
        store.create(ProfileKind::Flow, &json!({"Name": "v1"})).unwrap();
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete(ProfileKind::Flow, "nope").unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.exists(ProfileKind::Flow, "nope").unwrap());
    }

    #[test]
    fn delete_refuses_referenced_profile() {
        let store = MemoryStore::new().with_profile(Profile::new(ProfileKind::Flow, "f1")).with_profile(
            Profile::new(ProfileKind::Service, "sp").with_field(FieldId::FlowProfileName, FieldValue::Text("f1".into())),
        );
        let err = store.delete(ProfileKind::Flow, "f1").unwrap_err();
        assert!(matches!(err, StoreError::RemoteRejected { operation: "delete", .. }));
        assert_eq!(store.count(ProfileKind::Flow, "f1"), 1);

        store.delete(ProfileKind::Service, "sp").unwrap();
        store.delete(ProfileKind::Flow, "f1").unwrap();
        assert_eq!(store.count(ProfileKind::Flow, "f1"), 0);
    }

    #[test]
    fn create_rejects_nameless_body() {
        let store = MemoryStore::new();
        let err = store.create(ProfileKind::Flow, &json!({"UsCdr": 1})).unwrap_err();
        assert_eq!(err, StoreError::Malformed(BodyError::MissingName));
    }

    #[test]
    fn snapshot_roundtrip() {
        let store = MemoryStore::new()
            .with_profile(Profile::new(ProfileKind::Flow, "f1").with_field(FieldId::UsCdr, FieldValue::Int(100)))
            .with_onu(OnuRegistration::new("ALCL0001").with_service("sp"));
        let copy = MemoryStore::from_snapshot(store.snapshot()).unwrap();
        assert_eq!(copy.list(ProfileKind::Flow).unwrap(), store.list(ProfileKind::Flow).unwrap());
        assert_eq!(copy.onu_registry().unwrap(), store.onu_registry().unwrap());
    }
}
