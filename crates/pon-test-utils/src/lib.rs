//! Testing utilities for the PON profile crates
//!
//! Shared fixtures and a [`RecordingStore`] that logs every store call and
//! can be told to fail the next delete or create.

#![allow(missing_docs)]

use std::collections::VecDeque;

use parking_lot::Mutex;
use pon_schema::{FieldId, FieldValue, ProfileKind};
use pon_store::{body_name, MemoryStore, OnuRegistration, Profile, ProfileStore, StoreError};
use serde_json::Value as JsonValue;

/// One call seen by a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(ProfileKind),
    Get(ProfileKind, String),
    Delete(ProfileKind, String),
    Create(ProfileKind, String),
    OnuRegistry,
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Delete(..) | Self::Create(..))
    }
}

/// Store wrapper that records calls and injects failures
#[derive(Debug, Default)]
pub struct RecordingStore<S = MemoryStore> {
    inner: S,
    calls: Mutex<Vec<StoreCall>>,
    delete_failures: Mutex<VecDeque<StoreError>>,
    create_failures: Mutex<VecDeque<StoreError>>,
}

impl<S: ProfileStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            delete_failures: Mutex::new(VecDeque::new()),
            create_failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Make the next delete fail with `err` without reaching the inner store
    pub fn fail_next_delete(&self, err: StoreError) {
        self.delete_failures.lock().push_back(err);
    }

    /// Make the next create fail with `err` without reaching the inner store
    pub fn fail_next_create(&self, err: StoreError) {
        self.create_failures.lock().push_back(err);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls.lock().iter().filter(|c| c.is_mutation()).cloned().collect()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

impl<S: ProfileStore> ProfileStore for RecordingStore<S> {
    fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, StoreError> {
        self.record(StoreCall::List(kind));
        self.inner.list(kind)
    }

    fn get_by_name(&self, kind: ProfileKind, name: &str) -> Result<Profile, StoreError> {
        self.record(StoreCall::Get(kind, name.to_string()));
        self.inner.get_by_name(kind, name)
    }

    fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete(kind, name.to_string()));
        if let Some(err) = self.delete_failures.lock().pop_front() {
            return Err(err);
        }
        self.inner.delete(kind, name)
    }

    fn create(&self, kind: ProfileKind, body: &JsonValue) -> Result<(), StoreError> {
        self.record(StoreCall::Create(kind, body_name(body).unwrap_or_default().to_string()));
        if let Some(err) = self.create_failures.lock().pop_front() {
            return Err(err);
        }
        self.inner.create(kind, body)
    }

    fn onu_registry(&self) -> Result<Vec<OnuRegistration>, StoreError> {
        self.record(StoreCall::OnuRegistry);
        self.inner.onu_registry()
    }
}

pub fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub fn service(name: &str, references: &[(FieldId, &str)]) -> Profile {
    references
        .iter()
        .fold(Profile::new(ProfileKind::Service, name), |profile, (field, target)| {
            profile.with_field(*field, text(target))
        })
}

/// Device with one unused and several referenced profiles
///
/// - Flow `default`: unused
/// - Flow `fp-internet`, VLAN `v1`, Security `sec1`: used by service `sp1`
/// - Service `sp1`: provisioned on ONU `ALCL00000001`
/// - Service `sp-spare`: unused, references Flow `fp-internet`
pub fn device_store() -> MemoryStore {
    MemoryStore::new()
        .with_profile(
            Profile::new(ProfileKind::Flow, "default")
                .with_field(FieldId::DsQueuingPriority, FieldValue::Int(3))
                .with_field(FieldId::UsCdr, FieldValue::Int(0)),
        )
        .with_profile(Profile::new(ProfileKind::Flow, "fp-internet"))
        .with_profile(
            Profile::new(ProfileKind::Vlan, "v1")
                .with_field(FieldId::CVid, FieldValue::List(vec![10, 20]))
                .with_field(FieldId::CVidNative, FieldValue::Int(10)),
        )
        .with_profile(Profile::new(ProfileKind::Security, "sec1"))
        .with_profile(service(
            "sp1",
            &[
                (FieldId::FlowProfileName, "fp-internet"),
                (FieldId::VlanProfileName, "v1"),
                (FieldId::SecurityProfileName, "sec1"),
            ],
        ))
        .with_profile(service("sp-spare", &[(FieldId::FlowProfileName, "fp-internet")]))
        .with_onu(OnuRegistration::new("ALCL00000001").on_interface("1/1/1").with_service("sp1"))
}

/// Install a test-writer subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
