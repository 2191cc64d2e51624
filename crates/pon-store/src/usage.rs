//! Usage index
//!
//! Answers "who references this profile" by scanning the store: service
//! profiles name their sub-profiles, and ONU registrations name service
//! profiles. The answer is a point-in-time snapshot; nothing is cached.

use std::fmt::{self, Display, Formatter};

use pon_schema::ProfileKind;
use serde::Serialize;
use tracing::debug;

use crate::store::{ProfileStore, StoreError};

/// Object that references a profile by name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Dependent {
    /// Service profile naming the profile in one of its reference fields
    ServiceProfile(String),
    /// ONU provisioned with the (service) profile
    Onu {
        /// ONU serial number
        serial: String,
    },
}

impl Display for Dependent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceProfile(name) => write!(f, "service profile '{name}'"),
            Self::Onu { serial } => write!(f, "ONU {serial}"),
        }
    }
}

/// Lookup of the objects referencing a profile
pub trait UsageIndex {
    /// Direct dependents of the profile, ordered (service profiles by name,
    /// then ONUs by serial)
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan cannot read the store.
    fn dependents(&self, kind: ProfileKind, name: &str) -> Result<Vec<Dependent>, StoreError>;

    /// Whether anything references the profile
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan cannot read the store.
    fn is_in_use(&self, kind: ProfileKind, name: &str) -> Result<bool, StoreError> {
        Ok(!self.dependents(kind, name)?.is_empty())
    }
}

/// Usage of one profile, including ONUs reached through service profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    /// Profile kind
    pub kind: ProfileKind,
    /// Profile name
    pub name: String,
    /// Direct dependents
    pub dependents: Vec<Dependent>,
    /// ONUs using the profile directly or through a dependent service profile
    pub onus: Vec<String>,
}

impl UsageReport {
    /// Whether anything references the profile
    #[inline]
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        !self.dependents.is_empty()
    }
}

/// [`UsageIndex`] that scans a [`ProfileStore`] on every query
pub struct ScanUsageIndex<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: ProfileStore + ?Sized> ScanUsageIndex<'a, S> {
    /// Create an index over `store`
    #[inline]
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Direct dependents plus the ONUs reached through them
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the scan cannot read the store.
    pub fn report(&self, kind: ProfileKind, name: &str) -> Result<UsageReport, StoreError> {
        let dependents = self.dependents(kind, name)?;

        let services: Vec<&str> = match kind {
            ProfileKind::Service => vec![name],
            _ => dependents
                .iter()
                .filter_map(|d| match d {
                    Dependent::ServiceProfile(service) => Some(service.as_str()),
                    Dependent::Onu { .. } => None,
                })
                .collect(),
        };

        let mut onus: Vec<String> = if services.is_empty() {
            Vec::new()
        } else {
            self.store
                .onu_registry()?
                .into_iter()
                .filter(|onu| services.iter().any(|s| onu.uses(s)))
                .map(|onu| onu.serial_number)
                .collect()
        };
        onus.sort();
        onus.dedup();

        Ok(UsageReport {
            kind,
            name: name.to_string(),
            dependents,
            onus,
        })
    }
}

impl<S: ProfileStore + ?Sized> UsageIndex for ScanUsageIndex<'_, S> {
    fn dependents(&self, kind: ProfileKind, name: &str) -> Result<Vec<Dependent>, StoreError> {
        let mut found: Vec<Dependent> = match kind.service_reference_field() {
            Some(field) => self
                .store
                .list(ProfileKind::Service)?
                .into_iter()
                .filter(|service| service.text(field) == Some(name))
                .map(|service| Dependent::ServiceProfile(service.name().to_string()))
                .collect(),
            None => self
                .store
                .onu_registry()?
                .into_iter()
                .filter(|onu| onu.uses(name))
                .map(|onu| Dependent::Onu {
                    serial: onu.serial_number,
                })
                .collect(),
        };
        found.sort();
        found.dedup();

        debug!(%kind, profile = name, count = found.len(), "usage scan");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::onu::OnuRegistration;
    use crate::profile::Profile;
    use pon_schema::{FieldId, FieldValue};

    fn service(name: &str, flow: &str) -> Profile {
        Profile::new(ProfileKind::Service, name).with_field(FieldId::FlowProfileName, FieldValue::Text(flow.into()))
    }

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_profile(Profile::new(ProfileKind::Flow, "f1"))
            .with_profile(Profile::new(ProfileKind::Flow, "f2"))
            .with_profile(service("sp-b", "f1"))
            .with_profile(service("sp-a", "f1"))
            .with_onu(OnuRegistration::new("ALCL0002").with_service("sp-a"))
            .with_onu(OnuRegistration::new("ALCL0001").with_service("sp-b"))
            .with_onu(OnuRegistration::new("ALCL0003").with_service("sp-other"))
    }

    #[test]
    fn sub_profile_dependents_are_service_profiles() {
        let store = store();
        let index = ScanUsageIndex::new(&store);

        assert_eq!(
            index.dependents(ProfileKind::Flow, "f1").unwrap(),
            vec![
                Dependent::ServiceProfile("sp-a".into()),
                Dependent::ServiceProfile("sp-b".into())
            ]
        );
        assert!(!index.is_in_use(ProfileKind::Flow, "f2").unwrap());
        // Matching is exact string equality
        assert!(!index.is_in_use(ProfileKind::Flow, "F1").unwrap());
    }

    #[test]
    fn service_dependents_are_onus() {
        let store = store();
        let index = ScanUsageIndex::new(&store);
        assert_eq!(
            index.dependents(ProfileKind::Service, "sp-a").unwrap(),
            vec![Dependent::Onu {
                serial: "ALCL0002".into()
            }]
        );
    }

    #[test]
    fn report_follows_service_profiles_to_onus() {
        let store = store();
        let report = ScanUsageIndex::new(&store).report(ProfileKind::Flow, "f1").unwrap();
        assert!(report.is_in_use());
        assert_eq!(report.onus, vec!["ALCL0001".to_string(), "ALCL0002".to_string()]);

        let unused = ScanUsageIndex::new(&store).report(ProfileKind::Flow, "f2").unwrap();
        assert!(!unused.is_in_use());
        assert!(unused.onus.is_empty());
    }
}
