//! Per-kind descriptor tables
//!
//! One static table per profile kind. Table order is display order.
//! Kinds without editable fields have an empty table; they can still be
//! copied, renamed and deleted.

mod flow;
mod onu;
mod security;
mod service;
mod vlan;

pub use onu::{tcont_auto_name, tcont_type_description, MAX_RATE_KBPS, RATE_STEP_KBPS};
pub use service::NAME_MAX_LEN;
pub use vlan::DEFAULT_S_ETHERTYPE;

use crate::descriptor::FieldDescriptor;
use crate::field::FieldId;
use crate::kind::ProfileKind;

/// Every editable field of `kind`, in display order
#[must_use]
pub fn descriptors(kind: ProfileKind) -> &'static [FieldDescriptor] {
    match kind {
        ProfileKind::Flow => flow::FLOW,
        ProfileKind::Vlan => vlan::VLAN,
        ProfileKind::Security => security::SECURITY,
        ProfileKind::OnuFlow => onu::ONU_FLOW,
        ProfileKind::OnuTcont => onu::ONU_TCONT,
        ProfileKind::Service => service::SERVICE,
        ProfileKind::OnuVlan | ProfileKind::IgmpMulticast | ProfileKind::OnuIgmpMulticast => &[],
    }
}

/// Descriptor of `id` within `kind`; `None` if the kind has no such field
#[must_use]
pub fn describe(kind: ProfileKind, id: FieldId) -> Option<&'static FieldDescriptor> {
    descriptors(kind).iter().find(|d| d.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClampPolicy, Domain, Sentinel, ValueType};

    #[test]
    fn no_duplicate_fields_within_a_kind() {
        for kind in ProfileKind::ALL {
            let mut ids: Vec<_> = descriptors(*kind).iter().map(|d| d.id).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(before, ids.len(), "duplicate field in {kind}");
        }
    }

    #[test]
    fn describe_is_scoped_to_kind() {
        assert!(describe(ProfileKind::Flow, FieldId::DsQueuingPriority).is_some());
        assert!(describe(ProfileKind::Vlan, FieldId::DsQueuingPriority).is_none());
        assert!(describe(ProfileKind::OnuVlan, FieldId::CVid).is_none());
    }

    #[test]
    fn shared_ids_have_kind_specific_domains() {
        let flow = describe(ProfileKind::Flow, FieldId::UsCdr).unwrap();
        let onu = describe(ProfileKind::OnuFlow, FieldId::UsCdr).unwrap();
        assert_eq!(flow.clamp, ClampPolicy::Sentinel);
        assert_eq!(onu.clamp, ClampPolicy::KeepCurrent);
        assert_eq!(onu.step, Some(RATE_STEP_KBPS));
    }

    #[test]
    fn every_sub_profile_kind_has_a_service_reference() {
        for kind in ProfileKind::ALL.iter().filter(|k| k.is_sub_profile()) {
            let field = kind.service_reference_field().unwrap();
            let desc = describe(ProfileKind::Service, field).unwrap();
            assert_eq!(desc.reference, Some(*kind));
            assert_eq!(desc.value_type, ValueType::Text);
        }
    }

    #[test]
    fn sentinels_match_value_types() {
        for kind in ProfileKind::ALL {
            for desc in descriptors(*kind) {
                let ok = match desc.value_type {
                    ValueType::Toggle | ValueType::Integer | ValueType::Mode => {
                        matches!(desc.sentinel, Sentinel::Int(_))
                    }
                    ValueType::Text => desc.sentinel == Sentinel::EmptyText,
                    ValueType::VlanList => desc.sentinel == Sentinel::EmptyList,
                };
                assert!(ok, "{kind}.{} has a mismatched sentinel", desc.id);

                if let Domain::Modes(modes) = desc.domain {
                    assert!(!modes.is_empty());
                }
            }
        }
    }

    #[test]
    fn tcont_naming() {
        let mut fields = crate::FieldMap::new();
        fields.insert(FieldId::TcontType, crate::FieldValue::Int(3));
        fields.insert(FieldId::AssuredDataRate, crate::FieldValue::Int(1024));
        fields.insert(FieldId::MaxDataRate, crate::FieldValue::Int(4096));
        assert_eq!(tcont_auto_name(&fields), "T3_F0_A1024_M4096");
        assert!(tcont_type_description(4).contains("best effort"));
    }
}
