//! Service profile fields

#![allow(clippy::enum_glob_use)]

use crate::descriptor::{FieldDescriptor as D, Mode};
use crate::field::FieldId::*;
use crate::kind::ProfileKind;

/// Longest profile name the device accepts
pub const NAME_MAX_LEN: usize = 32;

const TP_TYPES: &[Mode] = &[Mode::new(1, "eth-uni"), Mode::new(2, "veip"), Mode::new(3, "ip-host")];

pub(super) const SERVICE: &[D] = &[
    D::text(FlowProfileName, NAME_MAX_LEN).references(ProfileKind::Flow).help("Flow profile"),
    D::text(VlanProfileName, NAME_MAX_LEN).references(ProfileKind::Vlan).help("VLAN profile"),
    D::text(OnuFlowProfileName, NAME_MAX_LEN).references(ProfileKind::OnuFlow).help("ONU flow profile"),
    D::text(OnuTcontProfileName, NAME_MAX_LEN).references(ProfileKind::OnuTcont).help("ONU T-CONT profile"),
    D::text(OnuVlanProfileName, NAME_MAX_LEN).references(ProfileKind::OnuVlan).help("ONU VLAN profile"),
    D::text(SecurityProfileName, NAME_MAX_LEN).references(ProfileKind::Security).help("Security profile"),
    D::text(IgmpProfileName, NAME_MAX_LEN).references(ProfileKind::IgmpMulticast).help("IGMP profile"),
    D::text(OnuIgmpProfileName, NAME_MAX_LEN).references(ProfileKind::OnuIgmpMulticast).help("ONU IGMP profile"),
    D::int_or_default(OnuVirtGemPortId, 1, 32, 1).help("Virtual GEM port id"),
    D::mode(OnuTpType, TP_TYPES, 1).keep_current().help("ONU termination point type"),
    D::toggle(DhcpRelayAgent).help("DHCP relay agent (option 82)"),
    D::toggle(PppoeIntermediateAgent).help("PPPoE intermediate agent"),
];
