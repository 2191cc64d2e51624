//! VLAN profile fields

#![allow(clippy::enum_glob_use)]

use crate::descriptor::FieldDescriptor as D;
use crate::field::FieldId::*;

/// 802.1ad S-tag (0x88A8)
pub const DEFAULT_S_ETHERTYPE: i64 = 34984;

pub(super) const VLAN: &[D] = &[
    D::vlan_list(CVid, 2, 4094).help("Customer VLAN ids"),
    D::int(CVidNative, 0, 4094, -1).help("Native customer VLAN id; should be one of CVid"),
    D::int(SVid, 0, 4094, -1).help("Service VLAN id"),
    D::int_or_default(SEtherType, 2048, 37999, DEFAULT_S_ETHERTYPE)
        .help("S-tag EtherType, decimal (33024 = 0x8100, 34984 = 0x88A8, 37120 = 0x9100)"),
];
