//! Profile kinds
//!
//! The closed set of object kinds the device stores by name, and the
//! name-reference relation between the service profile and its sub-profiles.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

/// Kind of a named profile on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    /// Service flow matching and QoS handling
    Flow,
    /// Customer/service VLAN tagging
    Vlan,
    /// Port security policy
    Security,
    /// ONU-side flow matching and rate shaping
    OnuFlow,
    /// ONU transmission container (T-CONT) bandwidth template
    OnuTcont,
    /// ONU-side VLAN translation rules
    OnuVlan,
    /// Top-level service template composing the sub-profiles
    Service,
    /// OLT IGMP multicast settings
    IgmpMulticast,
    /// ONU IGMP multicast settings
    OnuIgmpMulticast,
}

impl ProfileKind {
    /// Every kind, in display order
    pub const ALL: &'static [ProfileKind] = &[
        ProfileKind::Service,
        ProfileKind::Flow,
        ProfileKind::Vlan,
        ProfileKind::OnuFlow,
        ProfileKind::OnuTcont,
        ProfileKind::OnuVlan,
        ProfileKind::IgmpMulticast,
        ProfileKind::OnuIgmpMulticast,
        ProfileKind::Security,
    ];

    /// Stable identifier, identical to the serde representation
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "Flow",
            Self::Vlan => "Vlan",
            Self::Security => "Security",
            Self::OnuFlow => "OnuFlow",
            Self::OnuTcont => "OnuTcont",
            Self::OnuVlan => "OnuVlan",
            Self::Service => "Service",
            Self::IgmpMulticast => "IgmpMulticast",
            Self::OnuIgmpMulticast => "OnuIgmpMulticast",
        }
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flow => "Flow Profile",
            Self::Vlan => "VLAN Profile",
            Self::Security => "Security Profile",
            Self::OnuFlow => "ONU Flow Profile",
            Self::OnuTcont => "ONU T-CONT Profile",
            Self::OnuVlan => "ONU VLAN Profile",
            Self::Service => "Service Profile",
            Self::IgmpMulticast => "IGMP Profile",
            Self::OnuIgmpMulticast => "ONU IGMP Profile",
        }
    }

    /// Field of a service profile that names a profile of this kind.
    ///
    /// `None` for [`ProfileKind::Service`] itself, which is referenced by ONU
    /// registrations instead.
    #[must_use]
    pub const fn service_reference_field(self) -> Option<FieldId> {
        match self {
            Self::Flow => Some(FieldId::FlowProfileName),
            Self::Vlan => Some(FieldId::VlanProfileName),
            Self::Security => Some(FieldId::SecurityProfileName),
            Self::OnuFlow => Some(FieldId::OnuFlowProfileName),
            Self::OnuTcont => Some(FieldId::OnuTcontProfileName),
            Self::OnuVlan => Some(FieldId::OnuVlanProfileName),
            Self::IgmpMulticast => Some(FieldId::IgmpProfileName),
            Self::OnuIgmpMulticast => Some(FieldId::OnuIgmpProfileName),
            Self::Service => None,
        }
    }

    /// Whether this kind is composed into service profiles by name
    #[inline]
    #[must_use]
    pub const fn is_sub_profile(self) -> bool {
        self.service_reference_field().is_some()
    }
}

impl Display for ProfileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised profile kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile kind: '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for ProfileKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let normalized = normalized.trim_end_matches("profile");

        match normalized {
            "flow" => Ok(Self::Flow),
            "vlan" => Ok(Self::Vlan),
            "security" | "sec" => Ok(Self::Security),
            "onuflow" => Ok(Self::OnuFlow),
            "onutcont" | "tcont" => Ok(Self::OnuTcont),
            "onuvlan" => Ok(Self::OnuVlan),
            "service" | "sp" => Ok(Self::Service),
            "igmp" | "igmpmulticast" | "multicast" => Ok(Self::IgmpMulticast),
            "onuigmp" | "onuigmpmulticast" => Ok(Self::OnuIgmpMulticast),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}
