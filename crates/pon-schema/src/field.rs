//! Field identifiers
//!
//! One identifier per editable field across all profile kinds. The variant
//! name doubles as the key the device uses in its JSON object bodies.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! field_ids {
    ($($variant:ident),+ $(,)?) => {
        /// Identifier of an editable profile field.
        ///
        /// Variant names are the device's JSON keys verbatim.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum FieldId {
            $($variant,)+
        }

        impl FieldId {
            /// Every field identifier
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant,)+];

            /// Device JSON key of this field
            #[inline]
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(FieldId::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

field_ids! {
    // Flow: upstream/downstream VLAN-profile matching
    MatchUsVlanProfile,
    MatchDsVlanProfile,

    // Flow: upstream match criteria
    MatchUsAny,
    MatchUsMacDestAddr,
    MatchUsMacDestMask,
    MatchUsMacSrcAddr,
    MatchUsMacSrcMask,
    MatchUsCPcp,
    MatchUsSPcp,
    MatchUsCVlanIdRange,
    MatchUsSVlanIdRange,
    MatchUsEthertype,
    MatchUsIpProtocol,
    MatchUsIpSrcAddr,
    MatchUsIpSrcMask,
    MatchUsIpDestAddr,
    MatchUsIpDestMask,
    MatchUsIpDscp,
    MatchUsIpCsc,
    MatchUsIpDropPrecedence,
    MatchUsTcpSrcPort,
    MatchUsTcpDestPort,
    MatchUsUdpSrcPort,
    MatchUsUdpDestPort,
    MatchUsIpv6SrcAddr,
    MatchUsIpv6SrcAddrMaskLen,
    MatchUsIpv6DstAddr,
    MatchUsIpv6DstAddrMaskLen,

    // Flow: downstream match criteria
    MatchDsAny,
    MatchDsMacDestAddr,
    MatchDsMacDestMask,
    MatchDsMacSrcAddr,
    MatchDsMacSrcMask,
    MatchDsCPcp,
    MatchDsSPcp,
    MatchDsCVlanIdRange,
    MatchDsSVlanIdRange,
    MatchDsEthertype,
    MatchDsIpProtocol,
    MatchDsIpSrcAddr,
    MatchDsIpSrcMask,
    MatchDsIpDestAddr,
    MatchDsIpDestMask,
    MatchDsIpDscp,
    MatchDsIpCsc,
    MatchDsIpDropPrecedence,
    MatchDsTcpSrcPort,
    MatchDsTcpDestPort,
    MatchDsUdpSrcPort,
    MatchDsUdpDestPort,
    MatchDsIpv6SrcAddr,
    MatchDsIpv6SrcAddrMaskLen,
    MatchDsIpv6DstAddr,
    MatchDsIpv6DstAddrMaskLen,

    // Flow / ONU flow: rate shaping and marking
    UsCdr,
    UsCdrBurstSize,
    UsPdr,
    UsPdrBurstSize,
    UsMarkPcp,
    UsMarkPcpValue,
    UsMarkDscp,
    UsMarkDscpValue,
    DsCdr,
    DsCdrBurstSize,
    DsPdr,
    DsPdrBurstSize,
    DsMarkPcp,
    DsMarkPcpValue,
    DsMarkDscp,
    DsMarkDscpValue,
    DsQueuingPriority,
    DsSchedulingMode,
    UsFlowPriority,
    DsFlowPriority,

    // VLAN
    CVid,
    CVidNative,
    SVid,
    SEtherType,

    // Security
    PortProtect,
    MacSourceGuard,
    MacLimit,
    PortSecurity,
    ArpInspection,
    Ipv4SourceGuard,
    Ipv6SourceGuard,
    IpSgFilterMode,
    IpSgBindingLimit,
    IpSgBindingLimitDhcpv6,
    IpSgBindingLimitNd,
    StormControlBroadcast,
    StormControlUnicast,
    StormControlMulticast,
    AppRateLimitDhcp,
    AppRateLimitIgmp,
    AppRateLimitPppoe,
    AppRateLimitStp,
    AppRateLimitMn,

    // ONU T-CONT
    TcontType,
    TcontId,
    FixedDataRate,
    AssuredDataRate,
    MaxDataRate,

    // Service
    FlowProfileName,
    VlanProfileName,
    OnuFlowProfileName,
    OnuTcontProfileName,
    OnuVlanProfileName,
    SecurityProfileName,
    IgmpProfileName,
    OnuIgmpProfileName,
    OnuVirtGemPortId,
    OnuTpType,
    DhcpRelayAgent,
    PppoeIntermediateAgent,
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised field name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FieldId {
    type Err = UnknownField;

    /// Case-insensitive match on the device key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
