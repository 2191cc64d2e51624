//! Flow profile fields

#![allow(clippy::enum_glob_use)]

use crate::descriptor::{FieldDescriptor as D, Mode};
use crate::field::FieldId::*;

const MAC: usize = 17;
const IPV4: usize = 15;
const IPV6: usize = 39;

const MARK_PCP: &[Mode] = &[Mode::new(1, "none"), Mode::new(2, "copy-from-csc"), Mode::new(3, "user-value")];
const MARK_DSCP: &[Mode] = &[Mode::new(1, "none"), Mode::new(2, "copy-from-pcp"), Mode::new(3, "user-value")];
const SCHEDULING: &[Mode] = &[Mode::new(1, "strict-priority"), Mode::new(2, "weighted-round-robin")];

pub(super) const FLOW: &[D] = &[
    D::toggle(MatchUsVlanProfile).help("Match upstream frames against the service VLAN profile"),
    D::toggle(MatchDsVlanProfile).help("Match downstream frames against the service VLAN profile"),
    // Upstream match
    D::toggle(MatchUsAny).help("Match every upstream frame"),
    D::text(MatchUsMacDestAddr, MAC).help("Upstream destination MAC address"),
    D::text(MatchUsMacDestMask, MAC).help("Mask applied to MatchUsMacDestAddr"),
    D::text(MatchUsMacSrcAddr, MAC).help("Upstream source MAC address"),
    D::text(MatchUsMacSrcMask, MAC).help("Mask applied to MatchUsMacSrcAddr"),
    D::int(MatchUsCPcp, 0, 7, -1).help("Upstream customer PCP (CoS bits)"),
    D::int(MatchUsSPcp, 0, 7, -1).help("Upstream service PCP (CoS bits)"),
    D::vlan_list(MatchUsCVlanIdRange, 2, 4094).help("Upstream customer VLAN ids"),
    D::vlan_list(MatchUsSVlanIdRange, 2, 4094).help("Upstream service VLAN ids"),
    D::int(MatchUsEthertype, 0, 65535, -1).help("Upstream EtherType"),
    D::int(MatchUsIpProtocol, 0, 255, -1).help("Upstream IP protocol (icmp 1, igmp 2, tcp 6, udp 17)"),
    D::text(MatchUsIpSrcAddr, IPV4).help("Upstream source IP address"),
    D::text(MatchUsIpSrcMask, IPV4).help("Mask applied to MatchUsIpSrcAddr"),
    D::text(MatchUsIpDestAddr, IPV4).help("Upstream destination IP address"),
    D::text(MatchUsIpDestMask, IPV4).help("Mask applied to MatchUsIpDestAddr"),
    D::int(MatchUsIpDscp, 0, 63, -1).help("Upstream IP DSCP"),
    D::int(MatchUsIpCsc, 0, 7, -1).help("Upstream class selector (IP precedence)"),
    D::int(MatchUsIpDropPrecedence, 0, 3, -1).help("Upstream drop precedence"),
    D::int(MatchUsTcpSrcPort, 0, 65535, -1).help("Upstream TCP source port"),
    D::int(MatchUsTcpDestPort, 0, 65535, -1).help("Upstream TCP destination port"),
    D::int(MatchUsUdpSrcPort, 0, 65535, -1).help("Upstream UDP source port"),
    D::int(MatchUsUdpDestPort, 0, 65535, -1).help("Upstream UDP destination port"),
    D::text(MatchUsIpv6SrcAddr, IPV6).help("Upstream source IPv6 address"),
    D::int(MatchUsIpv6SrcAddrMaskLen, 1, 128, 0).help("Prefix length for MatchUsIpv6SrcAddr"),
    D::text(MatchUsIpv6DstAddr, IPV6).help("Upstream destination IPv6 address"),
    D::int(MatchUsIpv6DstAddrMaskLen, 1, 128, 0).help("Prefix length for MatchUsIpv6DstAddr"),
    // Downstream match
    D::toggle(MatchDsAny).help("Match every downstream frame"),
    D::text(MatchDsMacDestAddr, MAC).help("Downstream destination MAC address"),
    D::text(MatchDsMacDestMask, MAC).help("Mask applied to MatchDsMacDestAddr"),
    D::text(MatchDsMacSrcAddr, MAC).help("Downstream source MAC address"),
    D::text(MatchDsMacSrcMask, MAC).help("Mask applied to MatchDsMacSrcAddr"),
    D::int(MatchDsCPcp, 0, 7, -1).help("Downstream customer PCP (CoS bits)"),
    D::int(MatchDsSPcp, 0, 7, -1).help("Downstream service PCP (CoS bits)"),
    D::vlan_list(MatchDsCVlanIdRange, 2, 4094).help("Downstream customer VLAN ids"),
    D::vlan_list(MatchDsSVlanIdRange, 2, 4094).help("Downstream service VLAN ids"),
    D::int(MatchDsEthertype, 0, 65535, -1).help("Downstream EtherType"),
    D::int(MatchDsIpProtocol, 0, 255, -1).help("Downstream IP protocol (icmp 1, igmp 2, tcp 6, udp 17)"),
    D::text(MatchDsIpSrcAddr, IPV4).help("Downstream source IP address"),
    D::text(MatchDsIpSrcMask, IPV4).help("Mask applied to MatchDsIpSrcAddr"),
    D::text(MatchDsIpDestAddr, IPV4).help("Downstream destination IP address"),
    D::text(MatchDsIpDestMask, IPV4).help("Mask applied to MatchDsIpDestAddr"),
    D::int(MatchDsIpDscp, 0, 63, -1).help("Downstream IP DSCP"),
    D::int(MatchDsIpCsc, 0, 7, -1).help("Downstream class selector (IP precedence)"),
    D::int(MatchDsIpDropPrecedence, 0, 3, -1).help("Downstream drop precedence"),
    D::int(MatchDsTcpSrcPort, 0, 65535, -1).help("Downstream TCP source port"),
    D::int(MatchDsTcpDestPort, 0, 65535, -1).help("Downstream TCP destination port"),
    D::int(MatchDsUdpSrcPort, 0, 65535, -1).help("Downstream UDP source port"),
    D::int(MatchDsUdpDestPort, 0, 65535, -1).help("Downstream UDP destination port"),
    D::text(MatchDsIpv6SrcAddr, IPV6).help("Downstream source IPv6 address"),
    D::int(MatchDsIpv6SrcAddrMaskLen, 1, 128, 0).help("Prefix length for MatchDsIpv6SrcAddr"),
    D::text(MatchDsIpv6DstAddr, IPV6).help("Downstream destination IPv6 address"),
    D::int(MatchDsIpv6DstAddrMaskLen, 1, 128, 0).help("Prefix length for MatchDsIpv6DstAddr"),
    // Upstream handling
    D::int(UsCdr, 1, 1_000_000, 0).help("Upstream committed rate, kbps"),
    D::int(UsCdrBurstSize, 1, 16384, 0).help("Upstream committed burst, kB (0 derives from rate)"),
    D::int(UsPdr, 1, 1_000_000, 0).help("Upstream peak rate, kbps"),
    D::int(UsPdrBurstSize, 1, 16384, 0).help("Upstream peak burst, kB (0 derives from rate)"),
    D::mode(UsMarkPcp, MARK_PCP, 1).help("Upstream PCP marking; user-value uses UsMarkPcpValue"),
    D::int(UsMarkPcpValue, 0, 7, -1).help("Upstream PCP mark value"),
    D::mode(UsMarkDscp, MARK_DSCP, 1).help("Upstream DSCP marking; user-value uses UsMarkDscpValue"),
    D::int(UsMarkDscpValue, 0, 63, -1).help("Upstream DSCP mark value"),
    // Downstream handling
    D::int(DsCdr, 1, 1_000_000, 0).help("Downstream committed rate, kbps"),
    D::int(DsCdrBurstSize, 1, 16384, 0).help("Downstream committed burst, kB (0 derives from rate)"),
    D::int(DsPdr, 1, 1_000_000, 0).help("Downstream peak rate, kbps"),
    D::int(DsPdrBurstSize, 1, 16384, 0).help("Downstream peak burst, kB (0 derives from rate)"),
    D::mode(DsMarkPcp, MARK_PCP, 1).help("Downstream PCP marking; user-value uses DsMarkPcpValue"),
    D::int(DsMarkPcpValue, 0, 7, -1).help("Downstream PCP mark value"),
    D::mode(DsMarkDscp, MARK_DSCP, 1).help("Downstream DSCP marking; user-value uses DsMarkDscpValue"),
    D::int(DsMarkDscpValue, 0, 63, -1).help("Downstream DSCP mark value"),
    // Queuing
    D::int_or_default(DsQueuingPriority, 0, 7, 0).help("Downstream queuing priority"),
    D::mode(DsSchedulingMode, SCHEDULING, 1).keep_current().help("Downstream scheduling mode"),
];
