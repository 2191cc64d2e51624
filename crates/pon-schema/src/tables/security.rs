//! Security profile fields

#![allow(clippy::enum_glob_use)]

use crate::descriptor::FieldDescriptor as D;
use crate::field::FieldId::*;

pub(super) const SECURITY: &[D] = &[
    D::toggle(PortProtect).help("Block forwarding between protected ports"),
    D::toggle(MacSourceGuard).help("Block ports on duplicate MAC (loop prevention)"),
    D::int(MacLimit, 1, 64, 0).help("Maximum learned MAC addresses"),
    D::toggle(PortSecurity).help("Limit connected devices to MacLimit"),
    D::toggle(ArpInspection).help("Dynamic ARP inspection against DHCP snooping"),
    D::toggle(Ipv4SourceGuard).help("Filter IPv4 traffic against DHCP bindings"),
    D::toggle(Ipv6SourceGuard).help("Filter IPv6 traffic against DHCP bindings"),
    D::toggle(IpSgFilterMode).help("Source guard on IP only (false) or IP and MAC (true)"),
    D::int(IpSgBindingLimit, 1, 15, 0).help("IPv4 source-guard binding limit (0 = none)"),
    D::int(IpSgBindingLimitDhcpv6, 1, 15, 0).help("IPv6 DHCP source-guard binding limit (0 = none)"),
    D::int(IpSgBindingLimitNd, 1, 15, 0).help("IPv6 ND source-guard binding limit (0 = none)"),
    D::int(StormControlBroadcast, 0, 65535, -1).help("Broadcast storm limit, pps"),
    D::int(StormControlUnicast, 0, 65535, -1).help("Unknown-unicast storm limit, pps"),
    D::int(StormControlMulticast, 0, 65535, -1).help("Multicast storm limit, pps"),
    D::int(AppRateLimitDhcp, 0, 1000, -1).help("DHCP rate limit, pps"),
    D::int(AppRateLimitIgmp, 0, 1000, -1).help("IGMP rate limit, pps"),
    D::int(AppRateLimitPppoe, 0, 1000, -1).help("PPPoE rate limit, pps"),
    D::int(AppRateLimitStp, 0, 1000, -1).help("STP rate limit, pps"),
    D::int(AppRateLimitMn, 0, 1000, -1).help("Management network rate limit, pps"),
];
