//! ONU flow and ONU T-CONT profile fields

#![allow(clippy::enum_glob_use)]

use crate::descriptor::{Bound, FieldDescriptor as D};
use crate::field::FieldId::*;
use crate::value::{FieldLookup, FieldMap};

/// Rates are provisioned in multiples of this many kbps
pub const RATE_STEP_KBPS: i64 = 64;
/// Highest provisionable ONU rate, kbps
pub const MAX_RATE_KBPS: i64 = 2_500_000;

pub(super) const ONU_FLOW: &[D] = &[
    D::vlan_list(MatchUsCVlanIdRange, 2, 4094).help("Upstream customer VLAN ids"),
    D::int(MatchUsCPcp, 0, 7, -1).help("Upstream customer PCP (CoS bits)"),
    D::int(UsCdr, 128, MAX_RATE_KBPS, 0)
        .with_bounds(Bound::Fixed(128), Bound::Field(UsPdr))
        .step(RATE_STEP_KBPS)
        .keep_current()
        .help("Upstream committed rate, kbps; cannot exceed UsPdr"),
    D::int(UsPdr, 128, MAX_RATE_KBPS, 0)
        .with_bounds(Bound::Field(UsCdr), Bound::Fixed(MAX_RATE_KBPS))
        .step(RATE_STEP_KBPS)
        .keep_current()
        .help("Upstream peak rate, kbps; cannot be below UsCdr"),
    D::int_or_default(UsFlowPriority, 0, 7, 0).help("Upstream flow priority"),
    D::int_or_default(DsFlowPriority, 0, 7, 0).help("Downstream flow priority"),
];

/// T-CONT types that carry a fixed rate
const FIXED_TYPES: &[i64] = &[1, 5];
/// T-CONT types that carry an assured rate
const ASSURED_TYPES: &[i64] = &[2, 3, 5];
/// T-CONT types that carry a maximum rate
const MAX_TYPES: &[i64] = &[3, 4, 5];

pub(super) const ONU_TCONT: &[D] = &[
    D::int_or_default(TcontType, 1, 5, 5).help("T-CONT type 1-5; see tcont_type_description"),
    D::int_or_default(TcontId, 1, 6, 1).help("T-CONT id 1-6; stacked T-CONTs need distinct ids"),
    D::int(FixedDataRate, 256, MAX_RATE_KBPS, 0)
        .gated(TcontType, FIXED_TYPES)
        .step(RATE_STEP_KBPS)
        .help("Fixed rate, kbps (types 1 and 5)"),
    D::int(AssuredDataRate, 256, MAX_RATE_KBPS, 0)
        .gated(TcontType, ASSURED_TYPES)
        .step(RATE_STEP_KBPS)
        .help("Assured rate, kbps (types 2, 3 and 5)"),
    D::int(MaxDataRate, 256, MAX_RATE_KBPS, 0)
        .with_bounds(Bound::Sum(&[FixedDataRate, AssuredDataRate]), Bound::Fixed(MAX_RATE_KBPS))
        .gated(TcontType, MAX_TYPES)
        .step(RATE_STEP_KBPS)
        .keep_current()
        .help("Maximum rate, kbps (types 3, 4 and 5); at least FixedDataRate + AssuredDataRate"),
];

/// Operator description of a T-CONT type
#[must_use]
pub fn tcont_type_description(tcont_type: i64) -> &'static str {
    match tcont_type {
        1 => "Type 1: fixed bandwidth only, reserved whether used or not",
        2 => "Type 2: assured bandwidth only, granted on demand",
        3 => "Type 3: assured bandwidth plus non-assured bandwidth up to the maximum rate",
        4 => "Type 4: best effort up to the maximum rate",
        5 => "Type 5: fixed, assured and best-effort bandwidth combined",
        _ => "Unknown T-CONT type",
    }
}

/// Name derived from a T-CONT profile's type and rates, e.g. `T5_F512_A1024_M4096`
#[must_use]
pub fn tcont_auto_name(fields: &FieldMap) -> String {
    format!(
        "T{}_F{}_A{}_M{}",
        fields.int_or_zero(TcontType),
        fields.int_or_zero(FixedDataRate),
        fields.int_or_zero(AssuredDataRate),
        fields.int_or_zero(MaxDataRate),
    )
}
