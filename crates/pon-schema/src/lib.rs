//! PON Profile Schema
//!
//! Data-driven description of every editable field of every OLT profile kind,
//! plus the single generic validator that turns raw operator input into a
//! domain-respecting value.
//!
//! # Core Concepts
//!
//! - [`ProfileKind`]: Closed set of profile kinds stored on the device
//! - [`FieldId`]: Identifier of an editable field (also its device JSON key)
//! - [`FieldDescriptor`]: Value type, domain, sentinel and clamp policy of a field
//! - [`validator::apply`]: Raw input + descriptor + current value → new value and [`Outcome`]
//! - [`normalize`]: Post-edit reset of fields whose gate no longer holds
//!
//! # Example
//!
//! ```rust
//! use pon_schema::{describe, validator, FieldId, FieldValue, Outcome, ProfileKind};
//!
//! let desc = describe(ProfileKind::Flow, FieldId::DsQueuingPriority).unwrap();
//! let applied = validator::apply(desc, "9", &FieldValue::Int(3));
//!
//! assert_eq!(applied.value, FieldValue::Int(0));
//! assert!(matches!(applied.outcome, Outcome::Clamped(_)));
//! ```

#![warn(unreachable_pub)]

mod descriptor;
mod field;
mod kind;
mod normalize;
mod value;

pub mod tables;
pub mod validator;
pub mod vlan_mask;

pub use descriptor::{Bound, ClampPolicy, Domain, FieldDescriptor, Gate, Mode, Sentinel, ValueType};
pub use field::{FieldId, UnknownField};
pub use kind::{ProfileKind, UnknownKind};
pub use normalize::normalize;
pub use tables::{describe, descriptors};
pub use validator::{Applied, ClampReason, Outcome, ValidationError};
pub use value::{FieldLookup, FieldMap, FieldValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
