//! PON Profile Store
//!
//! The device side of profile editing: the profile model and its JSON body
//! codec, the whole-object [`ProfileStore`] contract, and the [`UsageIndex`]
//! that finds who references a profile.
//!
//! # Stores
//!
//! - [`MemoryStore`]: device-like store in memory (tests, dry runs)
//! - [`SnapshotStore`]: JSON/YAML device snapshot file, persisted on mutation
//!
//! # Example
//!
//! ```rust
//! use pon_schema::{FieldId, FieldValue, ProfileKind};
//! use pon_store::{MemoryStore, Profile, ProfileStore, ScanUsageIndex, UsageIndex};
//!
//! let store = MemoryStore::new()
//!     .with_profile(Profile::new(ProfileKind::Flow, "fp-internet"))
//!     .with_profile(
//!         Profile::new(ProfileKind::Service, "sp-internet")
//!             .with_field(FieldId::FlowProfileName, FieldValue::Text("fp-internet".into())),
//!     );
//!
//! let index = ScanUsageIndex::new(&store);
//! assert!(index.is_in_use(ProfileKind::Flow, "fp-internet").unwrap());
//! assert!(store.delete(ProfileKind::Flow, "fp-internet").is_err());
//! ```

#![warn(unreachable_pub)]

mod memory;
mod onu;
mod profile;
mod snapshot;
mod store;
mod usage;

pub use memory::MemoryStore;
pub use onu::OnuRegistration;
pub use profile::{body_name, BodyError, Profile, NAME_KEY};
pub use snapshot::{DeviceSnapshot, SnapshotError, SnapshotFormat, SnapshotStore};
pub use store::{ProfileStore, StoreError};
pub use usage::{Dependent, ScanUsageIndex, UsageIndex, UsageReport};
