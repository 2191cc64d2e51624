//! PON Profile Engine
//!
//! Safe edits of named device profiles over a store that only offers
//! get, create and delete. Each edit is a [`Transaction`]:
//!
//! ```text
//! Loaded -> Guarded -> Editing -> Committing -> Done
//!    \________\__________\___________\-------> Aborted
//! ```
//!
//! - **Guarded**: referenced profiles cannot be deleted and must be copied
//!   to a new name before the first edit.
//! - **Editing**: raw input is validated and clamped into the field domain;
//!   only unreadable input is an error.
//! - **Committing**: delete the replaced object, then create the new one.
//!   A create failure after a successful delete is a
//!   [`EngineError::PartialCommitLoss`] and is never retried.
//!
//! # Example
//!
//! ```rust
//! use pon_engine::{Intent, ProfileEngine};
//! use pon_schema::{FieldId, FieldValue, ProfileKind};
//! use pon_store::{MemoryStore, Profile, ProfileStore};
//!
//! let store = MemoryStore::new().with_profile(Profile::new(ProfileKind::Flow, "default"));
//! let engine = ProfileEngine::new(store);
//!
//! let mut txn = engine.begin_transaction(ProfileKind::Flow, "default", Intent::Modify).unwrap();
//! let report = txn.apply_field(FieldId::DsQueuingPriority, "9").unwrap();
//! assert_eq!(report.value, FieldValue::Int(0));
//! txn.commit(None).unwrap();
//!
//! let stored = engine.store().get_by_name(ProfileKind::Flow, "default").unwrap();
//! assert_eq!(stored.fields()[&FieldId::DsQueuingPriority], FieldValue::Int(0));
//! ```

#![warn(unreachable_pub)]

mod config;
mod engine;
mod error;
pub mod state;
mod transaction;

pub use config::{EngineConfig, InputErrorPolicy, LogFormat};
pub use engine::ProfileEngine;
pub use error::{ConfigError, EngineError, TransactionError};
pub use state::TransactionState;
pub use transaction::{CommitReport, FieldReport, Intent, Transaction};
