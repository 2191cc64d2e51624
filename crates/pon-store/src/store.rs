//! Profile store contract
//!
//! The device offers whole-object operations only: list, fetch by name,
//! delete by name and create from a full body. There is no update and no
//! rename, which is why edits go through delete + create.

use pon_schema::ProfileKind;
use serde_json::Value as JsonValue;

use crate::onu::OnuRegistration;
use crate::profile::{BodyError, Profile};

/// Store operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No object of that kind carries that name
    #[error("{kind} profile '{name}' not found")]
    NotFound {
        /// Profile kind
        kind: ProfileKind,
        /// Requested name
        name: String,
    },

    /// The device refused the operation
    #[error("device rejected {operation} of {kind} profile '{name}': {reason}")]
    RemoteRejected {
        /// `"create"` or `"delete"`
        operation: &'static str,
        /// Profile kind
        kind: ProfileKind,
        /// Target name
        name: String,
        /// Device-supplied reason
        reason: String,
    },

    /// A body could not be decoded
    #[error("malformed profile body: {0}")]
    Malformed(#[from] BodyError),

    /// The store could not be reached or persisted
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Underlying failure
        reason: String,
    },
}

impl StoreError {
    /// Whether this is a [`StoreError::NotFound`]
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(kind: ProfileKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn rejected(operation: &'static str, kind: ProfileKind, name: &str, reason: impl Into<String>) -> Self {
        Self::RemoteRejected {
            operation,
            kind,
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Whole-object access to the device's profiles and ONU registry.
///
/// Every call blocks until the device answers. Implementations must keep at
/// most one object per `(kind, name)`.
pub trait ProfileStore {
    /// All profiles of `kind`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the device cannot be queried.
    fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, StoreError>;

    /// Profile of `kind` named `name`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if absent.
    fn get_by_name(&self, kind: ProfileKind, name: &str) -> Result<Profile, StoreError>;

    /// Delete the profile of `kind` named `name`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if absent, or
    /// [`StoreError::RemoteRejected`] if the device refuses.
    fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), StoreError>;

    /// Create a profile of `kind` from a full device body
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RemoteRejected`] if the device refuses, for
    /// example because the name is taken.
    fn create(&self, kind: ProfileKind, body: &JsonValue) -> Result<(), StoreError>;

    /// Registered ONUs and the service profiles they use
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the device cannot be queried.
    fn onu_registry(&self) -> Result<Vec<OnuRegistration>, StoreError>;

    /// Whether a profile of `kind` named `name` exists
    ///
    /// # Errors
    ///
    /// Propagates any failure other than [`StoreError::NotFound`].
    fn exists(&self, kind: ProfileKind, name: &str) -> Result<bool, StoreError> {
        match self.get_by_name(kind, name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<S: ProfileStore + ?Sized> ProfileStore for &S {
    fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, StoreError> {
        (**self).list(kind)
    }

    fn get_by_name(&self, kind: ProfileKind, name: &str) -> Result<Profile, StoreError> {
        (**self).get_by_name(kind, name)
    }

    fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), StoreError> {
        (**self).delete(kind, name)
    }

    fn create(&self, kind: ProfileKind, body: &JsonValue) -> Result<(), StoreError> {
        (**self).create(kind, body)
    }

    fn onu_registry(&self) -> Result<Vec<OnuRegistration>, StoreError> {
        (**self).onu_registry()
    }
}
