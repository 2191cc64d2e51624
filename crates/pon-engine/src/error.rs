//! Error types for the profile engine
//!
//! [`EngineError`] is the taxonomy every transaction step reports:
//! - `NotFound`: the requested profile is absent
//! - `InUseBlocked`: a destructive operation on a referenced profile
//! - `InputError`: raw field input that cannot be read
//! - `RemoteRejected`: the store refused or failed an operation
//! - `PartialCommitLoss`: delete succeeded, create failed
//!
//! [`TransactionError`] covers protocol misuse by the caller.

use pon_schema::{FieldId, ProfileKind, ValidationError};
use pon_store::{Dependent, StoreError};

use crate::state::TransactionState;
use crate::transaction::Intent;

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Requested profile does not exist
    #[error("{kind} profile '{name}' not found")]
    NotFound {
        /// Profile kind
        kind: ProfileKind,
        /// Requested name
        name: String,
    },

    /// Destructive operation on a referenced profile
    #[error("{kind} profile '{name}' is in use by {} object(s)", .dependents.len())]
    InUseBlocked {
        /// Profile kind
        kind: ProfileKind,
        /// Profile name
        name: String,
        /// Objects referencing the profile
        dependents: Vec<Dependent>,
    },

    /// Raw input that cannot be read as the field's type
    #[error("invalid input for {field}: {source}")]
    InputError {
        /// Field being edited
        field: FieldId,
        /// Parse failure
        source: ValidationError,
    },

    /// Committing would replace an unrelated profile
    #[error("{kind} profile '{name}' already exists")]
    NameConflict {
        /// Profile kind
        kind: ProfileKind,
        /// Taken name
        name: String,
    },

    /// The store refused or failed an operation
    #[error("store rejected the operation: {0}")]
    RemoteRejected(StoreError),

    /// The old object was deleted but the new one was not created
    #[error("{kind} profile '{deleted}' was deleted but '{name}' could not be created: {source}")]
    PartialCommitLoss {
        /// Profile kind
        kind: ProfileKind,
        /// Name that was deleted
        deleted: String,
        /// Name that failed to create
        name: String,
        /// Create failure
        source: StoreError,
        /// Device body that was not stored, for manual restore
        body: serde_json::Value,
    },

    /// Caller misused the transaction protocol
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl EngineError {
    /// Objects blocking the operation, if this is [`EngineError::InUseBlocked`]
    #[must_use]
    pub fn dependents(&self) -> &[Dependent] {
        match self {
            Self::InUseBlocked { dependents, .. } => dependents,
            _ => &[],
        }
    }

    /// Check if the device may be left without the edited object
    #[inline]
    #[must_use]
    pub fn requires_operator(&self) -> bool {
        matches!(self, Self::PartialCommitLoss { .. })
    }

    /// Check if the caller can retry with different input
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::InUseBlocked { .. } | Self::InputError { .. } | Self::NameConflict { .. }
        ) || matches!(
            self,
            Self::Transaction(
                TransactionError::CopyRequired { .. }
                    | TransactionError::InvalidName { .. }
                    | TransactionError::SameName { .. }
                    | TransactionError::UnknownField { .. }
            )
        )
    }

    pub(crate) fn from_lookup(kind: ProfileKind, name: &str, err: StoreError) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                kind,
                name: name.to_string(),
            }
        } else {
            Self::RemoteRejected(err)
        }
    }
}

/// Transaction protocol misuse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// Profile is in use; a copy name must be assigned before editing
    #[error("{kind} profile '{name}' is in use; copy it to a new name before editing")]
    CopyRequired {
        /// Profile kind
        kind: ProfileKind,
        /// Original name
        name: String,
    },

    /// Copy name equal to the original name
    #[error("copy of '{name}' needs a different name")]
    SameName {
        /// Original name
        name: String,
    },

    /// Name the device would not accept
    #[error("invalid profile name '{name}': {reason}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Why
        reason: String,
    },

    /// Field not editable on this kind
    #[error("{kind} profiles have no editable field '{field}'")]
    UnknownField {
        /// Profile kind
        kind: ProfileKind,
        /// Requested field
        field: String,
    },

    /// Operation does not match the transaction's intent
    #[error("operation not allowed on a {intent} transaction")]
    WrongIntent {
        /// Transaction intent
        intent: Intent,
    },

    /// Transaction already finished
    #[error("transaction is {state}; no further operations allowed")]
    Retired {
        /// Terminal state
        state: TransactionState,
    },

    /// State machine violation
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        /// Current state
        from: TransactionState,
        /// Requested state
        to: TransactionState,
    },
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File path
        path: std::path::PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
