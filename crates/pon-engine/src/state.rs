//! Transaction state machine
//!
//! `Loaded -> Guarded -> Editing -> Committing -> Done`, with `Aborted`
//! reachable from every non-terminal state.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::error::TransactionError;

/// Lifecycle state of a [`Transaction`](crate::Transaction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionState {
    /// Original object fetched
    Loaded,
    /// Usage checked; the transaction knows whether a copy is required
    Guarded,
    /// At least one edit or a copy name accepted
    Editing,
    /// Delete + create in progress
    Committing,
    /// Committed
    Done,
    /// Abandoned; the store holds what it held before, or a reported loss
    Aborted,
}

impl TransactionState {
    /// Every state
    pub const ALL: [Self; 6] = [
        Self::Loaded,
        Self::Guarded,
        Self::Editing,
        Self::Committing,
        Self::Done,
        Self::Aborted,
    ];

    /// Whether no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Loaded => "loaded",
            Self::Guarded => "guarded",
            Self::Editing => "editing",
            Self::Committing => "committing",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Validate a state transition
///
/// # Errors
///
/// Returns [`TransactionError::IllegalTransition`] if `to` is not reachable
/// from `from` in one step.
pub fn validate_transition(from: TransactionState, to: TransactionState) -> Result<(), TransactionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransactionError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: TransactionState) -> Vec<TransactionState> {
    use TransactionState::*;
    match from {
        Loaded => vec![Guarded, Aborted],
        // A commit without edits is legal (rename, or re-create as is)
        Guarded => vec![Editing, Committing, Aborted],
        Editing => vec![Committing, Aborted],
        Committing => vec![Done, Aborted],
        Done | Aborted => vec![],
    }
}
