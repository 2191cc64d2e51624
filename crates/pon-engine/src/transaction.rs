//! Profile transaction
//!
//! A [`Transaction`] owns one edit of one profile. It keeps the object as
//! loaded and a working copy, routes every raw input through the field
//! validator, and commits with the only primitives the device has: delete
//! the old object, then create the new one.
//!
//! A profile other objects reference is never edited in place. Before the
//! first edit it must be given a new name; the commit then creates the copy
//! and leaves the original alone. An unreferenced profile is edited
//! directly, and giving it a new name retires the old one.

use std::fmt::{self, Display, Formatter};
use std::mem;

use pon_schema::tables::{tcont_auto_name, NAME_MAX_LEN};
use pon_schema::validator::{apply_with, is_text_char};
use pon_schema::{describe, normalize, FieldId, FieldValue, Outcome, ProfileKind, ValidationError};
use pon_store::{Dependent, Profile, ProfileStore};
use serde_json::Value as JsonValue;
use tracing::{debug, error, info, warn};

use crate::config::{EngineConfig, InputErrorPolicy};
use crate::error::{EngineError, TransactionError};
use crate::state::{validate_transition, TransactionState};

/// What the caller means to do with the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Edit fields and commit
    Modify,
    /// Remove the profile
    Delete,
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Modify => "modify",
            Self::Delete => "delete",
        })
    }
}

/// Result of one field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// Edited field
    pub field: FieldId,
    /// Value before the edit
    pub previous: FieldValue,
    /// Value after the edit
    pub value: FieldValue,
    /// How the input was taken
    pub outcome: Outcome,
    /// Other fields reset to their sentinel because of this edit
    pub reset: Vec<FieldId>,
}

impl Display for FieldReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {} ({})", self.field, self.previous, self.value, self.outcome)?;
        if !self.reset.is_empty() {
            let reset: Vec<&str> = self.reset.iter().map(|id| id.as_str()).collect();
            write!(f, ", reset {}", reset.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Profile kind
    pub kind: ProfileKind,
    /// Name the profile was created under
    pub name: String,
    /// Name deleted before the create, if the delete found an object
    pub deleted: Option<String>,
    /// Every field edit of the transaction, in order
    pub edits: Vec<FieldReport>,
}

/// One edit or delete of one profile
pub struct Transaction<'e> {
    store: &'e dyn ProfileStore,
    config: &'e EngineConfig,
    intent: Intent,
    state: TransactionState,
    original: Profile,
    working: Profile,
    dependents: Vec<Dependent>,
    edits: Vec<FieldReport>,
}

impl<'e> Transaction<'e> {
    pub(crate) fn load(store: &'e dyn ProfileStore, config: &'e EngineConfig, intent: Intent, original: Profile) -> Self {
        debug!(kind = %original.kind(), profile = original.name(), %intent, "transaction loaded");
        Self {
            store,
            config,
            intent,
            state: TransactionState::Loaded,
            working: original.clone(),
            original,
            dependents: Vec::new(),
            edits: Vec::new(),
        }
    }

    /// Record the usage check; a delete of a referenced profile ends here
    pub(crate) fn guard(&mut self, dependents: Vec<Dependent>) -> Result<(), EngineError> {
        self.transition(TransactionState::Guarded)?;
        self.dependents = dependents;

        if self.intent == Intent::Delete && self.is_in_use() {
            let err = EngineError::InUseBlocked {
                kind: self.kind(),
                name: self.original.name().to_string(),
                dependents: self.dependents.clone(),
            };
            return Err(self.fail(err));
        }
        if self.is_in_use() {
            info!(
                kind = %self.kind(),
                profile = self.original.name(),
                dependents = self.dependents.len(),
                "profile in use; edits require a new name"
            );
        }
        Ok(())
    }

    /// Profile kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ProfileKind {
        self.original.kind()
    }

    /// Transaction intent
    #[inline]
    #[must_use]
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Profile as loaded
    #[inline]
    #[must_use]
    pub fn original(&self) -> &Profile {
        &self.original
    }

    /// Working profile, as it would be committed now
    #[inline]
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.working
    }

    /// Objects referencing the loaded profile, as of the usage check
    #[inline]
    #[must_use]
    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    /// Whether anything referenced the loaded profile
    #[inline]
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// Whether the working profile carries a name other than the original
    #[inline]
    #[must_use]
    pub fn is_renamed(&self) -> bool {
        self.working.name() != self.original.name()
    }

    /// Whether a new name must be assigned before editing
    #[inline]
    #[must_use]
    pub fn needs_copy(&self) -> bool {
        self.is_in_use() && !self.is_renamed()
    }

    /// Field edits so far
    #[inline]
    #[must_use]
    pub fn edits(&self) -> &[FieldReport] {
        &self.edits
    }

    /// Device body the commit would create
    #[must_use]
    pub fn preview(&self) -> JsonValue {
        self.working.to_body()
    }

    /// Give the working profile a new name
    ///
    /// For a referenced profile this makes the commit create a copy and
    /// leave the original untouched. For an unreferenced one the commit
    /// renames it. On T-CONT profiles the configured auto-name token is
    /// replaced by a name derived from the rates.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidName`] if the device would refuse the name
    /// - [`TransactionError::SameName`] if the name is the original one and
    ///   the profile is in use (or distinct names are required)
    /// - [`EngineError::NameConflict`] if another profile has the name
    ///
    /// None of these end the transaction.
    pub fn assign_name(&mut self, name: &str) -> Result<&str, EngineError> {
        self.ensure_intent(Intent::Modify)?;
        let name = self.resolve_name(name);
        validate_name(&name)?;

        if name == self.original.name() {
            if self.is_in_use() || self.config.require_distinct_copy_name {
                return Err(TransactionError::SameName { name }.into());
            }
        } else if self.store.exists(self.kind(), &name).map_err(EngineError::RemoteRejected)? {
            return Err(EngineError::NameConflict { kind: self.kind(), name });
        }

        if self.state == TransactionState::Guarded {
            self.transition(TransactionState::Editing)?;
        }
        info!(
            kind = %self.kind(),
            profile = self.original.name(),
            new_name = %name,
            copy = self.is_in_use(),
            "name assigned"
        );
        self.working = self.working.renamed(name);
        Ok(self.working.name())
    }

    /// Apply one raw input to a field given by name
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::UnknownField`] if the kind has no such
    /// editable field, otherwise as [`Transaction::apply_field`].
    pub fn apply_field_named(&mut self, field: &str, raw: &str) -> Result<FieldReport, EngineError> {
        let id: FieldId = field.parse().map_err(|_| TransactionError::UnknownField {
            kind: self.kind(),
            field: field.to_string(),
        })?;
        self.apply_field(id, raw)
    }

    /// Apply one raw input to a field
    ///
    /// Out-of-domain input is clamped, never refused. Input that cannot be
    /// read at all is an [`EngineError::InputError`]; under
    /// [`InputErrorPolicy::AbortTransaction`] it also aborts the transaction.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::CopyRequired`] before a referenced profile got a new name
    /// - [`TransactionError::UnknownField`] for fields the kind does not edit
    /// - [`EngineError::InputError`] for unreadable input or a dangling reference
    pub fn apply_field(&mut self, field: FieldId, raw: &str) -> Result<FieldReport, EngineError> {
        self.ensure_intent(Intent::Modify)?;
        if self.needs_copy() {
            return Err(TransactionError::CopyRequired {
                kind: self.kind(),
                name: self.original.name().to_string(),
            }
            .into());
        }
        let desc = describe(self.kind(), field).ok_or_else(|| TransactionError::UnknownField {
            kind: self.kind(),
            field: field.to_string(),
        })?;

        let previous = self.working.value_of(desc);
        let mut applied = apply_with(desc, raw, &previous, self.working.fields());

        if let Some(target) = desc.reference {
            let dangling = match &applied.value {
                FieldValue::Text(name) if !name.is_empty() && applied.value != previous => {
                    let exists = self.store.exists(target, name).map_err(EngineError::RemoteRejected)?;
                    (!exists).then(|| name.clone())
                }
                _ => None,
            };
            if let Some(name) = dangling {
                applied.outcome = Outcome::InputError(ValidationError::DanglingReference { kind: target, name });
                applied.value = previous.clone();
            }
        }

        if let Outcome::InputError(source) = &applied.outcome {
            let source = source.clone();
            match self.config.input_error_policy {
                InputErrorPolicy::AbortTransaction => {
                    return Err(self.fail(EngineError::InputError { field, source }));
                }
                InputErrorPolicy::RejectField => {
                    warn!(kind = %self.kind(), %field, input = raw, error = %source, "input rejected");
                }
            }
        }

        if self.state == TransactionState::Guarded {
            self.transition(TransactionState::Editing)?;
        }
        // An absent field reads as its sentinel; an accepted edit must still land in the body.
        match &applied.outcome {
            Outcome::Accepted | Outcome::Clamped(_) | Outcome::PartiallyAccepted { .. } => {
                self.working.fields_mut().insert(field, applied.value.clone());
            }
            Outcome::Unchanged | Outcome::InputError(_) => {}
        }
        let reset = normalize(self.kind(), self.working.fields_mut());

        match &applied.outcome {
            Outcome::Clamped(reason) => {
                warn!(kind = %self.kind(), %field, input = raw, value = %applied.value, %reason, "input clamped");
            }
            outcome => debug!(kind = %self.kind(), %field, value = %applied.value, %outcome, "field applied"),
        }
        for id in &reset {
            info!(kind = %self.kind(), field = %id, "dependent field reset");
        }

        let report = FieldReport {
            field,
            previous,
            value: applied.value,
            outcome: applied.outcome,
            reset,
        };
        self.edits.push(report.clone());
        Ok(report)
    }

    /// Commit the working profile
    ///
    /// `final_name`, if given and different from the working name, is
    /// assigned first as by [`Transaction::assign_name`]. The commit then
    /// deletes the object being replaced and creates the working profile.
    /// A delete that finds nothing is tolerated; any other delete failure
    /// aborts before the create.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::CopyRequired`] if a referenced profile still has its original name
    /// - [`EngineError::NameConflict`] if the target name was taken meanwhile
    /// - [`EngineError::RemoteRejected`] if the delete or create is refused
    /// - [`EngineError::PartialCommitLoss`] if the create fails after a delete
    pub fn commit(&mut self, final_name: Option<&str>) -> Result<CommitReport, EngineError> {
        self.ensure_intent(Intent::Modify)?;
        if let Some(name) = final_name {
            let name = self.resolve_name(name);
            if name != self.working.name() {
                self.assign_name(&name)?;
            }
        }
        if self.needs_copy() {
            return Err(TransactionError::CopyRequired {
                kind: self.kind(),
                name: self.original.name().to_string(),
            }
            .into());
        }

        let kind = self.kind();
        let name = self.working.name().to_string();
        self.transition(TransactionState::Committing)?;

        if self.is_renamed() {
            match self.store.exists(kind, &name) {
                Ok(false) => {}
                Ok(true) => return Err(self.fail(EngineError::NameConflict { kind, name })),
                Err(e) => return Err(self.fail(EngineError::RemoteRejected(e))),
            }
        }

        // A copy replaces nothing under the original name
        let target = if self.is_in_use() {
            name.clone()
        } else {
            self.original.name().to_string()
        };
        let deleted = match self.store.delete(kind, &target) {
            Ok(()) => Some(target),
            Err(e) if e.is_not_found() => {
                if self.is_in_use() {
                    debug!(%kind, profile = %target, "copy target free");
                } else {
                    warn!(%kind, profile = %target, "profile vanished before commit");
                }
                None
            }
            Err(e) => return Err(self.fail(EngineError::RemoteRejected(e))),
        };

        let body = self.working.to_body();
        if let Err(source) = self.store.create(kind, &body) {
            let err = match deleted {
                Some(deleted) => {
                    error!(%kind, deleted = %deleted, profile = %name, error = %source, "profile deleted but not re-created");
                    EngineError::PartialCommitLoss {
                        kind,
                        deleted,
                        name,
                        source,
                        body,
                    }
                }
                None => EngineError::RemoteRejected(source),
            };
            return Err(self.fail(err));
        }

        self.transition(TransactionState::Done)?;
        info!(%kind, profile = %name, replaced = deleted.as_deref().unwrap_or("-"), edits = self.edits.len(), "profile committed");
        Ok(CommitReport {
            kind,
            name,
            deleted,
            edits: mem::take(&mut self.edits),
        })
    }

    /// Delete the profile
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the profile vanished since it was
    /// loaded, or [`EngineError::RemoteRejected`] if the store refused.
    pub fn remove(&mut self) -> Result<(), EngineError> {
        self.ensure_intent(Intent::Delete)?;
        let kind = self.kind();
        let name = self.original.name().to_string();
        self.transition(TransactionState::Committing)?;

        if let Err(e) = self.store.delete(kind, &name) {
            let err = EngineError::from_lookup(kind, &name, e);
            return Err(self.fail(err));
        }
        self.transition(TransactionState::Done)?;
        info!(%kind, profile = %name, "profile deleted");
        Ok(())
    }

    /// Abandon the transaction; nothing is written
    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            info!(kind = %self.kind(), profile = self.original.name(), state = %self.state, "transaction abandoned");
            self.state = TransactionState::Aborted;
        }
    }

    fn transition(&mut self, to: TransactionState) -> Result<(), TransactionError> {
        validate_transition(self.state, to)?;
        debug!(from = %self.state, %to, "transition");
        self.state = to;
        Ok(())
    }

    fn fail(&mut self, err: EngineError) -> EngineError {
        warn!(kind = %self.kind(), profile = self.original.name(), state = %self.state, error = %err, "transaction aborted");
        self.state = TransactionState::Aborted;
        err
    }

    fn ensure_intent(&self, intent: Intent) -> Result<(), TransactionError> {
        if self.state.is_terminal() {
            return Err(TransactionError::Retired { state: self.state });
        }
        if self.intent != intent {
            return Err(TransactionError::WrongIntent { intent: self.intent });
        }
        Ok(())
    }

    fn resolve_name(&self, name: &str) -> String {
        let name = name.trim();
        if self.kind() == ProfileKind::OnuTcont && name == self.config.tcont_auto_name_token {
            tcont_auto_name(self.working.fields())
        } else {
            name.to_string()
        }
    }
}

fn validate_name(name: &str) -> Result<(), TransactionError> {
    let invalid = |reason: String| TransactionError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty name".to_string()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(invalid(format!("longer than {NAME_MAX_LEN} characters")));
    }
    if let Some(ch) = name.chars().find(|c| !is_text_char(*c)) {
        return Err(invalid(format!("character '{ch}' not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_device_rules() {
        assert!(validate_name("fp-internet_1").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("has space").is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN + 1)).is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn report_display_lists_resets() {
        let report = FieldReport {
            field: FieldId::TcontType,
            previous: FieldValue::Int(5),
            value: FieldValue::Int(1),
            outcome: Outcome::Accepted,
            reset: vec![FieldId::AssuredDataRate, FieldId::MaxDataRate],
        };
        let text = report.to_string();
        assert!(text.starts_with("TcontType: 5 -> 1"), "{text}");
        assert!(text.ends_with("reset AssuredDataRate, MaxDataRate"), "{text}");
    }
}
