//! Engine facade
//!
//! [`ProfileEngine`] binds a [`ProfileStore`] to an [`EngineConfig`] and
//! opens [`Transaction`]s. It holds no state between transactions; every
//! usage check scans the store afresh.

use pon_schema::ProfileKind;
use pon_store::{Profile, ProfileStore, ScanUsageIndex, UsageIndex, UsageReport};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::transaction::{Intent, Transaction};

/// Profile mutation engine
#[derive(Debug)]
pub struct ProfileEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: ProfileStore> ProfileEngine<S> {
    /// Create an engine with default configuration
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// All profiles of a kind
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RemoteRejected`] if the store cannot list.
    pub fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, EngineError> {
        self.store.list(kind).map_err(EngineError::RemoteRejected)
    }

    /// One profile by name
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if absent.
    pub fn get(&self, kind: ProfileKind, name: &str) -> Result<Profile, EngineError> {
        self.store
            .get_by_name(kind, name)
            .map_err(|e| EngineError::from_lookup(kind, name, e))
    }

    /// Who uses a profile, including ONUs reached through service profiles
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the profile is absent.
    pub fn usage(&self, kind: ProfileKind, name: &str) -> Result<UsageReport, EngineError> {
        self.get(kind, name)?;
        ScanUsageIndex::new(&self.store)
            .report(kind, name)
            .map_err(EngineError::RemoteRejected)
    }

    /// Open a transaction on a stored profile
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the profile is absent
    /// - [`EngineError::InUseBlocked`] for a delete of a referenced profile;
    ///   the store is not touched
    pub fn begin_transaction(&self, kind: ProfileKind, name: &str, intent: Intent) -> Result<Transaction<'_>, EngineError> {
        self.begin_transaction_with(&ScanUsageIndex::new(&self.store), kind, name, intent)
    }

    /// Open a transaction using another usage index
    ///
    /// # Errors
    ///
    /// As [`ProfileEngine::begin_transaction`].
    pub fn begin_transaction_with(
        &self,
        usage: &dyn UsageIndex,
        kind: ProfileKind,
        name: &str,
        intent: Intent,
    ) -> Result<Transaction<'_>, EngineError> {
        let original = self.get(kind, name)?;
        let mut txn = Transaction::load(&self.store, &self.config, intent, original);

        let dependents = match usage.dependents(kind, name) {
            Ok(dependents) => dependents,
            Err(e) => {
                debug!(%kind, profile = name, error = %e, "usage check failed");
                txn.abort();
                return Err(EngineError::RemoteRejected(e));
            }
        };
        txn.guard(dependents)?;
        Ok(txn)
    }

    /// Delete a profile in one step
    ///
    /// # Errors
    ///
    /// As [`ProfileEngine::begin_transaction`] and [`Transaction::remove`].
    pub fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), EngineError> {
        self.begin_transaction(kind, name, Intent::Delete)?.remove()
    }
}
