//! Repository layer for account lookup
//!
//! The registry hands out `Arc<MonetaryAccount>`: every lookup of the same id
//! returns the same instance, and therefore the same lock.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::MonetaryAccount;
use super::validation::AccountId;

/// Repository errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Account id {0} already exists!")]
    DuplicateAccount(AccountId),
}

/// Account registry contract
pub trait AccountRepository: Send + Sync {
    /// Store a new account and return the shared handle.
    fn create(&self, account: MonetaryAccount) -> Result<Arc<MonetaryAccount>, RepositoryError>;

    /// Look up an account. Returns the same instance for the same id.
    fn find(&self, id: &AccountId) -> Option<Arc<MonetaryAccount>>;

    /// All registered ids, sorted.
    fn ids(&self) -> Vec<AccountId>;
}

/// In-memory account registry
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: DashMap<AccountId, Arc<MonetaryAccount>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn create(&self, account: MonetaryAccount) -> Result<Arc<MonetaryAccount>, RepositoryError> {
        match self.accounts.entry(account.id().clone()) {
            Entry::Occupied(e) => {
                warn!(account = %e.key(), "Duplicate account id rejected");
                Err(RepositoryError::DuplicateAccount(e.key().clone()))
            }
            Entry::Vacant(e) => {
                let account = Arc::new(account);
                e.insert(account.clone());
                debug!(account = %account.id(), "Account created");
                Ok(account)
            }
        }
    }

    fn find(&self, id: &AccountId) -> Option<Arc<MonetaryAccount>> {
        self.accounts.get(id).map(|entry| entry.value().clone())
    }

    fn ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}
