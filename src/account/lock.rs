//! Lock policy and ownership proof for account locks

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::MutexGuard;
use tracing::trace;

use super::validation::AccountId;
use crate::balance::Balance;

/// Default number of attempts per account lock
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default wait per attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(50);
/// Default pause between two failed attempts
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

/// Lock-acquisition budget for a single account lock
///
/// Worst-case wait for one lock is
/// `max_attempts * attempt_timeout + (max_attempts - 1) * backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPolicy {
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    pub backoff: Duration,
}

impl LockPolicy {
    pub const fn new(max_attempts: u32, attempt_timeout: Duration, backoff: Duration) -> Self {
        Self {
            max_attempts,
            attempt_timeout,
            backoff,
        }
    }

    /// Upper bound on time spent waiting for one lock under this policy
    pub fn worst_case_wait(&self) -> Duration {
        let waits = self.attempt_timeout * self.max_attempts;
        let pauses = self.backoff * self.max_attempts.saturating_sub(1);
        waits + pauses
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            DEFAULT_ATTEMPT_TIMEOUT,
            DEFAULT_BACKOFF,
        )
    }
}

/// The wait for a lock was interrupted by a `CancelSignal`
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Lock acquisition cancelled")]
pub struct LockCancelled;

/// Proof that the holder owns an account's lock.
///
/// The balance is only reachable through a guard. Dropping the guard releases
/// the lock, so every exit path of the holder releases it too.
pub struct AccountGuard<'a> {
    id: &'a AccountId,
    balance: MutexGuard<'a, Balance>,
}

impl<'a> AccountGuard<'a> {
    pub(crate) fn new(id: &'a AccountId, balance: MutexGuard<'a, Balance>) -> Self {
        Self { id, balance }
    }

    pub fn account_id(&self) -> &AccountId {
        self.id
    }

    /// Balance as seen by the lock holder
    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    /// Replace the balance with a value computed from it.
    ///
    /// Only the transfer coordinator writes balances.
    pub(crate) fn commit(&mut self, next: Balance) {
        *self.balance = next;
    }
}

impl fmt::Debug for AccountGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountGuard")
            .field("id", self.id)
            .field("balance", &*self.balance)
            .finish()
    }
}

impl Drop for AccountGuard<'_> {
    fn drop(&mut self) {
        trace!(account = %self.id, "Account lock released");
    }
}
