//! Monetary account entity

use std::sync::atomic::{AtomicU64, Ordering};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use super::lock::{AccountGuard, LockCancelled, LockPolicy};
use super::validation::{AccountId, ValidationError};
use crate::balance::{Balance, BalanceError};
use crate::signal::CancelSignal;

/// Account construction errors
#[derive(Debug, Error, PartialEq)]
pub enum AccountError {
    #[error(transparent)]
    InvalidId(#[from] ValidationError),

    #[error(transparent)]
    InvalidBalance(#[from] BalanceError),
}

/// MonetaryAccount - an identifier and a balance guarded by the account's own lock.
///
/// # Invariants:
/// 1. `id` is immutable after creation
/// 2. the balance lives inside the mutex; it can only be read or written
///    through an `AccountGuard`
/// 3. the mutex is not reentrant: a task holding the guard must not try to
///    lock the same account again
///
/// Accounts are shared by reference (`Arc<MonetaryAccount>`). All transfers
/// touching the same id must operate on the same instance.
#[derive(Debug)]
pub struct MonetaryAccount {
    id: AccountId,
    balance: Mutex<Balance>,
    lock_attempts: AtomicU64,
    lock_acquisitions: AtomicU64,
}

impl MonetaryAccount {
    /// Create an account with an opening balance.
    ///
    /// # Errors
    /// `InvalidBalance` if `initial_balance` is negative.
    pub fn new(id: AccountId, initial_balance: Decimal) -> Result<Self, AccountError> {
        Ok(Self {
            id,
            balance: Mutex::new(Balance::new(initial_balance)?),
            lock_attempts: AtomicU64::new(0),
            lock_acquisitions: AtomicU64::new(0),
        })
    }

    /// Validate a raw identifier and create the account.
    pub fn open(id: &str, initial_balance: Decimal) -> Result<Self, AccountError> {
        Self::new(AccountId::new(id)?, initial_balance)
    }

    /// Read-only access to the account ID
    #[inline(always)]
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Snapshot of the current balance, read under the account lock.
    pub async fn balance(&self) -> Decimal {
        self.balance.lock().await.amount()
    }

    /// Snapshot including the mutation version.
    pub async fn snapshot(&self) -> AccountSnapshot {
        let balance = self.balance.lock().await;
        AccountSnapshot {
            account_id: self.id.clone(),
            balance: balance.amount(),
            version: balance.version(),
        }
    }

    /// Attempts made through `acquire_with_retries` since creation
    pub fn lock_attempts(&self) -> u64 {
        self.lock_attempts.load(Ordering::SeqCst)
    }

    /// Successful acquisitions through `acquire_with_retries` since creation
    pub fn lock_acquisitions(&self) -> u64 {
        self.lock_acquisitions.load(Ordering::SeqCst)
    }

    /// Acquire this account's lock with a bounded number of timed attempts.
    ///
    /// Each attempt waits at most `policy.attempt_timeout`; a failed attempt is
    /// followed by `policy.backoff` before the next one.
    ///
    /// # Returns
    /// - `Ok(Some(guard))` on the first successful attempt
    /// - `Ok(None)` once `policy.max_attempts` attempts have failed
    /// - `Err(LockCancelled)` if `cancel` fires while waiting or backing off
    pub async fn acquire_with_retries(
        &self,
        policy: &LockPolicy,
        cancel: &CancelSignal,
    ) -> Result<Option<AccountGuard<'_>>, LockCancelled> {
        for attempt in 1..=policy.max_attempts {
            self.lock_attempts.fetch_add(1, Ordering::SeqCst);

            let acquired = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LockCancelled),
                res = tokio::time::timeout(policy.attempt_timeout, self.balance.lock()) => res.ok(),
            };

            if let Some(balance) = acquired {
                self.lock_acquisitions.fetch_add(1, Ordering::SeqCst);
                return Ok(Some(AccountGuard::new(&self.id, balance)));
            }

            debug!(
                account = %self.id,
                attempt,
                max_attempts = policy.max_attempts,
                "Retrying to lock account"
            );

            if attempt < policy.max_attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(LockCancelled),
                    _ = tokio::time::sleep(policy.backoff) => {}
                }
            }
        }

        Ok(None)
    }
}

/// Point-in-time view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub version: u64,
}
