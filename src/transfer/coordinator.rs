//! Transfer Coordinator
//!
//! Moves funds between two accounts atomically with respect to both.
//!
//! # Algorithm
//!
//! ```text
//! validate amount / same account      (no lock touched)
//!        │
//! lock_order(from, to) → (first, second)
//!        │
//! acquire first ──fail──▶ LockAcquisitionFailure / Cancelled
//!        │
//! acquire second ─fail──▶ release first, LockAcquisitionFailure / Cancelled
//!        │
//! compute debit + credit ─fail──▶ release both, InsufficientFunds / Overflow
//!        │
//! commit both, release both ──▶ TransferReceipt
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Total lock order**: the lower account id is always locked first
//! 2. **All-or-nothing**: both new balances are computed before either is written
//! 3. **Scoped release**: locks are guards; every exit path drops them
//! 4. **No await in the critical section**: cancellation cannot split debit and credit

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::error::TransferError;
use super::ordering::lock_order;
use super::types::TransferReceipt;
use crate::account::{AccountGuard, LockCancelled, LockPolicy, MonetaryAccount};
use crate::core_types::TransferId;
use crate::signal::CancelSignal;

/// Transfer Coordinator - stateless apart from its lock policy
#[derive(Debug, Clone, Default)]
pub struct TransferCoordinator {
    policy: LockPolicy,
}

impl TransferCoordinator {
    /// Create a new TransferCoordinator
    pub fn new(policy: LockPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LockPolicy {
        &self.policy
    }

    /// Transfer `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount <= 0` (no lock touched)
    /// - `SameAccount` if both handles carry the same id (no lock touched)
    /// - `LockAcquisitionFailure` if either lock stays busy for the whole budget
    /// - `InsufficientFunds` if the source balance is below `amount`
    /// - `Overflow` if the credit cannot be represented
    ///
    /// On any error both balances are left as they were.
    pub async fn transfer(
        &self,
        from: &MonetaryAccount,
        to: &MonetaryAccount,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        let never = CancelSignal::new();
        self.transfer_cancellable(from, to, amount, &never).await
    }

    /// Same as [`transfer`](Self::transfer), aborting lock waits when `cancel`
    /// fires. A cancelled transfer returns `Cancelled` and mutates nothing.
    pub async fn transfer_cancellable(
        &self,
        from: &MonetaryAccount,
        to: &MonetaryAccount,
        amount: Decimal,
        cancel: &CancelSignal,
    ) -> Result<TransferReceipt, TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        // The lock is not reentrant; taking it twice would hang this task.
        if from.id() == to.id() {
            return Err(TransferError::SameAccount(from.id().clone()));
        }

        let (first, second) = lock_order(from, to);

        // Dropped on every return below, including the second lock's failure.
        let first_guard = self.acquire(first, cancel).await?;
        let second_guard = self.acquire(second, cancel).await?;

        let (mut from_guard, mut to_guard) = if std::ptr::eq(first, from) {
            (first_guard, second_guard)
        } else {
            (second_guard, first_guard)
        };

        // === Critical section: both locks held, no await point ===
        let debited = from_guard
            .balance()
            .after_withdraw(amount)
            .map_err(|e| TransferError::from_balance(from.id(), e))?;
        let credited = to_guard
            .balance()
            .after_deposit(amount)
            .map_err(|e| TransferError::from_balance(to.id(), e))?;

        from_guard.commit(debited);
        to_guard.commit(credited);
        drop(from_guard);
        drop(to_guard);
        // === Both locks released ===

        let receipt = TransferReceipt {
            transfer_id: TransferId::new(),
            from: from.id().clone(),
            to: to.id().clone(),
            amount,
            from_balance: debited.amount(),
            to_balance: credited.amount(),
            completed_at: Utc::now(),
        };

        info!(
            transfer_id = %receipt.transfer_id,
            from = %receipt.from,
            to = %receipt.to,
            amount = %amount,
            "Transfer committed"
        );

        Ok(receipt)
    }

    /// Acquire one account lock under the coordinator's policy, mapping the
    /// outcome to a transfer error.
    async fn acquire<'a>(
        &self,
        account: &'a MonetaryAccount,
        cancel: &CancelSignal,
    ) -> Result<AccountGuard<'a>, TransferError> {
        match account.acquire_with_retries(&self.policy, cancel).await {
            Ok(Some(guard)) => {
                debug!(account = %account.id(), "Account lock acquired");
                Ok(guard)
            }
            Ok(None) => {
                warn!(
                    account = %account.id(),
                    attempts = self.policy.max_attempts,
                    "Failed to acquire account lock"
                );
                Err(TransferError::LockAcquisitionFailure {
                    account: account.id().clone(),
                    attempts: self.policy.max_attempts,
                })
            }
            Err(LockCancelled) => {
                warn!(account = %account.id(), "Lock wait cancelled");
                Err(TransferError::Cancelled {
                    account: account.id().clone(),
                })
            }
        }
    }
}
