//! Accounts Service
//!
//! Caller side of the coordinator: resolves ids through the repository,
//! runs the transfer, then notifies. The service adds no locking of its own.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::coordinator::TransferCoordinator;
use super::error::TransferError;
use super::notifier::TransferNotifier;
use super::types::TransferReceipt;
use crate::account::{AccountError, AccountId, AccountRepository, MonetaryAccount};
use crate::signal::CancelSignal;

/// Errors raised while opening an account
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CreateAccountError {
    #[error(transparent)]
    Invalid(#[from] AccountError),

    #[error(transparent)]
    Repository(#[from] crate::account::RepositoryError),
}

/// Account operations exposed to the (external) API layer
pub struct AccountsService {
    repository: Arc<dyn AccountRepository>,
    coordinator: TransferCoordinator,
    notifier: Arc<dyn TransferNotifier>,
}

impl AccountsService {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        coordinator: TransferCoordinator,
        notifier: Arc<dyn TransferNotifier>,
    ) -> Self {
        Self {
            repository,
            coordinator,
            notifier,
        }
    }

    /// Open an account with an initial balance.
    pub fn create_account(
        &self,
        account_id: &str,
        initial_balance: Decimal,
    ) -> Result<Arc<MonetaryAccount>, CreateAccountError> {
        let account = MonetaryAccount::open(account_id, initial_balance)?;
        Ok(self.repository.create(account)?)
    }

    pub fn get_account(&self, account_id: &AccountId) -> Option<Arc<MonetaryAccount>> {
        self.repository.find(account_id)
    }

    /// Current balance of an account, read under its lock.
    pub async fn balance_of(&self, account_id: &AccountId) -> Result<Decimal, TransferError> {
        Ok(self.get_account_or_err(account_id)?.balance().await)
    }

    /// Resolve both ids and transfer `amount` between them.
    ///
    /// # Errors
    /// `InvalidAmount` is reported before the ids are resolved;
    /// `AccountNotFound` for an unknown id; everything else comes from
    /// [`TransferCoordinator::transfer`].
    pub async fn transfer_amount(
        &self,
        from_id: &AccountId,
        to_id: &AccountId,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        self.transfer_amount_cancellable(from_id, to_id, amount, &CancelSignal::new())
            .await
    }

    /// Same as [`transfer_amount`](Self::transfer_amount), aborting lock
    /// waits when `cancel` fires.
    pub async fn transfer_amount_cancellable(
        &self,
        from_id: &AccountId,
        to_id: &AccountId,
        amount: Decimal,
        cancel: &CancelSignal,
    ) -> Result<TransferReceipt, TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        let from = self.get_account_or_err(from_id)?;
        let to = self.get_account_or_err(to_id)?;

        let receipt = self
            .coordinator
            .transfer_cancellable(&from, &to, amount, cancel)
            .await?;

        self.notifier.notify_transfer(&receipt).await;
        debug!(
            notifier = self.notifier.name(),
            "transferred {} from {} to {}. From Account balance: {}. To Account balance: {}",
            receipt.amount,
            receipt.from,
            receipt.to,
            receipt.from_balance,
            receipt.to_balance
        );

        Ok(receipt)
    }

    fn get_account_or_err(
        &self,
        account_id: &AccountId,
    ) -> Result<Arc<MonetaryAccount>, TransferError> {
        self.repository.find(account_id).ok_or_else(|| {
            warn!(account = %account_id, "Account does not exist");
            TransferError::AccountNotFound(account_id.clone())
        })
    }
}
