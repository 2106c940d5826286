//! Transfer Error Types
//!
//! Every failure of a transfer is a distinct variant so the caller can map
//! each one to its own response. Any error leaves both accounts unchanged.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountId;
use crate::balance::BalanceError;

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Validation Errors (before any lock) ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and target account cannot be the same: {0}")]
    SameAccount(AccountId),

    #[error("Account does not exist for id {0}")]
    AccountNotFound(AccountId),

    // === Business Errors (both locks held) ===
    #[error(
        "Insufficient funds: attempted to withdraw {requested} but account {account} balance is {available}"
    )]
    InsufficientFunds {
        account: AccountId,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Crediting {amount} would overflow the balance of account {account}")]
    Overflow { account: AccountId, amount: Decimal },

    // === Lock Errors ===
    #[error("Failed to acquire lock on account {account} after {attempts} retries.")]
    LockAcquisitionFailure { account: AccountId, attempts: u32 },

    #[error("Transfer cancelled while waiting for the lock on account {account}")]
    Cancelled { account: AccountId },
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::SameAccount(_) => "SAME_ACCOUNT",
            TransferError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            TransferError::Overflow { .. } => "OVERFLOW",
            TransferError::LockAcquisitionFailure { .. } => "LOCK_ACQUISITION_FAILURE",
            TransferError::Cancelled { .. } => "CANCELLED",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::InvalidAmount
            | TransferError::SameAccount(_)
            | TransferError::AccountNotFound(_)
            | TransferError::InsufficientFunds { .. } => 400,
            TransferError::LockAcquisitionFailure { .. } | TransferError::Cancelled { .. } => 409,
            TransferError::Overflow { .. } => 422,
        }
    }

    /// Lock contention errors; the caller may re-issue the transfer.
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            TransferError::LockAcquisitionFailure { .. } | TransferError::Cancelled { .. }
        )
    }

    /// Attach the account a balance error occurred on.
    pub(crate) fn from_balance(account: &AccountId, err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds {
                available,
                requested,
            } => TransferError::InsufficientFunds {
                account: account.clone(),
                available,
                requested,
            },
            BalanceError::Overflow(amount) => TransferError::Overflow {
                account: account.clone(),
                amount,
            },
            BalanceError::NonPositiveAmount(_) | BalanceError::NegativeBalance(_) => {
                TransferError::InvalidAmount
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AccountId {
        AccountId::new(s).unwrap()
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::InvalidAmount.code(), "INVALID_AMOUNT");
        assert_eq!(TransferError::SameAccount(id("A")).code(), "SAME_ACCOUNT");
        assert_eq!(
            TransferError::LockAcquisitionFailure {
                account: id("A"),
                attempts: 3
            }
            .code(),
            "LOCK_ACQUISITION_FAILURE"
        );
        assert_eq!(
            TransferError::Cancelled { account: id("A") }.code(),
            "CANCELLED"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::InvalidAmount.http_status(), 400);
        assert_eq!(TransferError::AccountNotFound(id("X")).http_status(), 400);
        assert_eq!(
            TransferError::InsufficientFunds {
                account: id("A"),
                available: Decimal::from(50),
                requested: Decimal::from(100),
            }
            .http_status(),
            400
        );
        assert_eq!(
            TransferError::Cancelled { account: id("A") }.http_status(),
            409
        );
    }

    #[test]
    fn test_display() {
        let err = TransferError::LockAcquisitionFailure {
            account: id("A1"),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "Failed to acquire lock on account A1 after 3 retries."
        );
        assert_eq!(
            TransferError::InvalidAmount.to_string(),
            "Amount must be greater than zero"
        );
        let err = TransferError::InsufficientFunds {
            account: id("A"),
            available: Decimal::from(50),
            requested: Decimal::from(100),
        };
        assert!(err.to_string().starts_with("Insufficient funds"));
    }

    #[test]
    fn test_from_balance() {
        let err = TransferError::from_balance(
            &id("A"),
            BalanceError::InsufficientFunds {
                available: Decimal::from(1),
                requested: Decimal::from(2),
            },
        );
        assert!(matches!(err, TransferError::InsufficientFunds { .. }));
        assert!(!err.is_contention());

        let err = TransferError::from_balance(&id("B"), BalanceError::Overflow(Decimal::ONE));
        assert_eq!(
            err,
            TransferError::Overflow {
                account: id("B"),
                amount: Decimal::ONE
            }
        );
    }
}
