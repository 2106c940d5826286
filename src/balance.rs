//! ENFORCED BALANCE TYPE - Owned by MonetaryAccount's lock
//!
//! This is the SINGLE source of truth for balance arithmetic.
//! ALL balance mutations MUST go through these methods.
//!
//! # Enforcement Strategy:
//! 1. Fields are PRIVATE - no direct access
//! 2. All mutations return Result - errors are explicit
//! 3. Version auto-increments - every accepted mutation is counted
//! 4. checked_add/sub - overflow protection
//! 5. Amounts must be strictly positive

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Balance arithmetic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Initial balance must not be negative, got {0}")]
    NegativeBalance(Decimal),

    #[error("Insufficient funds: attempted to withdraw {requested} but balance is {available}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Deposit of {0} would overflow the balance")]
    Overflow(Decimal),
}

/// Monetary balance of a single account
///
/// # Invariants (ENFORCED by private fields):
/// - amount is never negative
/// - version increments on every successful deposit/withdraw
/// - a failed operation leaves the balance untouched
///
/// # Usage:
/// ```ignore
/// let mut balance = Balance::new(Decimal::new(100000, 2))?; // 1000.00
/// balance.withdraw(Decimal::new(10000, 2))?;               // 900.00, version 1
/// balance.deposit(Decimal::new(5000, 2))?;                 // 950.00, version 2
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Balance {
    amount: Decimal, // PRIVATE - ONLY modified through deposit/withdraw
    version: u64,    // PRIVATE - Incremented on deposit/withdraw
}

impl Balance {
    /// Create an opening balance.
    ///
    /// # Errors
    /// - `NegativeBalance` if `amount < 0`
    pub fn new(amount: Decimal) -> Result<Self, BalanceError> {
        if amount < Decimal::ZERO {
            return Err(BalanceError::NegativeBalance(amount));
        }
        Ok(Self { amount, version: 0 })
    }

    // ============================================================
    // READ-ONLY GETTERS
    // ============================================================

    /// Current amount (read-only)
    #[inline(always)]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Number of accepted mutations since creation
    #[inline(always)]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Whether `amount` can be withdrawn without going negative
    #[inline]
    pub fn covers(&self, amount: Decimal) -> bool {
        self.amount >= amount
    }

    // ============================================================
    // VALIDATED MUTATIONS
    // ============================================================

    /// Deposit funds
    ///
    /// # Errors
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `Overflow` if the result cannot be represented
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BalanceError> {
        ensure_positive(amount)?;
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(BalanceError::Overflow(amount))?;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    /// Withdraw funds
    ///
    /// # Errors
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount > self.amount()`
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BalanceError> {
        ensure_positive(amount)?;
        if !self.covers(amount) {
            return Err(BalanceError::InsufficientFunds {
                available: self.amount,
                requested: amount,
            });
        }
        // Cannot fail: amount <= self.amount and both are finite decimals.
        self.amount -= amount;
        self.version = self.version.wrapping_add(1);
        Ok(())
    }

    // ============================================================
    // VALUE-STYLE OPERATIONS (compute first, commit later)
    // ============================================================

    /// Balance after withdrawing `amount`, without touching `self`
    pub fn after_withdraw(&self, amount: Decimal) -> Result<Self, BalanceError> {
        let mut next = *self;
        next.withdraw(amount)?;
        Ok(next)
    }

    /// Balance after depositing `amount`, without touching `self`
    pub fn after_deposit(&self, amount: Decimal) -> Result<Self, BalanceError> {
        let mut next = *self;
        next.deposit(amount)?;
        Ok(next)
    }
}

#[inline]
fn ensure_positive(amount: Decimal) -> Result<(), BalanceError> {
    if amount <= Decimal::ZERO {
        return Err(BalanceError::NonPositiveAmount(amount));
    }
    Ok(())
}

// ============================================================
// TESTS - Prove enforcement works
// ============================================================
