//! Lockstep Transfer - deadlock-free transfers between in-memory accounts
//!
//! Many tasks may move money between overlapping pairs of accounts, in either
//! direction, at the same time. Each account owns its balance behind its own
//! lock; a transfer takes both locks in a global order, with bounded retries,
//! and applies debit and credit while holding both.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier types (AccountId, TransferId)
//! - [`balance`] - Enforced non-negative decimal balance
//! - [`account`] - Lock-bearing account entity and registry
//! - [`signal`] - Cancellation of lock waits
//! - [`transfer`] - Lock ordering, coordinator and service
//! - [`money`] - Client amount parsing and formatting
//! - [`config`] / [`logging`] - Runtime configuration and tracing setup

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod balance;
pub mod config;
pub mod logging;
pub mod money;
pub mod signal;
pub mod transfer;

// Convenient re-exports at crate root
pub use account::{
    AccountGuard, AccountId, AccountRepository, InMemoryAccountRepository, LockPolicy,
    MonetaryAccount,
};
pub use balance::{Balance, BalanceError};
pub use core_types::TransferId;
pub use signal::CancelSignal;
pub use transfer::{
    AccountsService, LoggingNotifier, TransferCoordinator, TransferError, TransferNotifier,
    TransferReceipt, lock_order, order_ids,
};
