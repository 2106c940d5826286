//! Account-to-account transfers
//!
//! # Architecture
//!
//! The coordinator holds no state besides its lock policy. All contention is
//! expressed through the two accounts' own locks:
//! - **ordering**: the single total order over account ids
//! - **coordinator**: lock acquisition, critical section, scoped release
//! - **service**: id resolution and notification around the coordinator
//!
//! # Safety Invariants
//!
//! 1. **Lock order**: lower id first, for every transfer, in both directions
//! 2. **Bounded waits**: contention is retried only within the `LockPolicy` budget
//! 3. **Failure safety**: any error leaves both balances as they were
//! 4. **Conservation**: the sum of two accounts is unchanged by transfers between them

pub mod coordinator;
pub mod error;
pub mod notifier;
pub mod ordering;
pub mod service;
pub mod types;

// Re-exports for convenience
pub use coordinator::TransferCoordinator;
pub use error::TransferError;
pub use notifier::{LoggingNotifier, TransferNotifier};
pub use ordering::{lock_order, order_ids};
pub use service::{AccountsService, CreateAccountError};
pub use types::TransferReceipt;
