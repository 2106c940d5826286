//! Account management module
//!
//! In-memory accounts whose balance is owned by a per-account lock.

pub mod lock;
pub mod models;
pub mod repository;
pub mod validation;

// Re-export commonly used types
pub use lock::{AccountGuard, LockCancelled, LockPolicy};
pub use models::{AccountError, AccountSnapshot, MonetaryAccount};
pub use repository::{AccountRepository, InMemoryAccountRepository, RepositoryError};
pub use validation::{AccountId, ValidationError};
