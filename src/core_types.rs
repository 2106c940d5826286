//! Core types used throughout the system
//!
//! Identifier types shared by accounts and transfers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use crate::account::validation::AccountId;

/// Transfer ID - ULID-based unique identifier for a completed transfer.
///
/// Transfers are not persisted; the ID only correlates the receipt handed
/// back to the caller with the log lines emitted while it ran.
///
/// ULIDs are monotonic and sortable, and need no coordination between tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransferId(ulid::Ulid);

impl TransferId {
    /// Generate a new unique TransferId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for TransferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransferId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_id_unique() {
        let a = TransferId::new();
        let b = TransferId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_transfer_id_parse_display() {
        let id = TransferId::new();
        let parsed: TransferId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-ulid".parse::<TransferId>().is_err());
    }
}
