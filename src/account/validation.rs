//! Input validation for account identifiers
//!
//! `AccountId` is a validated type with a private field, so every identifier
//! that reaches an account or the lock-ordering logic has passed `new()`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Validation Errors
// ============================================================================

/// Validation errors for account identifiers
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Account ID cannot be empty")]
    EmptyAccountId,

    #[error("Invalid length for {field}: expected {min}-{max}, got {actual}")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid format for {field}: '{value}' (expected: {expected})")]
    InvalidFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ============================================================================
// AccountId - Validated Account Identifier (Private Field)
// ============================================================================

/// Maximum accepted identifier length in bytes
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Validated account identifier
///
/// The derived `Ord` is plain byte-wise string order. It is the total order
/// used to sequence lock acquisition, so it must stay deterministic: do not
/// replace it with a locale- or case-aware comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create a new validated AccountId
    ///
    /// # Validation Rules
    /// - Surrounding whitespace is trimmed
    /// - Must not be empty
    /// - Length: 1-64 bytes
    /// - No whitespace or control characters inside
    ///
    /// # Examples
    /// ```
    /// use lockstep_transfer::AccountId;
    ///
    /// let id = AccountId::new(" Id-123 ").unwrap();
    /// assert_eq!(id.as_str(), "Id-123");
    ///
    /// assert!(AccountId::new("   ").is_err());
    /// ```
    pub fn new(id: &str) -> Result<Self, ValidationError> {
        let id = id.trim();

        if id.is_empty() {
            return Err(ValidationError::EmptyAccountId);
        }

        if id.len() > MAX_ACCOUNT_ID_LEN {
            return Err(ValidationError::InvalidLength {
                field: "account_id",
                min: 1,
                max: MAX_ACCOUNT_ID_LEN,
                actual: id.len(),
            });
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidFormat {
                field: "account_id",
                value: id.to_string(),
                expected: "no whitespace or control characters",
            });
        }

        Ok(Self(id.to_string()))
    }

    /// Get the validated identifier as &str
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into owned String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
