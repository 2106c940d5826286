//! Transfer Core Types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::AccountId;
use crate::core_types::TransferId;

/// Outcome of a completed transfer.
///
/// Balances are the values committed inside the critical section, i.e. the
/// state both accounts had at the moment their locks were released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub transfer_id: TransferId,
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
    pub from_balance: Decimal,
    pub to_balance: Decimal,
    pub completed_at: DateTime<Utc>,
}
