//! Transfer notifications
//!
//! Side effect fired after a committed transfer. Notification is
//! fire-and-forget: it cannot fail the transfer that already happened.

use async_trait::async_trait;
use tracing::info;

use super::types::TransferReceipt;

/// Notification sink for committed transfers
#[async_trait]
pub trait TransferNotifier: Send + Sync {
    /// Get notifier name for logging
    fn name(&self) -> &'static str;

    /// Tell the account holders about a committed transfer.
    async fn notify_transfer(&self, receipt: &TransferReceipt);
}

/// Notifier that emits a structured log event per transfer
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl TransferNotifier for LoggingNotifier {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn notify_transfer(&self, receipt: &TransferReceipt) {
        info!(
            transfer_id = %receipt.transfer_id,
            account = %receipt.from,
            "Amount: {} is transferred from account: {} to account: {}",
            receipt.amount,
            receipt.from,
            receipt.to
        );
    }
}
