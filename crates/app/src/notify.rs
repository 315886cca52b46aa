//! Operator notifications.
//!
//! Outbound, fire-and-forget messages to the store operator. Delivery is
//! at-least-once and user-triggered; a failed delivery is logged and never
//! retried.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::domain::orders::models::OrderUuid;

/// Refund request raised when a paid order is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundNotice {
    pub order: OrderUuid,
    /// Amount to refund, in minor units.
    pub total: u64,
}

impl RefundNotice {
    /// The operator-facing message body.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Refund requested for order {}. Amount: {}. Please process the refund manually.",
            self.order, self.total
        )
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to deliver operator notification")]
    Delivery,
}

#[automock]
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Deliver a refund request to the operator.
    async fn refund_requested(&self, notice: RefundNotice) -> Result<(), NotifyError>;
}

/// Notifier that renders a chat deep link for the operator and emits it into
/// the log stream.
#[derive(Debug, Clone)]
pub struct DeepLinkNotifier {
    operator_phone: String,
}

impl DeepLinkNotifier {
    #[must_use]
    pub fn new(operator_phone: impl Into<String>) -> Self {
        Self {
            operator_phone: operator_phone.into(),
        }
    }

    fn deep_link(&self, notice: &RefundNotice) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.operator_phone,
            encode_text(&notice.message())
        )
    }
}

#[async_trait]
impl OperatorNotifier for DeepLinkNotifier {
    async fn refund_requested(&self, notice: RefundNotice) -> Result<(), NotifyError> {
        info!(order = %notice.order, "refund requested: {}", self.deep_link(&notice));

        Ok(())
    }
}

/// Percent-encode a message for use in a deep-link query string.
fn encode_text(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());

    for byte in text.bytes() {
        match byte {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(char::from(byte));
            }
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            }
        }
    }

    encoded
}
