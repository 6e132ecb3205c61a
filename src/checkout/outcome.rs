use crate::orders::types::Ticket;

/// Stable classifier for failed checkouts. Hosts key localized copy off
/// this; the `message` on the outcome is the default English rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider rejected the confirmation synchronously.
    Gateway,
    /// Order reached FAILED.
    PaymentFailed,
    /// Order reached CANCELLED, or the user backed out of the redirect.
    PaymentCancelled,
    /// Order SUCCEEDED but issued no tickets.
    DataIntegrity,
    /// Attempt budget exhausted while the order stayed non-terminal.
    Timeout,
}

/// Single terminal result of one checkout attempt (or one resumption).
///
/// Exactly one value is produced per invocation; the hosting UI adapts it
/// into its own success/error/cancel handling. `Cancelled` means the caller
/// tore the flow down and nothing should be surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Succeeded { tickets: Vec<Ticket> },
    Failed { kind: FailureKind, message: String },
    RedirectInFlight,
    Cancelled,
}

impl CheckoutOutcome {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        CheckoutOutcome::Failed {
            kind,
            message: message.into(),
        }
    }
}

pub(crate) fn cancellation_message() -> String {
    "Payment was cancelled before completion.".to_string()
}

pub(crate) fn redirect_failure_message() -> String {
    "Payment could not be completed after the bank verification step. You have not been charged."
        .to_string()
}

pub(crate) fn generic_failure_message() -> String {
    "Payment failed. Please try again or use a different payment method.".to_string()
}

pub(crate) fn data_integrity_message(order_id: &str) -> String {
    format!(
        "Your payment was received but no tickets were issued. Please contact support and quote order {}.",
        order_id
    )
}

pub(crate) fn timeout_message(order_id: &str) -> String {
    format!(
        "We could not confirm your payment in time. If you were charged, the tickets will appear shortly; otherwise contact support and quote order {}.",
        order_id
    )
}
