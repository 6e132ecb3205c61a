//! Bounded order-status polling.
//!
//! There is no push channel from the backend: after the provider confirms a
//! payment, the authoritative order record is updated by a webhook with
//! unknown latency. The poller bridges that gap with a sequential loop of
//! "fetch order, then wait", never overlapping requests for one order, until
//! it observes a terminal state or exhausts its attempt budget.

use crate::checkout::outcome::{
    cancellation_message, data_integrity_message, generic_failure_message, timeout_message,
    CheckoutOutcome, FailureKind,
};
use crate::orders::client::OrderStatusClient;
use crate::orders::error::OrderClientError;
use crate::orders::types::OrderStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Attempt budget and spacing. Defaults give a worst case of roughly 40 s
/// before the timeout outcome.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_millis(2000),
        }
    }
}

/// Waits out `wait`, returning early with `true` if the cancellation signal
/// fires first. A dropped sender means cancellation can no longer arrive, so
/// the wait simply completes.
pub(crate) async fn wait_or_cancelled(wait: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    if *cancel.borrow() {
        return true;
    }
    let sleep = tokio::time::sleep(wait);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = cancel.changed() => match changed {
                Ok(()) => {
                    if *cancel.borrow() {
                        return true;
                    }
                }
                Err(_) => {
                    sleep.as_mut().await;
                    return false;
                }
            },
        }
    }
}

/// Sequential polling state machine over the order-status endpoint.
///
/// Exactly one `CheckoutOutcome` is returned per invocation (never
/// `RedirectInFlight`); once it is produced no further requests are made.
pub struct PaymentStatusPoller {
    orders: Arc<dyn OrderStatusClient>,
    policy: PollPolicy,
}

impl PaymentStatusPoller {
    pub fn new(orders: Arc<dyn OrderStatusClient>, policy: PollPolicy) -> Self {
        Self { orders, policy }
    }

    pub async fn run(
        &self,
        order_id: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> CheckoutOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_client_error: Option<OrderClientError> = None;

        for attempt in 0..max_attempts {
            if *cancel.borrow() {
                info!(order_id = %order_id, attempt = attempt + 1, "polling cancelled by caller");
                return CheckoutOutcome::Cancelled;
            }

            match self.orders.fetch_order(order_id).await {
                Ok(order) => match order.status {
                    OrderStatus::Succeeded if !order.tickets.is_empty() => {
                        info!(
                            order_id = %order_id,
                            attempt = attempt + 1,
                            tickets = order.tickets.len(),
                            "order confirmed with tickets"
                        );
                        return CheckoutOutcome::Succeeded {
                            tickets: order.tickets,
                        };
                    }
                    OrderStatus::Succeeded => {
                        error!(
                            order_id = %order_id,
                            "order succeeded but no tickets were issued"
                        );
                        return CheckoutOutcome::failed(
                            FailureKind::DataIntegrity,
                            data_integrity_message(order_id),
                        );
                    }
                    OrderStatus::Failed => {
                        let message = order
                            .error_message
                            .unwrap_or_else(generic_failure_message);
                        error!(order_id = %order_id, message = %message, "order failed");
                        return CheckoutOutcome::failed(FailureKind::PaymentFailed, message);
                    }
                    OrderStatus::Cancelled => {
                        info!(order_id = %order_id, "order was cancelled");
                        return CheckoutOutcome::failed(
                            FailureKind::PaymentCancelled,
                            cancellation_message(),
                        );
                    }
                    OrderStatus::Pending | OrderStatus::Unknown => {
                        info!(
                            order_id = %order_id,
                            attempt = attempt + 1,
                            max_attempts = max_attempts,
                            status = %order.status,
                            "order not terminal yet"
                        );
                    }
                },
                Err(err) => {
                    warn!(
                        order_id = %order_id,
                        attempt = attempt + 1,
                        max_attempts = max_attempts,
                        error = %err,
                        "order status query failed, will retry"
                    );
                    last_client_error = Some(err);
                }
            }

            if attempt + 1 < max_attempts
                && wait_or_cancelled(self.policy.interval, &mut cancel).await
            {
                info!(order_id = %order_id, "polling cancelled during wait");
                return CheckoutOutcome::Cancelled;
            }
        }

        match last_client_error {
            Some(err) => error!(
                order_id = %order_id,
                attempts = max_attempts,
                last_error = %err,
                "polling budget exhausted"
            ),
            None => error!(
                order_id = %order_id,
                attempts = max_attempts,
                "polling budget exhausted, order never reached a terminal state"
            ),
        }
        CheckoutOutcome::failed(FailureKind::Timeout, timeout_message(order_id))
    }
}
