//! Checkout confirmation control flow.
//!
//! Two independent entry points lead into the same poller: the in-page
//! confirmation attempt, and the resumption path taken when the page reloads
//! after a provider redirect. Both resolve to a single `CheckoutOutcome`.

use crate::checkout::outcome::{cancellation_message, CheckoutOutcome, FailureKind};
use crate::checkout::poller::{wait_or_cancelled, PaymentStatusPoller, PollPolicy};
use crate::checkout::resumption::{detect_and_consume, NavigationContext, Resumption};
use crate::gateway::provider::PaymentGateway;
use crate::gateway::types::{ConfirmAction, ConfirmationRequest};
use crate::orders::client::OrderStatusClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub struct CheckoutController {
    orders: Arc<dyn OrderStatusClient>,
    gateway: Arc<dyn PaymentGateway>,
    policy: PollPolicy,
    settle_delay: Duration,
}

impl CheckoutController {
    pub fn new(
        orders: Arc<dyn OrderStatusClient>,
        gateway: Arc<dyn PaymentGateway>,
        policy: PollPolicy,
        settle_delay: Duration,
    ) -> Self {
        Self {
            orders,
            gateway,
            policy,
            settle_delay,
        }
    }

    /// In-page confirmation attempt.
    ///
    /// On synchronous success the webhook may not have landed yet, so a
    /// settle delay runs before polling starts. On redirect the outcome is
    /// `RedirectInFlight` and resolution happens on the next mount via
    /// [`resume_after_redirect`](Self::resume_after_redirect).
    pub async fn confirm_and_verify(
        &self,
        order_id: &str,
        request: ConfirmationRequest,
        mut cancel: watch::Receiver<bool>,
    ) -> CheckoutOutcome {
        match self.gateway.confirm_payment(request).await {
            Err(err) => {
                error!(order_id = %order_id, error = %err, "gateway rejected confirmation");
                CheckoutOutcome::failed(FailureKind::Gateway, err.user_message())
            }
            Ok(ConfirmAction::RedirectIssued) => {
                info!(
                    order_id = %order_id,
                    "confirmation requires a redirect, resolution deferred to resumption"
                );
                CheckoutOutcome::RedirectInFlight
            }
            Ok(ConfirmAction::Completed) => {
                info!(
                    order_id = %order_id,
                    settle_ms = self.settle_delay.as_millis() as u64,
                    "confirmation completed in-page, letting the webhook settle"
                );
                if wait_or_cancelled(self.settle_delay, &mut cancel).await {
                    return CheckoutOutcome::Cancelled;
                }
                self.poller().run(order_id, cancel).await
            }
        }
    }

    /// Resumption entry point, run once per checkout mount.
    ///
    /// Returns `None` when the mount is not a resumption (no markers). The
    /// markers are consumed either way, so calling this again on the same
    /// navigation context yields `None`.
    pub async fn resume_after_redirect(
        &self,
        nav: &mut dyn NavigationContext,
        order_id: &str,
        cancel: watch::Receiver<bool>,
    ) -> Option<CheckoutOutcome> {
        match detect_and_consume(nav) {
            Resumption::None => None,
            Resumption::Cancelled => {
                info!(order_id = %order_id, "user cancelled at the provider, no verification needed");
                Some(CheckoutOutcome::failed(
                    FailureKind::PaymentCancelled,
                    cancellation_message(),
                ))
            }
            Resumption::Failed { message } => {
                error!(order_id = %order_id, "redirect reported failure");
                Some(CheckoutOutcome::failed(FailureKind::PaymentFailed, message))
            }
            Resumption::Succeeded {
                order_id: marker_id,
            }
            | Resumption::Ambiguous {
                order_id: marker_id,
            } => {
                if let Some(marker_id) = &marker_id {
                    if marker_id != order_id {
                        // Non-fatal: the checkout's own id is authoritative.
                        warn!(
                            order_id = %order_id,
                            marker_order_id = %marker_id,
                            "resumption markers reference a different order"
                        );
                    }
                }
                Some(self.poller().run(order_id, cancel).await)
            }
        }
    }

    /// Verify a known order directly, without a confirmation attempt. Hosts
    /// use this to resume verification for an order whose settle delay was
    /// interrupted by navigation.
    pub async fn verify_order(
        &self,
        order_id: &str,
        cancel: watch::Receiver<bool>,
    ) -> CheckoutOutcome {
        self.poller().run(order_id, cancel).await
    }

    fn poller(&self) -> PaymentStatusPoller {
        PaymentStatusPoller::new(self.orders.clone(), self.policy.clone())
    }
}
