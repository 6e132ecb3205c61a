//! Farepass checkout confirmation core.
//!
//! Reconciles three partially-observable processes around one checkout: the
//! payment provider's confirmation call (which may finish in-page, demand a
//! redirect, or fail), the backend webhook that later settles the
//! authoritative order record, and a bounded poller that discovers the
//! terminal order state without a push channel. The hosting UI supplies the
//! gateway implementation and adapts the single [`CheckoutOutcome`] into its
//! own event handling.

pub mod checkout;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod orders;

pub use checkout::{
    CheckoutController, CheckoutOutcome, FailureKind, MemoryNavigation, NavigationContext,
    PaymentStatusPoller, PollPolicy, Resumption,
};
pub use config::{CheckoutConfig, ConfigError};
pub use gateway::{ConfirmAction, ConfirmationRequest, GatewayError, PaymentGateway};
pub use orders::{HttpOrderStatusClient, Order, OrderApiConfig, OrderStatus, OrderStatusClient, Ticket};
