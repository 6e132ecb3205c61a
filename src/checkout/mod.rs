//! Payment confirmation, redirect resumption, and order-status polling.

pub mod controller;
pub mod outcome;
pub mod poller;
pub mod resumption;

#[cfg(test)]
mod poller_tests;

pub use controller::CheckoutController;
pub use outcome::{CheckoutOutcome, FailureKind};
pub use poller::{PaymentStatusPoller, PollPolicy};
pub use resumption::{
    detect_and_consume, MemoryNavigation, NavigationContext, Resumption, ResumptionContext,
    ResumptionIntent,
};
