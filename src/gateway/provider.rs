use crate::gateway::error::GatewayResult;
use crate::gateway::types::{ConfirmAction, ConfirmationRequest};
use async_trait::async_trait;

/// Confirmation seam to the payment provider.
///
/// Implementations live in the hosting layer (the provider's confirmation
/// step is bound to the live payment form), and must use
/// redirect-if-required semantics: only report `RedirectIssued` when the
/// provider mandates an out-of-page step.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm_payment(&self, request: ConfirmationRequest) -> GatewayResult<ConfirmAction>;
}
