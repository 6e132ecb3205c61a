use serde::{Deserialize, Serialize};

/// Secret binding created by the checkout UI when the payment form was
/// mounted. The gateway needs both to finish the confirmation and to know
/// where to land the user if an out-of-page step is mandated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub client_secret: String,
    pub return_url: String,
}

/// What the gateway did with the confirmation attempt.
///
/// `RedirectIssued` means navigation is under way and the checkout outcome
/// cannot be resolved in-page; resolution happens on the next mount through
/// the resumption path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Completed,
    RedirectIssued,
}
