use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Synchronous confirmation failures. Never retried: the user fixes their
/// payment details and starts a new attempt.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("payment declined: {message}")]
    Declined {
        message: String,
        provider_code: Option<String>,
    },

    #[error("payment gateway unavailable: {message}")]
    Unavailable { message: String },
}

impl GatewayError {
    /// Message suitable for direct display in the checkout UI.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Declined { message, .. } => message.clone(),
            GatewayError::Unavailable { .. } => {
                "The payment service is temporarily unavailable. Please try again.".to_string()
            }
        }
    }
}
