use thiserror::Error;

pub type OrderClientResult<T> = Result<T, OrderClientError>;

/// Failures from the order-status endpoint. All variants are transient from
/// the poller's point of view: it retries them against its attempt budget.
#[derive(Debug, Clone, Error)]
pub enum OrderClientError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("invalid order response: {message}")]
    InvalidResponse { message: String },

    #[error("order API error: {message}")]
    Api { message: String },
}
