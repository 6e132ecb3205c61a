use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative lifecycle status of an order.
///
/// The wire value is an open string; anything the backend sends outside the
/// four known states deserializes to `Unknown`, which the poller treats as
/// non-terminal. An unrecognized status is never a success.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Succeeded => "succeeded",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Terminal states never transition again server-side.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Succeeded | OrderStatus::Failed | OrderStatus::Cancelled
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "succeeded" => OrderStatus::Succeeded,
            "failed" => OrderStatus::Failed,
            "cancelled" | "canceled" => OrderStatus::Cancelled,
            _ => OrderStatus::Unknown,
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Ticket issued once payment is captured. Only the fields the checkout
/// flow needs; inventory detail lives server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub ticket_code: String,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Server-side record of one checkout attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    pub error_message: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
