//! Redirect resumption detection.
//!
//! When the provider mandates an out-of-page verification step, the checkout
//! page is reloaded on return with marker query parameters: some written by
//! the provider, some written by this application before redirecting out.
//! Classification and marker consumption happen in one synchronous call so a
//! re-render can never reprocess the same resumption.

use crate::checkout::outcome::redirect_failure_message;

/// Provider-written markers.
pub const PARAM_PAYMENT_INTENT: &str = "payment_intent";
pub const PARAM_CLIENT_SECRET: &str = "payment_intent_client_secret";
pub const PARAM_REDIRECT_STATUS: &str = "redirect_status";

/// Application-written markers.
pub const PARAM_PAYMENT_STATUS: &str = "payment_status";
pub const PARAM_RETURN_FROM_GATEWAY: &str = "return_from_stripe";
pub const PARAM_ORDER_ID: &str = "order_id";

/// Every marker is stripped after classification, regardless of branch.
pub const RESUMPTION_MARKERS: [&str; 6] = [
    PARAM_PAYMENT_INTENT,
    PARAM_CLIENT_SECRET,
    PARAM_REDIRECT_STATUS,
    PARAM_PAYMENT_STATUS,
    PARAM_RETURN_FROM_GATEWAY,
    PARAM_ORDER_ID,
];

/// The navigation context the detector reads from and clears. The snapshot
/// accessor and the removal operation are both synchronous; hosts back this
/// with their URL/history handling.
pub trait NavigationContext {
    fn query_pairs(&self) -> Vec<(String, String)>;
    fn remove_params(&mut self, keys: &[&str]);
}

/// In-memory navigation context for hosts without a real URL bar and for
/// tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigation {
    pairs: Vec<(String, String)>,
}

impl MemoryNavigation {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Parse a raw query string (`a=1&b=2`). Values are taken verbatim;
    /// percent-decoding is the host's concern.
    pub fn from_query_string(query: &str) -> Self {
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (part.to_string(), String::new()),
            })
            .collect();
        Self { pairs }
    }
}

impl NavigationContext for MemoryNavigation {
    fn query_pairs(&self) -> Vec<(String, String)> {
        self.pairs.clone()
    }

    fn remove_params(&mut self, keys: &[&str]) {
        self.pairs.retain(|(k, _)| !keys.contains(&k.as_str()));
    }
}

/// Application intent recorded before redirecting out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumptionIntent {
    Success,
    Cancelled,
}

/// Marker values as found on the navigation context, before classification.
/// Derived once per page load; not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumptionContext {
    pub redirect_status: Option<String>,
    pub intent: Option<ResumptionIntent>,
    pub order_id: Option<String>,
    pub returned_from_gateway: bool,
}

impl ResumptionContext {
    pub fn has_markers(&self) -> bool {
        self.redirect_status.is_some()
            || self.intent.is_some()
            || self.order_id.is_some()
            || self.returned_from_gateway
    }
}

/// Classification of a (re)mount of the checkout view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resumption {
    /// No markers; an ordinary mount.
    None,
    /// The user backed out of the provider's verification step.
    Cancelled,
    /// The redirect reported success; the order still needs verification.
    Succeeded { order_id: Option<String> },
    /// The redirect reported failure.
    Failed { message: String },
    /// Markers present but the status is unclear; verify, don't assume.
    Ambiguous { order_id: Option<String> },
}

/// Pure parse of the marker set out of a query snapshot.
pub fn parse_resumption(pairs: &[(String, String)]) -> ResumptionContext {
    let value_of = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    let intent = match value_of(PARAM_PAYMENT_STATUS).as_deref() {
        Some("success") => Some(ResumptionIntent::Success),
        Some("canceled") | Some("cancelled") => Some(ResumptionIntent::Cancelled),
        _ => None,
    };

    let returned_from_gateway = value_of(PARAM_RETURN_FROM_GATEWAY)
        .map(|v| v == "true")
        .unwrap_or(false)
        || value_of(PARAM_PAYMENT_INTENT).is_some()
        || value_of(PARAM_CLIENT_SECRET).is_some();

    ResumptionContext {
        redirect_status: value_of(PARAM_REDIRECT_STATUS),
        intent,
        order_id: value_of(PARAM_ORDER_ID),
        returned_from_gateway,
    }
}

/// Pure classification of a parsed context.
pub fn classify(context: &ResumptionContext) -> Resumption {
    if !context.has_markers() {
        return Resumption::None;
    }
    if context.intent == Some(ResumptionIntent::Cancelled) {
        return Resumption::Cancelled;
    }
    match context.redirect_status.as_deref() {
        Some("succeeded") => {
            return Resumption::Succeeded {
                order_id: context.order_id.clone(),
            }
        }
        Some("failed") => {
            return Resumption::Failed {
                message: redirect_failure_message(),
            }
        }
        _ => {}
    }
    if context.intent == Some(ResumptionIntent::Success) {
        return Resumption::Succeeded {
            order_id: context.order_id.clone(),
        };
    }
    Resumption::Ambiguous {
        order_id: context.order_id.clone(),
    }
}

/// Read, classify, and strip the markers in one synchronous step. There is
/// no suspension point between the read and the clear, so a second call on
/// the same context observes `Resumption::None`.
///
/// Stripping keys off raw key presence, not off the parse: a marker with a
/// value we don't recognize is still consumed.
pub fn detect_and_consume(nav: &mut dyn NavigationContext) -> Resumption {
    let pairs = nav.query_pairs();
    let any_marker = pairs
        .iter()
        .any(|(k, _)| RESUMPTION_MARKERS.contains(&k.as_str()));
    let context = parse_resumption(&pairs);
    let resumption = classify(&context);
    if any_marker {
        nav.remove_params(&RESUMPTION_MARKERS);
    }
    resumption
}
