use crate::checkout::outcome::{CheckoutOutcome, FailureKind};
use crate::checkout::poller::{PaymentStatusPoller, PollPolicy};
use crate::orders::client::OrderStatusClient;
use crate::orders::error::{OrderClientError, OrderClientResult};
use crate::orders::types::{Order, OrderStatus, Ticket};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Scripted order-status endpoint: returns the queued responses in order and
/// records every query it receives.
struct ScriptedOrders {
    responses: Mutex<VecDeque<OrderClientResult<Order>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedOrders {
    fn new(responses: Vec<OrderClientResult<Order>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl OrderStatusClient for ScriptedOrders {
    async fn fetch_order(&self, order_id: &str) -> OrderClientResult<Order> {
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(order_id.to_string());
        self.responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Err(OrderClientError::Network {
                message: "script exhausted".to_string(),
            }))
    }
}

fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: id.to_string(),
        status,
        tickets: Vec::new(),
        error_message: None,
        created_at: None,
        updated_at: None,
    }
}

fn pending(id: &str) -> OrderClientResult<Order> {
    Ok(order(id, OrderStatus::Pending))
}

fn succeeded_with_tickets(id: &str, count: usize) -> OrderClientResult<Order> {
    let mut ord = order(id, OrderStatus::Succeeded);
    ord.tickets = (0..count)
        .map(|i| Ticket {
            id: format!("tkt_{}", i),
            ticket_code: format!("FP-{:04}", i),
            issued_at: None,
        })
        .collect();
    Ok(ord)
}

fn failed(id: &str, message: Option<&str>) -> OrderClientResult<Order> {
    let mut ord = order(id, OrderStatus::Failed);
    ord.error_message = message.map(String::from);
    Ok(ord)
}

fn transport_error() -> OrderClientResult<Order> {
    Err(OrderClientError::Network {
        message: "connection reset".to_string(),
    })
}

fn poller(orders: Arc<ScriptedOrders>) -> PaymentStatusPoller {
    PaymentStatusPoller::new(orders, PollPolicy::default())
}

fn never_cancelled() -> watch::Receiver<bool> {
    // Dropping the sender immediately: a dead cancellation source must
    // behave like "never cancelled".
    let (_tx, rx) = watch::channel(false);
    rx
}

#[tokio::test(start_paused = true)]
async fn two_pending_then_succeeded_resolves_with_tickets() {
    let orders = ScriptedOrders::new(vec![
        pending("ord_a"),
        pending("ord_a"),
        succeeded_with_tickets("ord_a", 2),
    ]);
    let outcome = poller(orders.clone()).run("ord_a", never_cancelled()).await;

    match outcome {
        CheckoutOutcome::Succeeded { tickets } => assert_eq!(tickets.len(), 2),
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(orders.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_order_surfaces_backend_error_message() {
    let orders = ScriptedOrders::new(vec![failed("ord_b", Some("card_declined"))]);
    let outcome = poller(orders.clone()).run("ord_b", never_cancelled()).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::Failed {
            kind: FailureKind::PaymentFailed,
            message: "card_declined".to_string(),
        }
    );
    assert_eq!(orders.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_order_without_detail_gets_generic_message() {
    let orders = ScriptedOrders::new(vec![failed("ord_b2", None)]);
    let outcome = poller(orders).run("ord_b2", never_cancelled()).await;

    match outcome {
        CheckoutOutcome::Failed { kind, message } => {
            assert_eq!(kind, FailureKind::PaymentFailed);
            assert!(!message.is_empty());
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_order_is_a_cancellation_failure() {
    let orders = ScriptedOrders::new(vec![Ok(order("ord_c", OrderStatus::Cancelled))]);
    let outcome = poller(orders.clone()).run("ord_c", never_cancelled()).await;

    match outcome {
        CheckoutOutcome::Failed { kind, .. } => assert_eq!(kind, FailureKind::PaymentCancelled),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(orders.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn succeeded_without_tickets_is_never_success() {
    let orders = ScriptedOrders::new(vec![succeeded_with_tickets("ord_d", 0)]);
    let outcome = poller(orders).run("ord_d", never_cancelled()).await;

    match outcome {
        CheckoutOutcome::Failed { kind, message } => {
            assert_eq!(kind, FailureKind::DataIntegrity);
            assert!(message.contains("ord_d"));
        }
        other => panic!("expected data-integrity failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn unrecognized_status_is_treated_as_non_terminal() {
    let orders = ScriptedOrders::new(vec![
        Ok(order("ord_e", OrderStatus::Unknown)),
        succeeded_with_tickets("ord_e", 1),
    ]);
    let outcome = poller(orders.clone()).run("ord_e", never_cancelled()).await;

    assert!(matches!(outcome, CheckoutOutcome::Succeeded { .. }));
    assert_eq!(orders.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn transport_errors_are_retried_until_terminal_state() {
    let orders = ScriptedOrders::new(vec![
        transport_error(),
        transport_error(),
        succeeded_with_tickets("ord_f", 1),
    ]);
    let outcome = poller(orders.clone()).run("ord_f", never_cancelled()).await;

    assert!(matches!(outcome, CheckoutOutcome::Succeeded { .. }));
    assert_eq!(orders.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn pending_forever_times_out_after_exact_attempt_budget() {
    let policy = PollPolicy::default();
    let orders = ScriptedOrders::new(
        (0..policy.max_attempts).map(|_| pending("ord_g")).collect(),
    );
    let started = tokio::time::Instant::now();
    let outcome = PaymentStatusPoller::new(orders.clone(), policy.clone())
        .run("ord_g", never_cancelled())
        .await;

    match outcome {
        CheckoutOutcome::Failed { kind, message } => {
            assert_eq!(kind, FailureKind::Timeout);
            assert!(message.contains("ord_g"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(orders.call_count(), policy.max_attempts as usize);
    // Attempts are separated by the interval, with no trailing wait.
    assert_eq!(
        started.elapsed(),
        policy.interval * (policy.max_attempts - 1)
    );
}

#[tokio::test(start_paused = true)]
async fn persistent_transport_failure_escalates_to_timeout() {
    let policy = PollPolicy::default();
    let orders = ScriptedOrders::new(
        (0..policy.max_attempts).map(|_| transport_error()).collect(),
    );
    let outcome = PaymentStatusPoller::new(orders.clone(), policy.clone())
        .run("ord_h", never_cancelled())
        .await;

    match outcome {
        CheckoutOutcome::Failed { kind, .. } => assert_eq!(kind, FailureKind::Timeout),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(orders.call_count(), policy.max_attempts as usize);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_loop_between_attempts() {
    let policy = PollPolicy::default();
    let orders = ScriptedOrders::new(
        (0..policy.max_attempts).map(|_| pending("ord_i")).collect(),
    );
    let (tx, rx) = watch::channel(false);

    let poller = PaymentStatusPoller::new(orders.clone(), policy);
    let handle = tokio::spawn(async move { poller.run("ord_i", rx).await });

    // Three attempts land at t=0s, 2s and 4s; cancel mid-wait after that.
    tokio::time::sleep(Duration::from_millis(4500)).await;
    tx.send(true).expect("poller should still be listening");

    let outcome = handle.await.expect("poller task should not panic");
    assert_eq!(outcome, CheckoutOutcome::Cancelled);
    assert_eq!(orders.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_signal_makes_no_network_calls() {
    let orders = ScriptedOrders::new(vec![pending("ord_j")]);
    let (tx, rx) = watch::channel(true);
    drop(tx);

    let outcome = poller(orders.clone()).run("ord_j", rx).await;
    assert_eq!(outcome, CheckoutOutcome::Cancelled);
    assert_eq!(orders.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn terminal_states_other_than_ticketed_success_never_resolve_success() {
    let scripts: Vec<(&str, OrderClientResult<Order>)> = vec![
        ("ord_k1", failed("ord_k1", Some("declined"))),
        ("ord_k2", Ok(order("ord_k2", OrderStatus::Cancelled))),
        ("ord_k3", succeeded_with_tickets("ord_k3", 0)),
    ];
    for (id, response) in scripts {
        let orders = ScriptedOrders::new(vec![response]);
        let outcome = poller(orders).run(id, never_cancelled()).await;
        assert!(
            matches!(outcome, CheckoutOutcome::Failed { .. }),
            "order {} should fail, got {:?}",
            id,
            outcome
        );
    }
}
