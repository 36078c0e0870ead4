use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use courtside::errors::{AppError, AppResult};
use courtside::models::{CheckoutTarget, PaymentKind, PaymentSession, PaymentStatus};
use courtside::services::payment::{CheckoutGateway, PaymentEvent, PaymentModal, PaymentView, PollSettings};

// ── Mock Gateway ──

enum Reply {
    Status(PaymentStatus),
    Error,
}

#[derive(Default)]
struct ScriptedGateway {
    replies: Mutex<VecDeque<Reply>>,
    fail_checkout: bool,
    checkouts: Mutex<Vec<CheckoutTarget>>,
    polled: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn with_replies(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn pending_forever() -> Arc<Self> {
        Self::with_replies(vec![])
    }

    fn status_calls(&self) -> usize {
        self.polled.lock().unwrap().len()
    }

    fn checkout_calls(&self) -> usize {
        self.checkouts.lock().unwrap().len()
    }
}

fn order_code(target: &CheckoutTarget) -> String {
    match target {
        CheckoutTarget::Booking { booking_id, kind } => format!("ORD-{booking_id}-{}", kind.as_str()),
        CheckoutTarget::Package { package_id } => format!("ORD-PKG-{package_id}"),
    }
}

#[async_trait]
impl CheckoutGateway for ScriptedGateway {
    async fn create_checkout(&self, target: &CheckoutTarget) -> AppResult<PaymentSession> {
        self.checkouts.lock().unwrap().push(*target);
        if self.fail_checkout {
            return Err(AppError::Api {
                status: 400,
                message: "Booking is not awaiting payment".to_string(),
            });
        }
        Ok(PaymentSession {
            order_code: order_code(target),
            checkout_url: None,
            qr_code: None,
        })
    }

    async fn payment_status(&self, _target: &CheckoutTarget, order_code: &str) -> AppResult<PaymentStatus> {
        self.polled.lock().unwrap().push(order_code.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Status(status)) => Ok(status),
            Some(Reply::Error) => Err(AppError::Api {
                status: 502,
                message: "gateway timeout".to_string(),
            }),
            None => Ok(PaymentStatus::Pending),
        }
    }
}

// ── Helpers ──

fn deposit(booking_id: i64) -> CheckoutTarget {
    CheckoutTarget::Booking {
        booking_id,
        kind: PaymentKind::Deposit,
    }
}

fn modal_with(gateway: Arc<ScriptedGateway>) -> (PaymentModal, Arc<AtomicUsize>) {
    let successes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&successes);
    let modal = PaymentModal::new(gateway, PollSettings::default(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (modal, successes)
}

async fn next_event(events: &mut BroadcastStream<PaymentEvent>) -> PaymentEvent {
    events
        .next()
        .await
        .expect("event stream ended")
        .expect("event stream lagged")
}

async fn wait_for(events: &mut BroadcastStream<PaymentEvent>, wanted: fn(&PaymentEvent) -> bool) -> Instant {
    loop {
        let event = next_event(events).await;
        if wanted(&event) {
            return Instant::now();
        }
    }
}

// ── Polling ──

#[tokio::test(start_paused = true)]
async fn test_success_fires_callback_once_then_closes_after_delay() {
    let gateway = ScriptedGateway::with_replies(vec![
        Reply::Status(PaymentStatus::Pending),
        Reply::Status(PaymentStatus::Pending),
        Reply::Status(PaymentStatus::Paid),
    ]);
    let (mut modal, successes) = modal_with(Arc::clone(&gateway));
    let mut events = modal.subscribe();

    let opened_at = Instant::now();
    let session = modal.open(deposit(99)).await.unwrap();
    assert_eq!(session.order_code, "ORD-99-deposit");
    assert!(modal.is_open());

    let succeeded_at = wait_for(&mut events, |e| matches!(e, PaymentEvent::Succeeded(_))).await;
    assert_eq!(succeeded_at - opened_at, Duration::from_secs(9));
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert!(modal.view().succeeded);

    let closed_at = wait_for(&mut events, |e| *e == PaymentEvent::Closed).await;
    assert_eq!(closed_at - succeeded_at, Duration::from_secs(2));
    assert!(!modal.is_open());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(gateway.status_calls(), 3);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_status_changes_reported_once_per_change() {
    let gateway = ScriptedGateway::with_replies(vec![
        Reply::Status(PaymentStatus::Pending),
        Reply::Status(PaymentStatus::Pending),
        Reply::Status(PaymentStatus::Recognized),
    ]);
    let (mut modal, _) = modal_with(gateway);
    let mut events = modal.subscribe();
    modal.open(deposit(5)).await.unwrap();

    let mut seen = Vec::new();
    loop {
        match next_event(&mut events).await {
            PaymentEvent::StatusChanged(status) => seen.push(status),
            PaymentEvent::Closed => break,
            _ => {}
        }
    }
    assert_eq!(seen, vec![PaymentStatus::Pending, PaymentStatus::Recognized]);
}

#[tokio::test(start_paused = true)]
async fn test_poll_errors_and_failed_status_keep_polling() {
    let gateway = ScriptedGateway::with_replies(vec![
        Reply::Error,
        Reply::Status(PaymentStatus::Failed),
        Reply::Error,
        Reply::Status(PaymentStatus::Success),
    ]);
    let (mut modal, successes) = modal_with(Arc::clone(&gateway));
    let mut events = modal.subscribe();
    modal.open(deposit(12)).await.unwrap();

    wait_for(&mut events, |e| matches!(e, PaymentEvent::Succeeded(_))).await;
    assert_eq!(gateway.status_calls(), 4);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_polling() {
    let gateway = ScriptedGateway::pending_forever();
    let (mut modal, successes) = modal_with(Arc::clone(&gateway));
    modal.open(deposit(3)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(gateway.status_calls(), 2);

    modal.close();
    assert!(!modal.is_open());
    assert_eq!(modal.view(), PaymentView::default());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(gateway.status_calls(), 2);
    assert_eq!(successes.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_modal_stops_polling() {
    let gateway = ScriptedGateway::pending_forever();
    let (mut modal, _) = modal_with(Arc::clone(&gateway));
    modal.open(deposit(3)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(gateway.status_calls(), 1);

    drop(modal);
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(gateway.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_for_another_booking_polls_new_order_only() {
    let gateway = ScriptedGateway::pending_forever();
    let (mut modal, _) = modal_with(Arc::clone(&gateway));
    modal.open(deposit(1)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    let before = gateway.status_calls();
    assert_eq!(before, 1);

    let target = CheckoutTarget::Booking {
        booking_id: 2,
        kind: PaymentKind::Final,
    };
    let session = modal.open(target).await.unwrap();
    assert_eq!(session.order_code, "ORD-2-final");
    assert_eq!(modal.view().target, Some(target));

    tokio::time::sleep(Duration::from_secs(10)).await;
    let polled = gateway.polled.lock().unwrap().clone();
    assert!(polled.len() > before);
    assert!(polled[..before].iter().all(|c| c == "ORD-1-deposit"));
    assert!(polled[before..].iter().all(|c| c == "ORD-2-final"));
}

#[tokio::test(start_paused = true)]
async fn test_reopen_same_target_reuses_session() {
    let gateway = ScriptedGateway::pending_forever();
    let (mut modal, _) = modal_with(Arc::clone(&gateway));

    let first = modal.open(deposit(8)).await.unwrap();
    let second = modal.open(deposit(8)).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(gateway.checkout_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_zero_interval_still_polls_to_success() {
    let gateway = ScriptedGateway::with_replies(vec![Reply::Status(PaymentStatus::Paid)]);
    let successes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&successes);
    let settings = PollSettings {
        interval: Duration::ZERO,
        close_delay: Duration::from_millis(10),
    };
    let mut modal = PaymentModal::new(Arc::<ScriptedGateway>::clone(&gateway), settings, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut events = modal.subscribe();
    modal.open(deposit(21)).await.unwrap();

    wait_for(&mut events, |e| *e == PaymentEvent::Closed).await;
    assert_eq!(gateway.status_calls(), 1);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert!(!modal.is_open());
}

// ── Opening ──

#[tokio::test(start_paused = true)]
async fn test_checkout_failure_surfaces_error_without_polling() {
    let gateway = Arc::new(ScriptedGateway {
        fail_checkout: true,
        ..ScriptedGateway::default()
    });
    let (mut modal, _) = modal_with(Arc::clone(&gateway));
    let mut events = modal.subscribe();

    let err = modal.open(deposit(4)).await.unwrap_err();
    assert_eq!(err.to_string(), "Booking is not awaiting payment");

    let view = modal.view();
    assert!(view.is_open);
    assert!(view.session.is_none());
    assert_eq!(view.error.as_deref(), Some("Booking is not awaiting payment"));

    assert_eq!(next_event(&mut events).await, PaymentEvent::Opened(deposit(4)));
    assert_eq!(
        next_event(&mut events).await,
        PaymentEvent::Failed("Booking is not awaiting payment".to_string())
    );

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(gateway.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_open_without_booking_id_is_a_noop() {
    let gateway = ScriptedGateway::pending_forever();
    let (mut modal, _) = modal_with(Arc::clone(&gateway));

    let opened = modal.open_booking(None, PaymentKind::Deposit).await.unwrap();
    assert!(!opened);
    assert!(!modal.is_open());
    assert_eq!(gateway.checkout_calls(), 0);

    let opened = modal.open_booking(Some(6), PaymentKind::Deposit).await.unwrap();
    assert!(opened);
    assert_eq!(gateway.checkout_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_package_checkout_uses_package_order() {
    let gateway = ScriptedGateway::with_replies(vec![Reply::Status(PaymentStatus::Completed)]);
    let (mut modal, successes) = modal_with(Arc::clone(&gateway));
    let mut events = modal.subscribe();

    let target = CheckoutTarget::Package { package_id: 3 };
    let session = modal.open(target).await.unwrap();
    assert_eq!(session.order_code, "ORD-PKG-3");
    assert!(session.checkout_url.is_none());

    wait_for(&mut events, |e| *e == PaymentEvent::Closed).await;
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.polled.lock().unwrap().as_slice(), ["ORD-PKG-3"]);
}
