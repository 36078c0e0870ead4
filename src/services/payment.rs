//! Checkout session plus status polling, shared by booking deposits, final
//! balance payments and package purchases.
//!
//! Opening the modal creates a checkout session and starts a poll task that
//! asks for the session's status every [`PollSettings::interval`]. The first
//! success status fires the success callback once, then the modal closes by
//! itself after [`PollSettings::close_delay`]. The poll task is owned by the
//! modal and is cancelled on close, on reopen and on drop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::models::{CheckoutTarget, PaymentKind, PaymentSession, PaymentStatus};

#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_checkout(&self, target: &CheckoutTarget) -> AppResult<PaymentSession>;
    async fn payment_status(&self, target: &CheckoutTarget, order_code: &str) -> AppResult<PaymentStatus>;
}

/// Shortest poll period; a zero interval is raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub close_delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            close_delay: Duration::from_secs(2),
        }
    }
}

impl From<&AppConfig> for PollSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            close_delay: config.close_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentEvent {
    Opened(CheckoutTarget),
    SessionReady(PaymentSession),
    StatusChanged(PaymentStatus),
    Succeeded(CheckoutTarget),
    Failed(String),
    Closed,
}

/// Snapshot of what the modal currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentView {
    pub is_open: bool,
    pub target: Option<CheckoutTarget>,
    pub session: Option<PaymentSession>,
    pub status: Option<PaymentStatus>,
    pub error: Option<String>,
    pub succeeded: bool,
}

pub type SuccessCallback = Arc<dyn Fn(CheckoutTarget) + Send + Sync>;

struct Inner {
    generation: u64,
    view: PaymentView,
}

struct Shared {
    inner: Mutex<Inner>,
    events: broadcast::Sender<PaymentEvent>,
    on_success: SuccessCallback,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` only if `generation` is still the live one.
    fn update(&self, generation: u64, f: impl FnOnce(&mut PaymentView)) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        f(&mut inner.view);
        true
    }

    fn emit(&self, event: PaymentEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

pub struct PaymentModal {
    gateway: Arc<dyn CheckoutGateway>,
    settings: PollSettings,
    shared: Arc<Shared>,
    poll: Option<PollTask>,
}

impl PaymentModal {
    pub fn new<F>(gateway: Arc<dyn CheckoutGateway>, settings: PollSettings, on_success: F) -> Self
    where
        F: Fn(CheckoutTarget) + Send + Sync + 'static,
    {
        let (events, _) = broadcast::channel(64);
        Self {
            gateway,
            settings,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    generation: 0,
                    view: PaymentView::default(),
                }),
                events,
                on_success: Arc::new(on_success),
            }),
            poll: None,
        }
    }

    pub fn subscribe(&self) -> BroadcastStream<PaymentEvent> {
        BroadcastStream::new(self.shared.events.subscribe())
    }

    pub fn view(&self) -> PaymentView {
        self.shared.lock().view.clone()
    }

    pub fn is_open(&self) -> bool {
        self.shared.lock().view.is_open
    }

    /// Opens a booking checkout. Without a booking id nothing happens and
    /// `Ok(false)` is returned.
    pub async fn open_booking(&mut self, booking_id: Option<i64>, kind: PaymentKind) -> AppResult<bool> {
        match CheckoutTarget::booking(booking_id, kind) {
            Some(target) => self.open(target).await.map(|_| true),
            None => {
                tracing::debug!(kind = kind.as_str(), "payment requested without booking id");
                Ok(false)
            }
        }
    }

    /// Creates a checkout session for `target` and starts polling its status.
    ///
    /// Any earlier session is torn down first unless it is a live session for
    /// the same target, which is returned as is. A failed checkout creation is
    /// recorded as the modal's error and returned; no polling starts.
    pub async fn open(&mut self, target: CheckoutTarget) -> AppResult<PaymentSession> {
        {
            let inner = self.shared.lock();
            if inner.view.is_open && inner.view.target == Some(target) {
                if let Some(session) = &inner.view.session {
                    return Ok(session.clone());
                }
            }
        }

        self.reset();
        let generation = {
            let mut inner = self.shared.lock();
            inner.view = PaymentView {
                is_open: true,
                target: Some(target),
                ..PaymentView::default()
            };
            inner.generation
        };
        self.shared.emit(PaymentEvent::Opened(target));

        let session = match self.gateway.create_checkout(&target).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(%target, error = %e, "failed to create checkout session");
                let message = e.to_string();
                if self.shared.update(generation, |v| v.error = Some(message.clone())) {
                    self.shared.emit(PaymentEvent::Failed(message));
                }
                return Err(e);
            }
        };

        if session.checkout_url.is_none() {
            tracing::debug!(order_code = %session.order_code, "checkout session has no checkout url");
        }
        tracing::info!(%target, order_code = %session.order_code, "checkout session created");

        if !self
            .shared
            .update(generation, |v| v.session = Some(session.clone()))
        {
            return Ok(session);
        }
        self.shared.emit(PaymentEvent::SessionReady(session.clone()));

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_until_paid(
            Arc::clone(&self.shared),
            Arc::clone(&self.gateway),
            target,
            session.order_code.clone(),
            self.settings,
            generation,
            cancel.clone(),
        ));
        self.poll = Some(PollTask { cancel, handle });

        Ok(session)
    }

    /// Stops polling and clears the session.
    pub fn close(&mut self) {
        let was_open = self.is_open();
        self.reset();
        if was_open {
            self.shared.emit(PaymentEvent::Closed);
        }
    }

    fn reset(&mut self) {
        self.poll = None;
        let mut inner = self.shared.lock();
        inner.generation += 1;
        inner.view = PaymentView::default();
    }
}

async fn poll_until_paid(
    shared: Arc<Shared>,
    gateway: Arc<dyn CheckoutGateway>,
    target: CheckoutTarget,
    order_code: String,
    settings: PollSettings,
    generation: u64,
    cancel: CancellationToken,
) {
    let period = settings.interval.max(MIN_POLL_INTERVAL);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<PaymentStatus> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = gateway.payment_status(&target, &order_code) => result,
        };

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(%order_code, error = %e, "payment status check failed");
                continue;
            }
        };

        if last.as_ref() != Some(&status) {
            if !shared.update(generation, |v| v.status = Some(status.clone())) {
                return;
            }
            shared.emit(PaymentEvent::StatusChanged(status.clone()));
            last = Some(status.clone());
        }

        if status.is_success() {
            break;
        }
    }

    if !shared.update(generation, |v| v.succeeded = true) {
        return;
    }
    tracing::info!(%target, %order_code, "payment confirmed");
    (shared.on_success)(target);
    shared.emit(PaymentEvent::Succeeded(target));

    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(settings.close_delay) => {}
    }

    if shared.update(generation, |v| *v = PaymentView::default()) {
        shared.emit(PaymentEvent::Closed);
    }
}
