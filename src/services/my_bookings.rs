use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingActions, CheckoutTarget, NewReview, PaymentKind};
use crate::services::request_guard::RequestGuard;

#[derive(Debug, Clone, Default)]
pub struct MyBookingsView {
    pub bookings: Vec<Booking>,
    pub date_filter: Option<NaiveDate>,
    pub expanded: BTreeSet<i64>,
    pub details: HashMap<i64, Booking>,
    pub loading: bool,
    pub error: Option<String>,
}

impl MyBookingsView {
    /// Detail if loaded, otherwise the list entry.
    pub fn booking(&self, booking_id: i64) -> Option<&Booking> {
        self.details
            .get(&booking_id)
            .or_else(|| self.bookings.iter().find(|b| b.id == booking_id))
    }
}

struct State {
    view: MyBookingsView,
    list_req: RequestGuard,
}

pub struct MyBookings {
    api: Arc<ApiClient>,
    state: Mutex<State>,
}

impl MyBookings {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: Mutex::new(State {
                view: MyBookingsView::default(),
                list_req: RequestGuard::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> MyBookingsView {
        self.lock().view.clone()
    }

    pub async fn set_date_filter(&self, date: Option<NaiveDate>) -> AppResult<()> {
        self.lock().view.date_filter = date;
        self.refresh().await
    }

    pub async fn refresh(&self) -> AppResult<()> {
        let (ticket, date) = {
            let mut state = self.lock();
            state.view.loading = true;
            state.view.error = None;
            (state.list_req.issue(), state.view.date_filter)
        };

        let result = self.api.my_bookings(date).await;

        let mut state = self.lock();
        if !state.list_req.is_current(ticket) {
            tracing::debug!("discarding superseded booking list");
            return Ok(());
        }
        state.view.loading = false;
        match result {
            Ok(bookings) => {
                state.view.bookings = bookings;
                state.view.details.clear();
                state.view.expanded.clear();
                Ok(())
            }
            Err(e) => {
                state.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Expands or collapses a booking. Detail is fetched on first expand and
    /// kept until the list is refreshed.
    pub async fn toggle_expand(&self, booking_id: i64) -> AppResult<Option<Booking>> {
        {
            let mut state = self.lock();
            if state.view.expanded.remove(&booking_id) {
                return Ok(None);
            }
            state.view.expanded.insert(booking_id);
            if let Some(detail) = state.view.details.get(&booking_id) {
                return Ok(Some(detail.clone()));
            }
        }

        match self.api.booking_detail(booking_id).await {
            Ok(detail) => {
                self.lock().view.details.insert(booking_id, detail.clone());
                Ok(Some(detail))
            }
            Err(e) => {
                let mut state = self.lock();
                state.view.expanded.remove(&booking_id);
                state.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn actions(&self, booking_id: i64) -> Option<BookingActions> {
        self.lock().view.booking(booking_id).map(Booking::actions)
    }

    /// Checkout target for a payment the booking currently allows.
    pub fn payment_target(&self, booking_id: i64, kind: PaymentKind) -> AppResult<CheckoutTarget> {
        let actions = self
            .actions(booking_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        let allowed = match kind {
            PaymentKind::Deposit => actions.pay_deposit,
            PaymentKind::Final => actions.pay_balance,
        };
        if !allowed {
            return Err(AppError::Validation(format!(
                "booking {booking_id} does not accept a {} payment now",
                kind.as_str()
            )));
        }
        Ok(CheckoutTarget::Booking { booking_id, kind })
    }

    pub async fn submit_review(&self, booking_id: i64, rating: u8, comment: Option<String>) -> AppResult<()> {
        let actions = self
            .actions(booking_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        if !actions.review {
            return Err(AppError::Validation(format!(
                "booking {booking_id} cannot be reviewed"
            )));
        }
        let review = NewReview::new(booking_id, rating, comment)?;

        if let Err(e) = self.api.submit_review(&review).await {
            self.lock().view.error = Some(e.to_string());
            return Err(e);
        }
        tracing::info!(booking_id, rating, "review submitted");

        let mut state = self.lock();
        let view = &mut state.view;
        for booking in view.bookings.iter_mut().filter(|b| b.id == booking_id) {
            booking.has_review = true;
        }
        if let Some(detail) = view.details.get_mut(&booking_id) {
            detail.has_review = true;
        }
        Ok(())
    }
}
