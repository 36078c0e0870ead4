//! Facility → court → slot booking wizard.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::api::{ApiClient, FacilityQuery};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::parse_date;
use crate::models::{BookingCreated, Court, CreateBookingRequest, Facility, Slot, SportType, Tier};
use crate::services::request_guard::RequestGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Facility,
    Court,
    Slot,
}

#[derive(Debug, Clone)]
pub struct WizardView {
    pub step: WizardStep,
    pub filters: FacilityQuery,
    pub sport_types: Vec<SportType>,
    pub facilities: Vec<Facility>,
    pub selected_facility: Option<Facility>,
    pub courts: Vec<Court>,
    pub selected_court: Option<Court>,
    pub slots: Vec<Slot>,
    pub pending_slot: Option<Slot>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotSelection {
    /// The slot is free; the booking goes out once confirmed.
    NeedsConfirmation(Slot),
    AlreadyBooked,
    NotFound,
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub created: BookingCreated,
    /// Set when the new booking is pending a deposit.
    pub deposit_booking_id: Option<i64>,
}

struct WizardState {
    view: WizardView,
    facilities_req: RequestGuard,
    courts_req: RequestGuard,
    slots_req: RequestGuard,
}

pub struct BookingWizard {
    api: Arc<ApiClient>,
    state: Mutex<WizardState>,
}

impl BookingWizard {
    /// Starts on the facility step with no sport filter and the normal tier.
    pub fn new(api: Arc<ApiClient>, date: NaiveDate) -> Self {
        Self::with_filters(
            api,
            FacilityQuery {
                sport_type_id: None,
                date,
                tier: Tier::Normal,
            },
        )
    }

    pub fn with_filters(api: Arc<ApiClient>, filters: FacilityQuery) -> Self {
        Self {
            api,
            state: Mutex::new(WizardState {
                view: WizardView {
                    step: WizardStep::Facility,
                    filters,
                    sport_types: Vec::new(),
                    facilities: Vec::new(),
                    selected_facility: None,
                    courts: Vec::new(),
                    selected_court: None,
                    slots: Vec::new(),
                    pending_slot: None,
                    loading: false,
                    error: None,
                },
                facilities_req: RequestGuard::default(),
                courts_req: RequestGuard::default(),
                slots_req: RequestGuard::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn view(&self) -> WizardView {
        self.lock().view.clone()
    }

    pub async fn load_sport_types(&self) -> AppResult<Vec<SportType>> {
        let sport_types = self.api.sport_types().await?;
        self.lock().view.sport_types = sport_types.clone();
        Ok(sport_types)
    }

    pub async fn set_sport_type(&self, sport_type_id: Option<i64>) -> AppResult<()> {
        let step = {
            let mut state = self.lock();
            state.view.filters.sport_type_id = sport_type_id;
            state.view.step
        };
        self.refetch_after_filter_change(step, false).await
    }

    pub async fn set_date(&self, date: NaiveDate) -> AppResult<()> {
        let step = {
            let mut state = self.lock();
            state.view.filters.date = date;
            state.view.step
        };
        self.refetch_after_filter_change(step, true).await
    }

    /// Same as [`set_date`](Self::set_date) for a `YYYY-MM-DD` string.
    pub async fn set_date_iso(&self, date: &str) -> AppResult<()> {
        let date = parse_date(date).map_err(AppError::Validation)?;
        self.set_date(date).await
    }

    pub async fn set_tier(&self, tier: Tier) -> AppResult<()> {
        let step = {
            let mut state = self.lock();
            state.view.filters.tier = tier;
            state.view.step
        };
        self.refetch_after_filter_change(step, true).await
    }

    async fn refetch_after_filter_change(&self, step: WizardStep, affects_slots: bool) -> AppResult<()> {
        match step {
            WizardStep::Facility => self.load_facilities().await,
            WizardStep::Slot if affects_slots => self.reload_slots().await,
            _ => Ok(()),
        }
    }

    pub async fn load_facilities(&self) -> AppResult<()> {
        let (ticket, query) = {
            let mut state = self.lock();
            state.view.loading = true;
            state.view.error = None;
            (state.facilities_req.issue(), state.view.filters.clone())
        };

        let result = self.api.search_facilities(&query).await;

        let mut state = self.lock();
        if !state.facilities_req.is_current(ticket) {
            tracing::debug!("discarding superseded facility search");
            return Ok(());
        }
        state.view.loading = false;
        match result {
            Ok(facilities) => {
                tracing::debug!(count = facilities.len(), "facilities loaded");
                state.view.facilities = facilities;
                Ok(())
            }
            Err(e) => {
                state.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn select_facility(&self, facility_id: i64) -> AppResult<()> {
        let ticket = {
            let mut state = self.lock();
            let facility = state
                .view
                .facilities
                .iter()
                .find(|f| f.id == facility_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("facility {facility_id}")))?;

            let view = &mut state.view;
            view.step = WizardStep::Court;
            view.selected_facility = Some(facility);
            view.courts.clear();
            view.selected_court = None;
            view.slots.clear();
            view.pending_slot = None;
            view.loading = true;
            view.error = None;
            state.facilities_req.invalidate();
            state.slots_req.invalidate();
            state.courts_req.issue()
        };

        let result = self.api.facility_courts(facility_id).await;

        let mut state = self.lock();
        if !state.courts_req.is_current(ticket) {
            tracing::debug!(facility_id, "discarding superseded court list");
            return Ok(());
        }
        state.view.loading = false;
        match result {
            Ok(courts) => {
                state.view.courts = courts;
                Ok(())
            }
            Err(e) => {
                state.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn select_court(&self, court_id: i64) -> AppResult<()> {
        {
            let mut state = self.lock();
            if state.view.step == WizardStep::Facility {
                return Err(AppError::Validation("select a facility first".to_string()));
            }
            let court = state
                .view
                .courts
                .iter()
                .find(|c| c.id == court_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("court {court_id}")))?;

            state.view.step = WizardStep::Slot;
            state.view.selected_court = Some(court);
        }
        self.reload_slots().await
    }

    /// Fetches slots for the selected court with the current date and tier.
    pub async fn reload_slots(&self) -> AppResult<()> {
        let (ticket, court_id, date, tier) = {
            let mut state = self.lock();
            let court_id = state
                .view
                .selected_court
                .as_ref()
                .map(|c| c.id)
                .ok_or_else(|| AppError::Validation("select a court first".to_string()))?;
            state.view.slots.clear();
            state.view.pending_slot = None;
            state.view.loading = true;
            state.view.error = None;
            let filters = &state.view.filters;
            let (date, tier) = (filters.date, filters.tier);
            (state.slots_req.issue(), court_id, date, tier)
        };

        let result = self.api.court_slots(court_id, date, tier).await;

        let mut state = self.lock();
        if !state.slots_req.is_current(ticket) {
            tracing::debug!(court_id, "discarding superseded slot list");
            return Ok(());
        }
        state.view.loading = false;
        match result {
            Ok(slots) => {
                state.view.slots = slots;
                Ok(())
            }
            Err(e) => {
                state.view.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Booked slots are refused outright; a free slot waits for
    /// [`confirm_booking`](Self::confirm_booking).
    pub fn select_slot(&self, slot_id: i64) -> SlotSelection {
        let mut state = self.lock();
        let Some(slot) = state.view.slots.iter().find(|s| s.id == slot_id).cloned() else {
            state.view.pending_slot = None;
            return SlotSelection::NotFound;
        };
        if slot.is_booked {
            tracing::debug!(slot_id, "slot already booked");
            state.view.pending_slot = None;
            return SlotSelection::AlreadyBooked;
        }
        state.view.pending_slot = Some(slot.clone());
        SlotSelection::NeedsConfirmation(slot)
    }

    pub fn cancel_confirmation(&self) {
        self.lock().view.pending_slot = None;
    }

    pub async fn confirm_booking(&self) -> AppResult<BookingOutcome> {
        let request = {
            let state = self.lock();
            let view = &state.view;
            match (&view.selected_court, &view.pending_slot) {
                (Some(court), Some(slot)) => CreateBookingRequest {
                    court_id: court.id,
                    slot_ids: vec![slot.id],
                    booking_type: view.filters.tier,
                },
                _ => {
                    return Err(AppError::Validation(
                        "no slot awaiting confirmation".to_string(),
                    ))
                }
            }
        };

        let created = match self.api.create_booking(&request).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(court_id = request.court_id, error = %e, "booking failed");
                self.lock().view.error = Some(e.to_string());
                return Err(e);
            }
        };
        tracing::info!(
            court_id = request.court_id,
            booking_id = ?created.booking_id,
            status = created.status.as_str(),
            "booking created"
        );

        self.lock().view.pending_slot = None;
        if let Err(e) = self.reload_slots().await {
            tracing::warn!(error = %e, "failed to refresh slots after booking");
        }

        Ok(BookingOutcome {
            deposit_booking_id: created.deposit_due(),
            created,
        })
    }

    /// Steps back once, dropping whatever the left step made invalid.
    pub fn back(&self) {
        let mut state = self.lock();
        match state.view.step {
            WizardStep::Facility => {}
            WizardStep::Court => {
                state.courts_req.invalidate();
                state.slots_req.invalidate();
                let view = &mut state.view;
                view.step = WizardStep::Facility;
                view.selected_facility = None;
                view.courts.clear();
                view.selected_court = None;
                view.slots.clear();
                view.pending_slot = None;
                view.loading = false;
            }
            WizardStep::Slot => {
                state.slots_req.invalidate();
                let view = &mut state.view;
                view.step = WizardStep::Court;
                view.selected_court = None;
                view.slots.clear();
                view.pending_slot = None;
                view.loading = false;
            }
        }
    }
}
