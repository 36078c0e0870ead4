use std::sync::Arc;

use chrono::NaiveTime;

use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{DEFAULT_CLOSE, DEFAULT_OPEN};
use crate::models::{DayOfWeek, OperatingHour};

/// Weekly schedule editor for one court. Edits stay local until [`save`](Self::save).
pub struct OperatingHoursEditor {
    api: Arc<ApiClient>,
    court_id: i64,
    hours: Vec<OperatingHour>,
    configured: bool,
    dirty: bool,
}

impl OperatingHoursEditor {
    pub fn new(api: Arc<ApiClient>, court_id: i64) -> Self {
        Self {
            api,
            court_id,
            hours: OperatingHour::default_week(),
            configured: false,
            dirty: false,
        }
    }

    pub fn hours(&self) -> &[OperatingHour] {
        &self.hours
    }

    pub fn day(&self, day: DayOfWeek) -> Option<&OperatingHour> {
        self.hours.iter().find(|h| h.day_of_week == day)
    }

    /// False when the backend had no schedule and the default week is shown.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub async fn load(&mut self) -> AppResult<()> {
        match self.api.operating_hours(self.court_id).await? {
            Some(hours) => {
                if hours.len() != DayOfWeek::ALL.len() {
                    tracing::warn!(
                        court_id = self.court_id,
                        count = hours.len(),
                        "operating hours do not cover the whole week"
                    );
                }
                self.hours = normalize_week(hours);
                self.configured = true;
            }
            None => {
                tracing::info!(court_id = self.court_id, "no operating hours configured, using defaults");
                self.hours = OperatingHour::default_week();
                self.configured = false;
            }
        }
        self.dirty = false;
        Ok(())
    }

    /// Closing clears the day's times; reopening always restores 08:00-20:00.
    pub fn set_closed(&mut self, day: DayOfWeek, closed: bool) {
        let entry = self.entry_mut(day);
        entry.is_closed = closed;
        if closed {
            entry.open_time = None;
            entry.close_time = None;
        } else {
            entry.open_time = Some(DEFAULT_OPEN);
            entry.close_time = Some(DEFAULT_CLOSE);
        }
        self.dirty = true;
    }

    /// Sets custom times, reopening the day if it was closed.
    pub fn set_times(&mut self, day: DayOfWeek, open: NaiveTime, close: NaiveTime) -> AppResult<()> {
        if open >= close {
            return Err(AppError::Validation(format!(
                "{day}: opening time {open} must be before closing time {close}"
            )));
        }
        let entry = self.entry_mut(day);
        entry.is_closed = false;
        entry.open_time = Some(open);
        entry.close_time = Some(close);
        self.dirty = true;
        Ok(())
    }

    pub async fn save(&mut self) -> AppResult<()> {
        for hour in self.hours.iter().filter(|h| !h.is_closed) {
            match (hour.open_time, hour.close_time) {
                (Some(open), Some(close)) if open < close => {}
                _ => {
                    return Err(AppError::Validation(format!(
                        "{} needs an opening time before its closing time",
                        hour.day_of_week
                    )))
                }
            }
        }

        self.api.save_operating_hours(self.court_id, &self.hours).await?;
        tracing::info!(court_id = self.court_id, "operating hours saved");
        self.configured = true;
        self.dirty = false;
        Ok(())
    }

    /// Deletes the stored schedule and reloads, which falls back to the default week.
    pub async fn reset(&mut self) -> AppResult<()> {
        self.api.clear_operating_hours(self.court_id).await?;
        self.load().await
    }

    fn entry_mut(&mut self, day: DayOfWeek) -> &mut OperatingHour {
        let index = match self.hours.iter().position(|h| h.day_of_week == day) {
            Some(index) => index,
            None => {
                self.hours.push(OperatingHour::default_for(day));
                self.hours.sort_by_key(|h| h.day_of_week);
                self.hours
                    .iter()
                    .position(|h| h.day_of_week == day)
                    .unwrap_or_default()
            }
        };
        &mut self.hours[index]
    }
}

/// One entry per day, Monday first. Missing days get the default hours.
pub fn normalize_week(hours: Vec<OperatingHour>) -> Vec<OperatingHour> {
    DayOfWeek::ALL
        .into_iter()
        .map(|day| {
            hours
                .iter()
                .rev()
                .find(|h| h.day_of_week == day)
                .cloned()
                .unwrap_or_else(|| OperatingHour::default_for(day))
        })
        .collect()
}
