use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};

use crate::api::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{CalendarException, NewCalendarException};

const DEFAULT_RANGE_DAYS: i64 = 30;

/// Date-specific overrides of a court's weekly schedule.
pub struct CalendarExceptionsEditor {
    api: Arc<ApiClient>,
    court_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exceptions: Vec<CalendarException>,
}

impl CalendarExceptionsEditor {
    /// Range starts at `today` and spans the next 30 days.
    pub fn new(api: Arc<ApiClient>, court_id: i64, today: NaiveDate) -> Self {
        Self {
            api,
            court_id,
            start: today,
            end: today + Duration::days(DEFAULT_RANGE_DAYS),
            exceptions: Vec::new(),
        }
    }

    pub fn starting_today(api: Arc<ApiClient>, court_id: i64) -> Self {
        Self::new(api, court_id, Local::now().date_naive())
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    pub fn exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }

    pub async fn load(&mut self) -> AppResult<()> {
        self.exceptions = self
            .api
            .calendar_exceptions(self.court_id, self.start, self.end)
            .await?;
        tracing::debug!(
            court_id = self.court_id,
            count = self.exceptions.len(),
            "calendar exceptions loaded"
        );
        Ok(())
    }

    pub async fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> AppResult<()> {
        if start > end {
            return Err(AppError::Validation(format!(
                "range start {start} is after its end {end}"
            )));
        }
        self.start = start;
        self.end = end;
        self.load().await
    }

    pub async fn create(&mut self, draft: NewCalendarException) -> AppResult<()> {
        let exception = validate_draft(draft)?;
        self.api
            .create_calendar_exception(self.court_id, &exception)
            .await?;
        tracing::info!(court_id = self.court_id, date = %exception.date, "calendar exception created");
        self.load().await
    }

    /// Deletes after `confirm` approves. Returns `Ok(false)` when declined;
    /// nothing is sent in that case.
    pub async fn delete<F>(&mut self, exception_id: i64, confirm: F) -> AppResult<bool>
    where
        F: FnOnce(&CalendarException) -> bool,
    {
        let exception = self
            .exceptions
            .iter()
            .find(|e| e.id == exception_id)
            .ok_or_else(|| AppError::NotFound(format!("calendar exception {exception_id}")))?;

        if !confirm(exception) {
            return Ok(false);
        }

        self.api
            .delete_calendar_exception(self.court_id, exception_id)
            .await?;
        tracing::info!(court_id = self.court_id, exception_id, "calendar exception deleted");
        self.load().await?;
        Ok(true)
    }
}

/// Closed days carry no times; open overrides need both times in order.
fn validate_draft(mut draft: NewCalendarException) -> AppResult<NewCalendarException> {
    draft.reason = draft
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    if draft.is_closed {
        draft.open_time = None;
        draft.close_time = None;
        return Ok(draft);
    }

    match (draft.open_time, draft.close_time) {
        (None, None) => Ok(draft),
        (Some(open), Some(close)) if open < close => Ok(draft),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "opening time must be before closing time".to_string(),
        )),
        _ => Err(AppError::Validation(
            "give both an opening and a closing time, or neither".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn draft(closed: bool, open: Option<(u32, u32)>, close: Option<(u32, u32)>) -> NewCalendarException {
        NewCalendarException {
            date: NaiveDate::from_ymd_opt(2025, 12, 24).unwrap(),
            is_closed: closed,
            open_time: open.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            close_time: close.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            reason: Some("  Holiday ".to_string()),
        }
    }

    #[test]
    fn test_closed_day_drops_times() {
        let cleaned = validate_draft(draft(true, Some((9, 0)), Some((12, 0)))).unwrap();
        assert!(cleaned.open_time.is_none());
        assert!(cleaned.close_time.is_none());
        assert_eq!(cleaned.reason.as_deref(), Some("Holiday"));
    }

    #[test]
    fn test_open_override_time_order() {
        assert!(validate_draft(draft(false, Some((9, 0)), Some((12, 0)))).is_ok());
        assert!(validate_draft(draft(false, Some((12, 0)), Some((9, 0)))).is_err());
        assert!(validate_draft(draft(false, Some((9, 0)), None)).is_err());
        assert!(validate_draft(draft(false, None, None)).is_ok());
    }

    #[test]
    fn test_default_range_is_thirty_days() {
        let api = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let editor = CalendarExceptionsEditor::new(Arc::new(api), 3, today);
        assert_eq!(
            editor.range(),
            (today, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap())
        );
    }
}
