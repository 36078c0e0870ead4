use chrono::NaiveDate;
use reqwest::Method;

use super::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::models::{CalendarException, NewCalendarException, OperatingHour};

impl ApiClient {
    /// `Ok(None)` when the court has no schedule configured yet (404).
    pub async fn operating_hours(&self, court_id: i64) -> AppResult<Option<Vec<OperatingHour>>> {
        let path = format!("provider/courts/{court_id}/operating-hours");
        match Self::send_json(self.request(Method::GET, &path)).await {
            Ok(hours) => Ok(Some(hours)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save_operating_hours(&self, court_id: i64, hours: &[OperatingHour]) -> AppResult<()> {
        let path = format!("provider/courts/{court_id}/operating-hours/bulk");
        let req = self.request(Method::PUT, &path).json(hours);
        Self::send_empty(req).await
    }

    pub async fn clear_operating_hours(&self, court_id: i64) -> AppResult<()> {
        let path = format!("provider/courts/{court_id}/operating-hours");
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn calendar_exceptions(
        &self,
        court_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CalendarException>> {
        let path = format!("provider/courts/{court_id}/calendar-exceptions");
        let req = self.request(Method::GET, &path).query(&[
            ("startDate", start.format("%Y-%m-%d").to_string()),
            ("endDate", end.format("%Y-%m-%d").to_string()),
        ]);
        Self::send_json(req).await
    }

    pub async fn create_calendar_exception(
        &self,
        court_id: i64,
        exception: &NewCalendarException,
    ) -> AppResult<()> {
        let path = format!("provider/courts/{court_id}/calendar-exceptions");
        let req = self.request(Method::POST, &path).json(exception);
        Self::send_empty(req).await
    }

    pub async fn delete_calendar_exception(&self, court_id: i64, exception_id: i64) -> AppResult<()> {
        let path = format!("provider/courts/{court_id}/calendar-exceptions/{exception_id}");
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }
}
