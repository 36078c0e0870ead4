use chrono::NaiveDate;
use reqwest::Method;

use super::{backend_date, ApiClient};
use crate::errors::AppResult;
use crate::models::{Booking, BookingCreated, CreateBookingRequest, NewReview};

impl ApiClient {
    pub async fn create_booking(&self, body: &CreateBookingRequest) -> AppResult<BookingCreated> {
        let req = self.request(Method::POST, "Bookings").json(body);
        Self::send_json(req).await
    }

    pub async fn my_bookings(&self, date: Option<NaiveDate>) -> AppResult<Vec<Booking>> {
        let mut req = self.request(Method::GET, "Bookings");
        if let Some(date) = date {
            req = req.query(&[("date", backend_date(date))]);
        }
        Self::send_json(req).await
    }

    pub async fn booking_detail(&self, booking_id: i64) -> AppResult<Booking> {
        let path = format!("Bookings/{booking_id}");
        Self::send_json(self.request(Method::GET, &path)).await
    }

    pub async fn submit_review(&self, review: &NewReview) -> AppResult<()> {
        let req = self.request(Method::POST, "reviews").json(review);
        Self::send_empty(req).await
    }
}
