use serde::{Deserialize, Serialize};

use super::catalog::Tier;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub court_id: Option<i64>,
    #[serde(default)]
    pub slot_ids: Vec<i64>,
    #[serde(default)]
    pub booking_type: Option<Tier>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub deposit_required: bool,
    #[serde(default)]
    pub deposit_amount: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub court_name: Option<String>,
    #[serde(default)]
    pub facility_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub has_review: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "confirmed")]
    Confirmed,
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "cancelled", alias = "Canceled")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Unknown => "Unknown",
        }
    }
}

/// What the user may do with a booking in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingActions {
    pub pay_deposit: bool,
    pub pay_balance: bool,
    pub review: bool,
}

impl Booking {
    pub fn actions(&self) -> BookingActions {
        BookingActions {
            pay_deposit: self.status == BookingStatus::Pending,
            pay_balance: matches!(
                self.status,
                BookingStatus::Confirmed | BookingStatus::Completed
            ),
            review: self.status == BookingStatus::Completed && !self.has_review,
        }
    }

    pub fn label(&self) -> String {
        let place = match (&self.facility_name, &self.court_name) {
            (Some(f), Some(c)) => format!("{f} / {c}"),
            (Some(f), None) => f.clone(),
            (None, Some(c)) => c.clone(),
            (None, None) => format!("court {}", self.court_id.unwrap_or_default()),
        };
        match &self.date {
            Some(date) => format!("#{} {place} on {date}", self.id),
            None => format!("#{} {place}", self.id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub court_id: i64,
    pub slot_ids: Vec<i64>,
    pub booking_type: Tier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub status: BookingStatus,
    #[serde(default)]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BookingCreated {
    /// Booking id that must be paid as a deposit before the booking is held.
    pub fn deposit_due(&self) -> Option<i64> {
        match self.status {
            BookingStatus::Pending => self.booking_id,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus, has_review: bool) -> Booking {
        Booking {
            id: 1,
            court_id: Some(7),
            slot_ids: vec![42],
            booking_type: Some(Tier::Normal),
            total_amount: 200.0,
            deposit_required: true,
            deposit_amount: 60.0,
            status,
            court_name: None,
            facility_name: None,
            date: None,
            has_review,
        }
    }

    #[test]
    fn test_pending_allows_deposit_only() {
        let actions = booking(BookingStatus::Pending, false).actions();
        assert_eq!(
            actions,
            BookingActions {
                pay_deposit: true,
                pay_balance: false,
                review: false
            }
        );
    }

    #[test]
    fn test_confirmed_allows_balance() {
        let actions = booking(BookingStatus::Confirmed, false).actions();
        assert!(actions.pay_balance);
        assert!(!actions.pay_deposit);
        assert!(!actions.review);
    }

    #[test]
    fn test_completed_allows_single_review() {
        assert!(booking(BookingStatus::Completed, false).actions().review);
        assert!(!booking(BookingStatus::Completed, true).actions().review);
        assert!(booking(BookingStatus::Completed, true).actions().pay_balance);
    }

    #[test]
    fn test_cancelled_allows_nothing() {
        assert_eq!(
            booking(BookingStatus::Cancelled, false).actions(),
            BookingActions::default()
        );
    }

    #[test]
    fn test_unknown_status_decodes() {
        let created: BookingCreated =
            serde_json::from_str(r#"{"status":"OnHold","bookingId":5}"#).unwrap();
        assert_eq!(created.status, BookingStatus::Unknown);
        assert_eq!(created.deposit_due(), None);
    }

    #[test]
    fn test_deposit_due_requires_id() {
        let created: BookingCreated =
            serde_json::from_str(r#"{"status":"Pending","bookingId":99}"#).unwrap();
        assert_eq!(created.deposit_due(), Some(99));

        let created: BookingCreated = serde_json::from_str(r#"{"status":"Pending"}"#).unwrap();
        assert_eq!(created.deposit_due(), None);
    }

    #[test]
    fn test_create_request_wire_shape() {
        let req = CreateBookingRequest {
            court_id: 7,
            slot_ids: vec![42],
            booking_type: Tier::Normal,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"courtId": 7, "slotIds": [42], "bookingType": "Normal"})
        );
    }
}
