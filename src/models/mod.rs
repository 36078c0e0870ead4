pub mod booking;
pub mod catalog;
pub mod package;
pub mod payment;
pub mod review;
pub mod schedule;
pub mod user;

pub use booking::{Booking, BookingActions, BookingCreated, BookingStatus, CreateBookingRequest};
pub use catalog::{Court, Facility, RecommendedCourt, Slot, SportType, Tier};
pub use package::{Package, PurchaseRequest, UserPackage};
pub use payment::{CheckoutTarget, PaymentKind, PaymentSession, PaymentStatus};
pub use review::NewReview;
pub use schedule::{parse_date, parse_time, CalendarException, DayOfWeek, NewCalendarException, OperatingHour};
pub use user::User;
