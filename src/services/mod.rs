pub mod booking_flow;
pub mod calendar_exceptions;
pub mod my_bookings;
pub mod operating_hours;
pub mod package_catalog;
pub mod payment;
pub mod request_guard;
