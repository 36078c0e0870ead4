use std::path::Path;

use chrono::NaiveDate;

use super::{money, payment};
use crate::models::{Booking, PaymentKind};
use crate::services::my_bookings::MyBookings;
use crate::state::AppState;

fn print_booking(booking: &Booking) {
    let actions = booking.actions();
    let mut hints = Vec::new();
    if actions.pay_deposit {
        hints.push("deposit due");
    }
    if actions.pay_balance {
        hints.push("balance payable");
    }
    if actions.review {
        hints.push("can review");
    }
    println!(
        "{}  {}  total {}{}",
        booking.label(),
        booking.status.as_str(),
        money(booking.total_amount),
        if hints.is_empty() {
            String::new()
        } else {
            format!("  [{}]", hints.join(", "))
        }
    );
}

pub async fn list(state: &AppState, date: Option<NaiveDate>) -> anyhow::Result<()> {
    let view = MyBookings::new(state.api.clone());
    view.set_date_filter(date).await?;

    let bookings = view.view().bookings;
    if bookings.is_empty() {
        println!("No bookings.");
    }
    for booking in &bookings {
        print_booking(booking);
    }
    Ok(())
}

pub async fn show(state: &AppState, booking_id: i64) -> anyhow::Result<()> {
    let view = MyBookings::new(state.api.clone());
    let Some(booking) = view.toggle_expand(booking_id).await? else {
        return Ok(());
    };

    print_booking(&booking);
    if let Some(tier) = booking.booking_type {
        println!("  tier: {tier}");
    }
    if !booking.slot_ids.is_empty() {
        let slots: Vec<String> = booking.slot_ids.iter().map(i64::to_string).collect();
        println!("  slots: {}", slots.join(", "));
    }
    if booking.deposit_required {
        println!("  deposit: {}", money(booking.deposit_amount));
    }
    Ok(())
}

pub async fn pay(state: &AppState, booking_id: i64, kind: PaymentKind, qr_out: Option<&Path>) -> anyhow::Result<()> {
    let view = MyBookings::new(state.api.clone());
    view.refresh().await?;
    let target = view.payment_target(booking_id, kind)?;

    if payment::run_checkout(state, target, qr_out).await? {
        view.refresh().await?;
        if let Some(booking) = view.view().booking(booking_id) {
            print_booking(booking);
        }
    }
    Ok(())
}

pub async fn review(state: &AppState, booking_id: i64, rating: u8, comment: Option<String>) -> anyhow::Result<()> {
    let view = MyBookings::new(state.api.clone());
    view.refresh().await?;
    view.submit_review(booking_id, rating, comment).await?;
    println!("Thanks, review saved for booking #{booking_id}.");
    Ok(())
}
