use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use super::{confirm, money, payment};
use crate::api::FacilityQuery;
use crate::models::{CheckoutTarget, PaymentKind, Tier};
use crate::services::booking_flow::{BookingWizard, SlotSelection};
use crate::state::AppState;

pub async fn sport_types(state: &AppState) -> anyhow::Result<()> {
    for sport in state.api.sport_types().await? {
        println!("{:>4}  {}", sport.id, sport.name);
    }
    Ok(())
}

pub async fn facilities(state: &AppState, query: FacilityQuery) -> anyhow::Result<()> {
    let wizard = BookingWizard::with_filters(state.api.clone(), query);
    wizard.load_facilities().await?;

    let view = wizard.view();
    if view.facilities.is_empty() {
        println!("No facilities match.");
    }
    for facility in view.facilities {
        println!(
            "{:>4}  {}  {}",
            facility.id,
            facility.name,
            facility.address.unwrap_or_default()
        );
        if let Some(court) = facility.recommended_court {
            let price = court.price.map(money).unwrap_or_default();
            println!("        recommended: {} (#{}) {price}", court.name, court.id);
        }
    }
    Ok(())
}

pub async fn courts(state: &AppState, facility_id: i64) -> anyhow::Result<()> {
    for court in state.api.facility_courts(facility_id).await? {
        let status = if court.is_active { "" } else { "  (inactive)" };
        println!(
            "{:>4}  {}  {}  {}/h{status}",
            court.id,
            court.name,
            court.court_type.unwrap_or_default(),
            money(court.default_price)
        );
    }
    Ok(())
}

pub async fn slots(state: &AppState, court_id: i64, date: NaiveDate, tier: Tier) -> anyhow::Result<()> {
    for slot in state.api.court_slots(court_id, date, tier).await? {
        let booked = if slot.is_booked { "booked" } else { "free" };
        println!(
            "{:>5}  {}-{}  {:>8}  {booked}",
            slot.id,
            slot.start_time,
            slot.end_time,
            money(slot.price)
        );
    }
    Ok(())
}

pub struct BookArgs {
    pub query: FacilityQuery,
    pub facility_id: i64,
    pub court_id: i64,
    pub slot_id: i64,
    pub assume_yes: bool,
    pub skip_payment: bool,
}

/// Walks the wizard facility → court → slot, books, then takes the deposit.
pub async fn book(state: &AppState, args: BookArgs, qr_out: Option<&Path>) -> anyhow::Result<()> {
    let wizard = BookingWizard::with_filters(state.api.clone(), args.query);
    wizard.load_facilities().await?;
    wizard
        .select_facility(args.facility_id)
        .await
        .context("facility not available for this search")?;
    wizard
        .select_court(args.court_id)
        .await
        .context("court not found at this facility")?;

    let slot = match wizard.select_slot(args.slot_id) {
        SlotSelection::NeedsConfirmation(slot) => slot,
        SlotSelection::AlreadyBooked => anyhow::bail!("slot {} is already booked", args.slot_id),
        SlotSelection::NotFound => anyhow::bail!("slot {} not found", args.slot_id),
    };

    let question = format!(
        "Book {}-{} for {}?",
        slot.start_time,
        slot.end_time,
        money(slot.price)
    );
    if !args.assume_yes && !confirm(&question) {
        wizard.cancel_confirmation();
        println!("Not booked.");
        return Ok(());
    }

    let outcome = wizard.confirm_booking().await?;
    match outcome.created.booking_id {
        Some(id) => println!("Booking #{id} is {}.", outcome.created.status.as_str()),
        None => println!("Booking is {}.", outcome.created.status.as_str()),
    }
    if let Some(message) = &outcome.created.message {
        println!("{message}");
    }

    if let Some(booking_id) = outcome.deposit_booking_id {
        if args.skip_payment {
            println!("Deposit is due, pay it later with `pay {booking_id} --kind deposit`.");
            return Ok(());
        }
        let target = CheckoutTarget::Booking {
            booking_id,
            kind: PaymentKind::Deposit,
        };
        if payment::run_checkout(state, target, qr_out).await? {
            println!("Deposit paid for booking #{booking_id}.");
        }
    }
    Ok(())
}
