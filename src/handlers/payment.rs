use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio_stream::StreamExt;

use crate::models::CheckoutTarget;
use crate::services::payment::{CheckoutGateway, PaymentEvent, PaymentModal};
use crate::state::AppState;

/// Runs one checkout to completion in the terminal.
///
/// Returns `true` once the payment is confirmed, `false` if the user
/// interrupts with Ctrl-C first.
pub async fn run_checkout(state: &AppState, target: CheckoutTarget, qr_out: Option<&Path>) -> anyhow::Result<bool> {
    let paid = Arc::new(AtomicBool::new(false));
    let gateway: Arc<dyn CheckoutGateway> = state.api.clone();
    let mut modal = PaymentModal::new(gateway, state.poll_settings(), {
        let paid = Arc::clone(&paid);
        move |_| paid.store(true, Ordering::SeqCst)
    });
    let mut events = modal.subscribe();

    let session = modal.open(target).await.context("could not start checkout")?;
    println!("Checkout for {target} (order {})", session.order_code);

    match session.checkout_url.as_deref() {
        Some(url) => println!("Open the checkout page: {url}"),
        None => println!("No checkout page for this order, scan the QR code instead."),
    }

    if let Some(png) = session.qr_png()? {
        match qr_out {
            Some(path) => {
                std::fs::write(path, &png)
                    .with_context(|| format!("failed to write QR image to {}", path.display()))?;
                println!("QR code saved to {}", path.display());
            }
            None => println!("QR code available ({} bytes), pass --qr-out to save it.", png.len()),
        }
    }

    println!("Waiting for payment...");
    loop {
        tokio::select! {
            event = events.next() => match event {
                Some(Ok(PaymentEvent::StatusChanged(status))) => println!("  status: {status}"),
                Some(Ok(PaymentEvent::Succeeded(_))) => println!("Payment received."),
                Some(Ok(PaymentEvent::Closed)) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => tracing::debug!(error = %e, "payment event stream lagged"),
            },
            _ = tokio::signal::ctrl_c() => {
                modal.close();
                println!("Checkout abandoned.");
                return Ok(false);
            }
        }
    }

    Ok(paid.load(Ordering::SeqCst))
}
