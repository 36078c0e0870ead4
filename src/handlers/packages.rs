use std::path::Path;

use super::{money, payment};
use crate::services::package_catalog::PackageCatalog;
use crate::state::AppState;

pub async fn list(state: &AppState) -> anyhow::Result<()> {
    let mut catalog = PackageCatalog::new(state.api.clone());
    catalog.load().await?;
    let view = catalog.view();

    println!("Available packages:");
    for package in &view.available {
        println!(
            "{:>4}  {}  {} days  {} normal / {} priority turns  {}",
            package.id,
            package.name,
            package.duration_days,
            package.normal_turns,
            package.priority_turns,
            money(package.price)
        );
        if let Some(description) = &package.description {
            println!("      {description}");
        }
    }

    println!("My packages:");
    if view.mine.is_empty() {
        println!("  none");
    }
    for owned in &view.mine {
        println!(
            "{:>4}  {}  {} normal / {} priority left  expires {}{}",
            owned.id,
            owned.package_name.as_deref().unwrap_or("package"),
            owned.remaining_normal_turns,
            owned.remaining_priority_turns,
            owned.expires_at.as_deref().unwrap_or("never"),
            if owned.is_active { "" } else { "  (inactive)" }
        );
    }
    Ok(())
}

pub async fn buy(state: &AppState, package_id: i64, qr_out: Option<&Path>) -> anyhow::Result<()> {
    let mut catalog = PackageCatalog::new(state.api.clone());
    catalog.load().await?;
    let target = catalog.checkout_target(package_id)?;

    if payment::run_checkout(state, target, qr_out).await? {
        catalog.refresh_mine().await?;
        println!("Package activated. You now own {} package(s).", catalog.view().mine.len());
    }
    Ok(())
}
