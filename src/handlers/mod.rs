//! Terminal front-end for the views in [`crate::services`].

pub mod bookings;
pub mod catalog;
pub mod packages;
pub mod payment;
pub mod schedule;
pub mod session;

use std::io::{self, BufRead, Write};

/// Blocking yes/no prompt on stdin. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn money(amount: f64) -> String {
    format!("{amount:.0}")
}
