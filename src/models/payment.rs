use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Deposit is the partial upfront payment, final is the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentKind {
    Deposit,
    Final,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Deposit => "deposit",
            PaymentKind::Final => "final",
        }
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" => Ok(PaymentKind::Deposit),
            "final" | "balance" => Ok(PaymentKind::Final),
            _ => Err(format!("unknown payment type: {s}")),
        }
    }
}

/// What a checkout session pays for. Selects the endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutTarget {
    Booking { booking_id: i64, kind: PaymentKind },
    Package { package_id: i64 },
}

impl CheckoutTarget {
    /// `None` when there is no booking id yet.
    pub fn booking(booking_id: Option<i64>, kind: PaymentKind) -> Option<Self> {
        booking_id.map(|booking_id| CheckoutTarget::Booking { booking_id, kind })
    }
}

impl fmt::Display for CheckoutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutTarget::Booking { booking_id, kind } => {
                write!(f, "{} payment for booking #{booking_id}", kind.as_str())
            }
            CheckoutTarget::Package { package_id } => write!(f, "package #{package_id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub order_code: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
}

impl PaymentSession {
    /// Decoded QR image bytes, accepting a bare base64 payload or a `data:` URI.
    pub fn qr_png(&self) -> AppResult<Option<Vec<u8>>> {
        let Some(raw) = self.qr_code.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        let payload = match raw.split_once(";base64,") {
            Some((_, data)) => data,
            None => raw,
        };
        STANDARD
            .decode(payload.trim())
            .map(Some)
            .map_err(|e| AppError::InvalidResponse(format!("QR image is not valid base64: {e}")))
    }
}

/// Polled payment state. Several backend spellings mean success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Success,
    Completed,
    Recognized,
    Paid,
    Pending,
    Failed,
    Other(String),
}

impl PaymentStatus {
    /// Accepts a bare string or a JSON-quoted one.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unquoted = serde_json::from_str::<String>(trimmed)
            .unwrap_or_else(|_| trimmed.trim_matches('"').to_string());

        match unquoted.to_lowercase().as_str() {
            "success" => PaymentStatus::Success,
            "completed" => PaymentStatus::Completed,
            "recognized" => PaymentStatus::Recognized,
            "paid" => PaymentStatus::Paid,
            "pending" => PaymentStatus::Pending,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Other(unquoted),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Success
                | PaymentStatus::Completed
                | PaymentStatus::Recognized
                | PaymentStatus::Paid
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Success => "Success",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Recognized => "Recognized",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_values() {
        for raw in ["Success", "Completed", "Recognized", "Paid", "PAID", "\"Paid\""] {
            assert!(PaymentStatus::parse(raw).is_success(), "{raw}");
        }
    }

    #[test]
    fn test_non_terminal_values_kept_verbatim() {
        assert_eq!(PaymentStatus::parse("Pending"), PaymentStatus::Pending);
        assert!(!PaymentStatus::parse("Failed").is_success());
        let other = PaymentStatus::parse("  Processing\n");
        assert_eq!(other, PaymentStatus::Other("Processing".to_string()));
        assert_eq!(other.to_string(), "Processing");
    }

    #[test]
    fn test_booking_target_requires_id() {
        assert!(CheckoutTarget::booking(None, PaymentKind::Deposit).is_none());
        assert_eq!(
            CheckoutTarget::booking(Some(99), PaymentKind::Final),
            Some(CheckoutTarget::Booking {
                booking_id: 99,
                kind: PaymentKind::Final
            })
        );
    }

    #[test]
    fn test_qr_decoding() {
        let session = PaymentSession {
            order_code: "ORD1".to_string(),
            checkout_url: None,
            qr_code: Some("data:image/png;base64,iVBORw0K".to_string()),
        };
        let bytes = session.qr_png().unwrap().unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");

        let empty = PaymentSession {
            qr_code: None,
            ..session.clone()
        };
        assert!(empty.qr_png().unwrap().is_none());

        let broken = PaymentSession {
            qr_code: Some("***".to_string()),
            ..session
        };
        assert!(broken.qr_png().is_err());
    }
}
