use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_db: String,
    pub request_timeout_secs: u64,
    pub payment_poll_interval_ms: u64,
    pub payment_close_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            session_db: env::var("SESSION_DB").unwrap_or_else(|_| "courtside.db".to_string()),
            request_timeout_secs: positive_or(env::var("REQUEST_TIMEOUT_SECS").ok(), 30),
            payment_poll_interval_ms: positive_or(env::var("PAYMENT_POLL_INTERVAL_MS").ok(), 3000),
            payment_close_delay_ms: env::var("PAYMENT_CLOSE_DELAY_MS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(2000),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.payment_poll_interval_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.payment_close_delay_ms)
    }
}

/// Zero and unparsable values fall back to `default`.
fn positive_or(raw: Option<String>, default: u64) -> u64 {
    match raw.as_deref().map(str::trim).map(str::parse::<u64>) {
        Some(Ok(0)) => {
            tracing::warn!(default, "zero is not a valid setting here, using default");
            default
        }
        Some(Ok(n)) => n,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_falls_back_to_default() {
        assert_eq!(positive_or(Some("0".to_string()), 3000), 3000);
        assert_eq!(positive_or(Some(" 0 ".to_string()), 30), 30);
    }

    #[test]
    fn test_positive_value_kept() {
        assert_eq!(positive_or(Some("500".to_string()), 3000), 500);
        assert_eq!(positive_or(Some("fast".to_string()), 3000), 3000);
        assert_eq!(positive_or(None, 3000), 3000);
    }
}
