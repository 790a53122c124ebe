use std::env;
use chrono::FixedOffset;
use tracing::warn;

pub const DEFAULT_CLINIC_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic_api_url: String,
    /// Pins the clinic time zone. `None` means the process local zone.
    pub clinic_utc_offset: Option<FixedOffset>,
    pub bind_address: String,
    clinic_api_url_explicit: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let (clinic_api_url, clinic_api_url_explicit) = match env::var("CLINIC_API_URL") {
            Ok(url) if !url.trim().is_empty() => (url.trim_end_matches('/').to_string(), true),
            _ => {
                warn!("CLINIC_API_URL not set, using default {}", DEFAULT_CLINIC_API_URL);
                (DEFAULT_CLINIC_API_URL.to_string(), false)
            }
        };

        let clinic_utc_offset = match env::var("CLINIC_UTC_OFFSET") {
            Ok(raw) => {
                let parsed = parse_utc_offset(&raw);
                if parsed.is_none() {
                    warn!("CLINIC_UTC_OFFSET '{}' is not a valid ±HH:MM offset, using process local zone", raw);
                }
                parsed
            }
            Err(_) => None,
        };

        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| {
                warn!("BIND_ADDRESS not set, using default {}", DEFAULT_BIND_ADDRESS);
                DEFAULT_BIND_ADDRESS.to_string()
            });

        let config = Self {
            clinic_api_url,
            clinic_utc_offset,
            bind_address,
            clinic_api_url_explicit,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Build a config pointing at an explicit backend, mostly for tests and tooling.
    pub fn with_api_url(clinic_api_url: impl Into<String>, clinic_utc_offset: Option<FixedOffset>) -> Self {
        let url: String = clinic_api_url.into();
        Self {
            clinic_api_url: url.trim_end_matches('/').to_string(),
            clinic_utc_offset,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            clinic_api_url_explicit: true,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.clinic_api_url_explicit && !self.clinic_api_url.is_empty()
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `HH:MM` or `Z` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };

    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
