//! Time parsing and formatting utilities

use crate::domain::errors::{DomainError, DomainResult};

/// Parse `SS[.f]`, `MM:SS[.f]` or `HH:MM:SS[.f]` into seconds
pub fn parse_time(time_str: &str) -> DomainResult<f64> {
    let time_str = time_str.trim();
    let invalid = || DomainError::BadArgs(format!("Invalid time format: {}", time_str));

    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() > 3 || parts.iter().any(|part| part.trim().is_empty()) {
        return Err(invalid());
    }

    let mut seconds = 0.0;
    for part in &parts {
        let value: f64 = part.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid());
        }
        seconds = seconds * 60.0 + value;
    }

    Ok(seconds)
}

/// Format seconds as `m:ss.d` for cursor display
pub fn format_clock(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let tenths = ((seconds % 1.0) * 10.0).floor() as u64;
    format!("{}:{:02}.{}", minutes, secs, tenths)
}
