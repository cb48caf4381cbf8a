//! Reading "time until vulnerable" input
//!
//! Accepts compact durations (`1d23h45m`, `4h 30m`) as well as the status
//! text copied from the game (`Secure (vulnerable in 2d 4h 33m)`).

use chrono::Duration;
use regex::Regex;
use std::sync::OnceLock;

use super::error::{Result, SkyhookError};

/// Timers further out than this are rejected
pub const MAX_LEAD_DAYS: i64 = 4;

static DURATION_PART: OnceLock<Regex> = OnceLock::new();

fn duration_part() -> &'static Regex {
    DURATION_PART.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*([dhm])").expect("duration pattern is valid")
    })
}

/// Parse the time until a skyhook is vulnerable
pub fn parse_time_until(input: &str) -> Result<Duration> {
    let invalid = || SkyhookError::InvalidDuration(input.to_string());

    let mut seen = [false; 3];
    let mut total = Duration::zero();
    for caps in duration_part().captures_iter(input) {
        let amount: i64 = caps[1].parse().map_err(|_| invalid())?;
        let (slot, unit) = match caps[2].to_ascii_lowercase().as_str() {
            "d" => (0, Duration::try_days(amount)),
            "h" => (1, Duration::try_hours(amount)),
            _ => (2, Duration::try_minutes(amount)),
        };
        if std::mem::replace(&mut seen[slot], true) {
            return Err(invalid());
        }
        total = unit.and_then(|u| total.checked_add(&u)).ok_or_else(invalid)?;
    }

    if total <= Duration::zero() {
        return Err(invalid());
    }
    if total > Duration::days(MAX_LEAD_DAYS) {
        return Err(SkyhookError::TooFarAhead(input.to_string()));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(input: &str) -> i64 {
        parse_time_until(input).unwrap().num_minutes()
    }

    #[test]
    fn test_compact_durations() {
        assert_eq!(minutes("1d23h45m"), 24 * 60 + 23 * 60 + 45);
        assert_eq!(minutes("4h 30m"), 270);
        assert_eq!(minutes("90m"), 90);
        assert_eq!(minutes("2D"), 2 * 24 * 60);
    }

    #[test]
    fn test_pasted_status_text() {
        assert_eq!(
            minutes("Secure (vulnerable in 2d 4h 33m)"),
            2 * 24 * 60 + 4 * 60 + 33
        );
    }

    #[test]
    fn test_rejected_durations() {
        for bad in ["", "soon", "0m", "1h 2h", "Secure"] {
            assert_eq!(
                parse_time_until(bad),
                Err(SkyhookError::InvalidDuration(bad.to_string())),
                "{bad}"
            );
        }
        assert_eq!(
            parse_time_until("4d1m"),
            Err(SkyhookError::TooFarAhead("4d1m".to_string()))
        );
        assert_eq!(minutes("4d"), 4 * 24 * 60);
    }
}
