//! Cron schedule parsing for reminders
//!
//! Users type crontab-style expressions (`min hour dom month dow`), while the
//! `cron` crate expects a leading seconds field and numbers weekdays from
//! 1 = Sunday. Expressions are normalized here before parsing.
//!
//! - **Version**: 1.2.0
//! - **Since**: 2.0.0
//!
//! ## Changelog
//! - 1.2.0: Expand stepped weekday ranges; reject schedules that never fire again
//! - 1.1.0: Translate crontab weekday numbers (0/7 = Sunday)
//! - 1.0.0: Initial schedule validation

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::str::FromStr;

use super::error::{ReminderError, Result};

/// Shown in listings when a stored expression no longer parses
pub const INVALID_CRON_LABEL: &str = "Invalid cron";

/// A validated reminder schedule
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    expression: String,
    schedule: Schedule,
}

impl ReminderSchedule {
    /// Parse and validate a user-supplied expression
    pub fn parse(expression: &str) -> Result<Self> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(ReminderError::InvalidSchedule {
                expression: expression.to_string(),
                reason: "expression is empty".to_string(),
            });
        }

        let normalized = normalize_expression(trimmed);
        let schedule =
            Schedule::from_str(&normalized).map_err(|e| ReminderError::InvalidSchedule {
                expression: expression.to_string(),
                reason: e.to_string(),
            })?;

        // A job for such a schedule would exit at once while its row stays enabled
        if schedule.upcoming(Utc).next().is_none() {
            return Err(ReminderError::InvalidSchedule {
                expression: expression.to_string(),
                reason: "expression has no upcoming occurrences".to_string(),
            });
        }

        Ok(Self {
            expression: trimmed.to_string(),
            schedule,
        })
    }

    /// The expression as the user wrote it
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First occurrence strictly after `from`, evaluated in `tz`
    pub fn next_after(&self, from: DateTime<Utc>, tz: Tz) -> Option<DateTime<Tz>> {
        self.schedule.after(&from.with_timezone(&tz)).next()
    }

    /// Next occurrence from now
    pub fn next_occurrence(&self, tz: Tz) -> Option<DateTime<Tz>> {
        self.next_after(Utc::now(), tz)
    }
}

/// Returns true when `expression` would be accepted by [`ReminderSchedule::parse`]
pub fn validate(expression: &str) -> bool {
    ReminderSchedule::parse(expression).is_ok()
}

/// Human-readable next run for list output
pub fn describe_next(expression: &str, tz: Tz) -> String {
    ReminderSchedule::parse(expression)
        .ok()
        .and_then(|s| s.next_occurrence(tz))
        .map(|next| next.format("%a %Y-%m-%d %H:%M %Z").to_string())
        .unwrap_or_else(|| INVALID_CRON_LABEL.to_string())
}

/// Rewrite a crontab-style expression into the `cron` crate dialect.
///
/// Five fields get a `0` seconds field prepended. The weekday field (index 5
/// once seconds are present) is renumbered from 0/7 = Sunday to 1 = Sunday.
fn normalize_expression(expression: &str) -> String {
    let mut fields: Vec<String> = expression.split_whitespace().map(str::to_string).collect();

    if fields.len() == 5 {
        fields.insert(0, "0".to_string());
    }

    if fields.len() == 6 || fields.len() == 7 {
        fields[5] = translate_weekdays(&fields[5]);
    }

    fields.join(" ")
}

fn translate_weekdays(field: &str) -> String {
    field
        .split(',')
        .map(translate_weekday_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn translate_weekday_item(item: &str) -> String {
    if let Some((base, step)) = item.split_once('/') {
        return match expand_stepped(base, step) {
            Some(days) => days
                .into_iter()
                .map(|day| shift_weekday(day).to_string())
                .collect::<Vec<_>>()
                .join(","),
            None => item.to_string(),
        };
    }

    if let Some((start, end)) = item.split_once('-') {
        return match (parse_weekday(start), parse_weekday(end)) {
            (Some(0), Some(7)) => "1-7".to_string(),
            // Ranges ending on 7 run through Saturday and wrap to Sunday
            (Some(start), Some(7)) => format!("{}-7,1", shift_weekday(start)),
            (Some(start), Some(end)) => format!("{}-{}", shift_weekday(start), shift_weekday(end)),
            _ => item.to_string(),
        };
    }

    match parse_weekday(item) {
        Some(day) => shift_weekday(day).to_string(),
        None => item.to_string(),
    }
}

/// Crontab days (0 = Sunday) selected by `base/step`, with 7 folded onto Sunday.
///
/// Shifting a stepped range as a whole would move its end past Saturday, so
/// the days are listed out instead.
fn expand_stepped(base: &str, step: &str) -> Option<Vec<u32>> {
    let step = step.parse::<usize>().ok().filter(|step| *step > 0)?;
    let (start, end) = match base.split_once('-') {
        Some((start, end)) => (parse_weekday(start)?, parse_weekday(end)?),
        None if base == "*" => (0, 6),
        None => (parse_weekday(base)?, 6),
    };
    if start > end {
        return None;
    }

    let mut days: Vec<u32> = (start..=end).step_by(step).map(|day| day % 7).collect();
    days.sort_unstable();
    days.dedup();
    Some(days)
}

fn parse_weekday(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|day| *day <= 7)
}

fn shift_weekday(day: u32) -> u32 {
    day % 7 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Weekday};

    fn saturday_noon() -> DateTime<Utc> {
        // 2024-01-06 is a Saturday
        Utc.with_ymd_and_hms(2024, 1, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_five_field_expression_is_accepted() {
        let schedule = ReminderSchedule::parse("0 9 * * 1-5").unwrap();
        assert_eq!(schedule.expression(), "0 9 * * 1-5");
    }

    #[test]
    fn test_six_field_expression_with_seconds() {
        assert!(validate("30 0 17 * * 1"));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = ReminderSchedule::parse("not-a-cron").unwrap_err();
        assert!(matches!(err, ReminderError::InvalidSchedule { .. }));
        assert!(!validate(""));
        assert!(!validate("   "));
        assert!(!validate("61 * * * *"));
    }

    #[test]
    fn test_weekday_range_means_monday_to_friday() {
        let schedule = ReminderSchedule::parse("0 9 * * 1-5").unwrap();
        let next = schedule.next_after(saturday_noon(), Tz::UTC).unwrap();
        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next.day(), 8);
        assert_eq!(next.hour(), 9);
        assert_eq!(next.minute(), 0);

        let mut from = saturday_noon();
        for _ in 0..10 {
            let next = schedule.next_after(from, Tz::UTC).unwrap();
            assert!(!matches!(next.weekday(), Weekday::Sat | Weekday::Sun));
            from = next.with_timezone(&Utc);
        }
    }

    #[test]
    fn test_sunday_as_zero_and_seven() {
        for expr in ["0 0 * * 0", "0 0 * * 7"] {
            let schedule = ReminderSchedule::parse(expr).unwrap();
            let next = schedule.next_after(saturday_noon(), Tz::UTC).unwrap();
            assert_eq!(next.weekday(), Weekday::Sun, "{expr}");
        }
    }

    #[test]
    fn test_range_ending_on_seven_wraps_to_sunday() {
        assert_eq!(translate_weekdays("5-7"), "6-7,1");
        assert_eq!(translate_weekdays("0-6"), "1-7");
        assert_eq!(translate_weekdays("1,3"), "2,4");
        assert_eq!(translate_weekdays("MON-FRI"), "MON-FRI");
        assert_eq!(translate_weekdays("*"), "*");
        assert_eq!(translate_weekdays("1-5/2"), "2,4,6");
        // Wednesday, Friday and Sunday
        assert_eq!(translate_weekdays("3-7/2"), "1,4,6");
        assert_eq!(translate_weekdays("*/3"), "1,4,7");
    }

    #[test]
    fn test_stepped_range_through_seven_fires_on_sunday() {
        let schedule = ReminderSchedule::parse("0 9 * * 3-7/2").unwrap();
        let mut from = saturday_noon();
        let mut days = Vec::new();
        for _ in 0..3 {
            let next = schedule.next_after(from, Tz::UTC).unwrap();
            days.push(next.weekday());
            from = next.with_timezone(&Utc);
        }
        assert_eq!(days, vec![Weekday::Sun, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn test_schedule_without_future_runs_is_rejected() {
        // Seven fields: the last one is the year
        let err = ReminderSchedule::parse("0 0 9 1 1 * 2001").unwrap_err();
        match err {
            ReminderError::InvalidSchedule { reason, .. } => {
                assert!(reason.contains("no upcoming occurrences"))
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(validate("0 0 9 1 1 * 2001-2099"));
    }

    #[test]
    fn test_timezone_is_respected() {
        let schedule = ReminderSchedule::parse("0 17 * * 1").unwrap();
        let next = schedule
            .next_after(saturday_noon(), chrono_tz::America::New_York)
            .unwrap();
        assert_eq!(next.hour(), 17);
        assert_eq!(next.weekday(), Weekday::Mon);
        // 17:00 EST is 22:00 UTC
        assert_eq!(next.with_timezone(&Utc).hour(), 22);
    }

    #[test]
    fn test_describe_next() {
        assert_eq!(describe_next("bogus", Tz::UTC), INVALID_CRON_LABEL);
        assert_ne!(describe_next("*/5 * * * *", Tz::UTC), INVALID_CRON_LABEL);
    }
}
