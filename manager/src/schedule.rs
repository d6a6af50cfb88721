//! Scheduled do-not-disturb windows

use anyhow::{anyhow, Result};
use chrono::{NaiveTime, Timelike};

fn parse_hh_mm(value: &str) -> Result<u32> {
    let (hours, minutes) = value
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected HH:MM, got '{}'", value))?;
    let hours: u32 = hours.parse().map_err(|_| anyhow!("Invalid hour in '{}'", value))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| anyhow!("Invalid minute in '{}'", value))?;

    if hours > 23 || minutes > 59 {
        return Err(anyhow!("Time out of range: '{}'", value));
    }
    Ok(hours * 60 + minutes)
}

/// Whether `now` falls inside `[start, end]` (minute precision, both `HH:MM`).
/// A window whose end is before its start wraps past midnight.
pub fn is_in_timeframe(start: &str, end: &str, now: NaiveTime) -> Result<bool> {
    let start = parse_hh_mm(start)?;
    let end = parse_hh_mm(end)?;
    let current = now.hour() * 60 + now.minute();

    if end < start {
        Ok(current >= start || current <= end)
    } else {
        Ok(start <= current && current <= end)
    }
}
