//! Time utilities

use chrono::{Local, NaiveDateTime};

/// Time remaining until a competition's scheduled wall-clock start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The scheduled moment is now or in the past
    Started,
    /// Whole components of the remaining duration
    Remaining { days: i64, hours: i64, minutes: i64 },
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Started => write!(f, "Event has started"),
            Self::Remaining {
                days,
                hours,
                minutes,
            } => write!(f, "{}d {}h {}m", days, hours, minutes),
        }
    }
}

/// Countdown to a competition's `date` ("YYYY-MM-DD") and `time` ("HH:MM"),
/// measured against the local wall clock.
///
/// Advisory display text only, recomputed on each render; it never drives a
/// state transition. Returns `None` when the fields do not parse.
pub fn countdown(date: &str, time: &str) -> Option<Countdown> {
    countdown_at(date, time, Local::now().naive_local())
}

/// Pure countdown computation against an explicit `now`
pub fn countdown_at(date: &str, time: &str, now: NaiveDateTime) -> Option<Countdown> {
    let event = parse_event_datetime(date, time)?;
    let delta_ms = (event - now).num_milliseconds();

    if delta_ms <= 0 {
        return Some(Countdown::Started);
    }

    let total_minutes = delta_ms / (1000 * 60);
    Some(Countdown::Remaining {
        days: total_minutes / (60 * 24),
        hours: (total_minutes / 60) % 24,
        minutes: total_minutes % 60,
    })
}

/// Parse combined local wall-clock date and time strings
pub fn parse_event_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{}T{}", date, time);
    NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(&combined, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
