use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Closed time range an event date must fall in; `until = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub from: NaiveDateTime,
    pub until: Option<NaiveDateTime>,
}

impl EventWindow {
    /// Window for the event listing.
    ///
    /// With a positive `days_to_event` the window is `[now, now + days]`.
    /// Without it, or with zero, everything from the start of today onwards.
    pub fn upcoming(days_to_event: Option<i64>, now: NaiveDateTime) -> Self {
        match days_to_event {
            Some(days) if days > 0 => Self {
                from: now,
                until: now.checked_add_signed(Duration::days(days)),
            },
            _ => Self {
                from: now.date().and_time(NaiveTime::MIN),
                until: None,
            },
        }
    }
}
