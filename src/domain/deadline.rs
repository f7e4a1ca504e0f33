//! Calendar-day deadline arithmetic used by the manufacturing page.
//!
//! Deadlines arrive as strings (`2026-10-20` or a full RFC 3339 timestamp).
//! All comparisons are made on calendar dates; a deadline that cannot be
//! parsed is neither urgent nor overdue.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Days ahead of today that still count as urgent.
pub const URGENT_WINDOW_DAYS: u64 = 3;

/// Source of "now". Injected so tests can pin the calendar.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant, reporting `today` in UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC of the given date.
    pub fn on(date: NaiveDate) -> Self {
        FixedClock(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Instant a deadline falls due. Date-only values mean midnight UTC.
fn deadline_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    parse_deadline(raw).map(|date| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

pub fn is_overdue(deadline: &str, today: NaiveDate) -> bool {
    parse_deadline(deadline).is_some_and(|date| date < today)
}

/// Due within [`URGENT_WINDOW_DAYS`] days, overdue dates included.
pub fn is_deadline_urgent(deadline: &str, today: NaiveDate) -> bool {
    match (parse_deadline(deadline), today.checked_add_days(Days::new(URGENT_WINDOW_DAYS))) {
        (Some(date), Some(limit)) => date <= limit,
        _ => false,
    }
}

/// Whole days until the deadline, rounded up. Negative once it has passed.
pub fn days_remaining(deadline: &str, now: DateTime<Utc>) -> Option<i64> {
    let due = deadline_instant(deadline)?;
    let millis = (due - now).num_milliseconds();
    let day = 86_400_000;
    Some(millis.div_euclid(day) + i64::from(millis.rem_euclid(day) != 0))
}

/// Badge class for the "days remaining" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemainingClass {
    Overdue,
    Urgent,
    Normal,
}

pub fn days_remaining_class(deadline: &str, now: DateTime<Utc>) -> DaysRemainingClass {
    match days_remaining(deadline, now) {
        Some(days) if days < 0 => DaysRemainingClass::Overdue,
        Some(days) if days <= 2 => DaysRemainingClass::Urgent,
        _ => DaysRemainingClass::Normal,
    }
}

/// Deadline bucket offered by the manufacturing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineWindow {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
}

impl DeadlineWindow {
    pub const ALL: [DeadlineWindow; 5] = [
        DeadlineWindow::Overdue,
        DeadlineWindow::Today,
        DeadlineWindow::Tomorrow,
        DeadlineWindow::ThisWeek,
        DeadlineWindow::NextWeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineWindow::Overdue => "overdue",
            DeadlineWindow::Today => "today",
            DeadlineWindow::Tomorrow => "tomorrow",
            DeadlineWindow::ThisWeek => "this_week",
            DeadlineWindow::NextWeek => "next_week",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeadlineWindow::Overdue => "Overdue",
            DeadlineWindow::Today => "Due Today",
            DeadlineWindow::Tomorrow => "Due Tomorrow",
            DeadlineWindow::ThisWeek => "This Week",
            DeadlineWindow::NextWeek => "Next Week",
        }
    }

    /// The week closes on the coming Sunday (today, if today is Sunday,
    /// closes a full week later).
    pub fn contains(&self, deadline: &str, today: NaiveDate) -> bool {
        let Some(date) = parse_deadline(deadline) else {
            return false;
        };
        let days_to_week_end = 7 - u64::from(today.weekday().num_days_from_sunday());
        let end_of_week = today + Days::new(days_to_week_end);
        let next_week_end = end_of_week + Days::new(7);
        match self {
            DeadlineWindow::Overdue => date < today,
            DeadlineWindow::Today => date == today,
            DeadlineWindow::Tomorrow => date == today + Days::new(1),
            DeadlineWindow::ThisWeek => date >= today && date <= end_of_week,
            DeadlineWindow::NextWeek => date > end_of_week && date <= next_week_end,
        }
    }
}

impl std::str::FromStr for DeadlineWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeadlineWindow::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| format!("Unknown deadline window: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue_and_urgent_boundaries() {
        let today = day(2026, 10, 19);
        assert!(is_overdue("2026-10-18", today));
        assert!(!is_overdue("2026-10-19", today));

        assert!(is_deadline_urgent("2026-10-22", today));
        assert!(!is_deadline_urgent("2026-10-23", today));
        assert!(is_deadline_urgent("2026-10-01", today));
    }

    #[test]
    fn test_missing_or_garbage_deadline_is_neither() {
        let today = day(2026, 10, 19);
        for raw in ["", "   ", "next tuesday"] {
            assert!(!is_overdue(raw, today));
            assert!(!is_deadline_urgent(raw, today));
            assert_eq!(days_remaining(raw, Utc::now()), None);
        }
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(days_remaining("2026-10-21", now), Some(2));
        assert_eq!(days_remaining("2026-10-19", now), Some(0));
        assert_eq!(days_remaining("2026-10-17", now), Some(-2));
        assert_eq!(days_remaining_class("2026-10-17", now), DaysRemainingClass::Overdue);
        assert_eq!(days_remaining_class("2026-10-21", now), DaysRemainingClass::Urgent);
        assert_eq!(days_remaining_class("2026-11-30", now), DaysRemainingClass::Normal);
    }

    #[test]
    fn test_deadline_windows() {
        // Monday; the week closes on Sunday the 25th.
        let today = day(2026, 10, 19);
        assert!(DeadlineWindow::Today.contains("2026-10-19", today));
        assert!(DeadlineWindow::Tomorrow.contains("2026-10-20", today));
        assert!(DeadlineWindow::ThisWeek.contains("2026-10-25", today));
        assert!(!DeadlineWindow::ThisWeek.contains("2026-10-26", today));
        assert!(DeadlineWindow::NextWeek.contains("2026-10-26", today));
        assert!(DeadlineWindow::NextWeek.contains("2026-11-01", today));
        assert!(!DeadlineWindow::NextWeek.contains("2026-11-02", today));
        assert!(DeadlineWindow::Overdue.contains("2026-10-18", today));
    }

    #[test]
    fn test_fixed_clock_reports_its_date() {
        let clock = FixedClock::on(day(2026, 10, 19));
        assert_eq!(clock.today(), day(2026, 10, 19));
    }
}
