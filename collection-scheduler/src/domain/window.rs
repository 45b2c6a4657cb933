//! Time windows for trips.
//!
//! A trip occupies its vehicle and crew over a half-open interval
//! `[start, end)`. Two trips that merely touch (one ends exactly when the
//! other starts) do not conflict.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Error returned when a window's start is not strictly before its end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time window: start {start} is not before end {end}")]
pub struct InvalidWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

/// A half-open `[start, end)` interval with `start < end`.
///
/// # Examples
///
/// ```
/// use collection_scheduler::domain::TimeWindow;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let morning = TimeWindow::new(
///     day.and_hms_opt(8, 0, 0).unwrap(),
///     day.and_hms_opt(12, 0, 0).unwrap(),
/// )
/// .unwrap();
/// let late = TimeWindow::new(
///     day.and_hms_opt(11, 0, 0).unwrap(),
///     day.and_hms_opt(13, 0, 0).unwrap(),
/// )
/// .unwrap();
/// assert!(morning.overlaps(&late));
///
/// // Empty or reversed windows are rejected
/// assert!(TimeWindow::new(day.and_hms_opt(9, 0, 0).unwrap(), day.and_hms_opt(9, 0, 0).unwrap()).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window, rejecting `start >= end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvalidWindow> {
        if start >= end {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the (inclusive) start of the window.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the (exclusive) end of the window.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Calendar date on which the window ends.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Whether two windows intersect: `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeWindow[{} .. {})", self.start, self.end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Unchecked wire form; validated on the way in.
#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = InvalidWindow;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(raw.start, raw.end)
    }
}

impl From<TimeWindow> for RawWindow {
    fn from(window: TimeWindow) -> Self {
        RawWindow {
            start: window.start,
            end: window.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn window(from: (u32, u32), to: (u32, u32)) -> TimeWindow {
        TimeWindow::new(at(10, from.0, from.1), at(10, to.0, to.1)).unwrap()
    }

    #[test]
    fn rejects_empty_and_reversed() {
        assert!(TimeWindow::new(at(10, 9, 0), at(10, 9, 0)).is_err());
        assert!(TimeWindow::new(at(10, 10, 0), at(10, 9, 0)).is_err());
    }

    #[test]
    fn partial_overlap() {
        let booked = window((8, 0), (12, 0));
        let request = window((11, 0), (13, 0));
        assert!(booked.overlaps(&request));
        assert!(request.overlaps(&booked));
    }

    #[test]
    fn containment_overlaps() {
        let outer = window((8, 0), (16, 0));
        let inner = window((10, 0), (11, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let first = window((8, 0), (12, 0));
        let second = window((12, 0), (14, 0));
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let first = window((8, 0), (9, 0));
        let second = window((13, 0), (14, 0));
        assert!(!first.overlaps(&second));
    }

    #[test]
    fn end_date_across_midnight() {
        let w = TimeWindow::new(at(10, 22, 0), at(11, 2, 0)).unwrap();
        assert_eq!(w.end_date(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert_eq!(w.duration(), Duration::hours(4));
    }

    #[test]
    fn display_format() {
        let w = window((8, 0), (12, 30));
        assert_eq!(w.to_string(), "2024-01-10 08:00 - 2024-01-10 12:30");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<TimeWindow, _> =
            serde_json::from_str(r#"{"start":"2024-01-10T08:00:00","end":"2024-01-10T12:00:00"}"#);
        assert!(ok.is_ok());

        let reversed: Result<TimeWindow, _> =
            serde_json::from_str(r#"{"start":"2024-01-10T12:00:00","end":"2024-01-10T08:00:00"}"#);
        assert!(reversed.is_err());
    }
}
