//! Next-collection date arithmetic for recurring schedules.
//!
//! Every waste type is collected on one fixed weekday. A recurring schedule
//! moves from one occurrence to the next by adding its interval and then
//! rolling forward to that weekday.

use chrono::{Datelike, Days, Duration, Months, NaiveDate, Weekday};

use crate::config::SchedulerConfig;
use crate::domain::{Frequency, Recurrence};

/// Date arithmetic left the representable calendar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("date out of range when advancing from {0}")]
pub struct CalendarError(pub NaiveDate);

/// Computes collection dates. Never mutates a schedule.
#[derive(Debug, Clone, Copy)]
pub struct RecurringDateCalculator {
    lead: Duration,
}

impl RecurringDateCalculator {
    /// Create a calculator whose first occurrence is at least `lead` after
    /// the start date.
    pub fn new(lead: Duration) -> Self {
        Self { lead }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.first_occurrence_lead())
    }

    /// The first date on or after `date` that falls on `weekday`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, Weekday};
    /// use collection_scheduler::schedules::RecurringDateCalculator;
    ///
    /// // 2024-01-10 is a Wednesday
    /// let wed = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    /// assert_eq!(RecurringDateCalculator::align_to_weekday(wed, Weekday::Wed).unwrap(), wed);
    /// assert_eq!(
    ///     RecurringDateCalculator::align_to_weekday(wed, Weekday::Mon).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    /// );
    /// ```
    pub fn align_to_weekday(date: NaiveDate, weekday: Weekday) -> Result<NaiveDate, CalendarError> {
        let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
        date.checked_add_days(Days::new(u64::from(ahead)))
            .ok_or(CalendarError(date))
    }

    /// The first occurrence of a schedule starting on `start`: the lead time
    /// is added, then the date is aligned to `weekday`.
    pub fn first_occurrence(
        &self,
        start: NaiveDate,
        weekday: Weekday,
    ) -> Result<NaiveDate, CalendarError> {
        let candidate = start
            .checked_add_signed(self.lead)
            .ok_or(CalendarError(start))?;
        Self::align_to_weekday(candidate, weekday)
    }

    /// The occurrence after the schedule's current next date.
    ///
    /// If the schedule has no date yet, this is its first occurrence.
    /// Otherwise the interval is added and the result aligned, repeatedly,
    /// until the date is strictly after `today`. A schedule that was dormant
    /// for several periods therefore lands on the next future occurrence,
    /// not on the first one after its stale date.
    pub fn next_occurrence(
        &self,
        recurrence: &Recurrence,
        weekday: Weekday,
        today: NaiveDate,
    ) -> Result<NaiveDate, CalendarError> {
        let Some(current) = recurrence.next_collection_date else {
            return self.first_occurrence(recurrence.start_date, weekday);
        };

        let mut candidate = Self::step(current, recurrence.frequency, weekday)?;
        while candidate <= today {
            candidate = Self::step(candidate, recurrence.frequency, weekday)?;
        }
        Ok(candidate)
    }

    fn step(
        date: NaiveDate,
        frequency: Frequency,
        weekday: Weekday,
    ) -> Result<NaiveDate, CalendarError> {
        let advanced = match frequency {
            Frequency::Weekly => date.checked_add_days(Days::new(7)),
            Frequency::Monthly => date.checked_add_months(Months::new(1)),
        }
        .ok_or(CalendarError(date))?;
        Self::align_to_weekday(advanced, weekday)
    }
}

impl Default for RecurringDateCalculator {
    fn default() -> Self {
        Self::new(Duration::days(2))
    }
}
