//! Customer schedules and the collections they produce.
//!
//! [`RecurringDateCalculator`] does the date arithmetic,
//! [`CollectionGenerator`] turns a schedule's current date into a pickup, and
//! [`ScheduleManager`] layers the status and frequency transitions on top.

mod calendar;
mod collections;
mod error;
mod manager;

pub use calendar::{CalendarError, RecurringDateCalculator};
pub use collections::CollectionGenerator;
pub use error::ScheduleError;
pub use manager::{AdvanceReport, ScheduleManager};
