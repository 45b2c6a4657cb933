//! Schedule service errors.

use chrono::NaiveDate;

use crate::domain::{CustomerId, WasteType};
use crate::outcome::ErrorKind;
use crate::store::StoreError;

use super::CalendarError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("start date {start} is before today ({today})")]
    StartDateInPast { start: NaiveDate, today: NaiveDate },

    #[error("pickup date {pickup} is too soon, earliest allowed is {earliest}")]
    PickupTooSoon {
        pickup: NaiveDate,
        earliest: NaiveDate,
    },

    #[error("customer {0} not found")]
    UnknownCustomer(CustomerId),

    #[error("no collection weekday configured for waste {0}")]
    NoWeekdayRule(WasteType),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::StartDateInPast { .. }
            | ScheduleError::PickupTooSoon { .. }
            | ScheduleError::Calendar(_) => ErrorKind::InvalidInput,
            ScheduleError::NoWeekdayRule(_) => ErrorKind::RuleViolation,
            ScheduleError::UnknownCustomer(_) => ErrorKind::NotFound,
            ScheduleError::Store(_) => ErrorKind::Persistence,
        }
    }
}
