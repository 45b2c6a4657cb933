//! Outcomes of state transitions.
//!
//! A transition that is simply not applicable (cancel an already completed
//! trip, reactivate a cancelled schedule) is an ordinary result, not an
//! error. It is reported as [`Outcome::Rejected`] with the reason, distinct
//! from a missing target and from a storage failure (which is an `Err`).

use std::fmt;

use crate::domain::{CollectionId, CollectionStatus, ScheduleStatus, TripStatus};

/// Result of a state transition that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T = ()> {
    /// The transition took place.
    Applied(T),
    /// The transition is not allowed from the current state.
    Rejected(Rejection),
    /// The target does not exist.
    NotFound,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(v) => Outcome::Applied(f(v)),
            Outcome::Rejected(r) => Outcome::Rejected(r),
            Outcome::NotFound => Outcome::NotFound,
        }
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The trip is not in the status the transition starts from.
    TripNotInStatus {
        expected: TripStatus,
        actual: TripStatus,
    },
    /// A linked collection is not active, so the trip cannot complete.
    CollectionNotActive {
        collection: CollectionId,
        status: CollectionStatus,
    },
    /// The schedule is cancelled or completed.
    ScheduleClosed(ScheduleStatus),
    /// The schedule cannot move between these two statuses.
    InvalidScheduleTransition {
        from: ScheduleStatus,
        to: ScheduleStatus,
    },
    /// The operation needs an active schedule.
    ScheduleNotActive(ScheduleStatus),
    /// The schedule already has the requested frequency.
    FrequencyUnchanged,
    /// The operation only applies to the other schedule variant.
    WrongScheduleKind,
    /// The pickup is too close to be cancelled.
    CancelWindowPassed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TripNotInStatus { expected, actual } => {
                write!(f, "trip is {actual}, expected {expected}")
            }
            Rejection::CollectionNotActive { collection, status } => {
                write!(f, "collection {collection} is {status:?}, not active")
            }
            Rejection::ScheduleClosed(status) => write!(f, "schedule is {status}"),
            Rejection::InvalidScheduleTransition { from, to } => {
                write!(f, "cannot move schedule from {from} to {to}")
            }
            Rejection::ScheduleNotActive(status) => {
                write!(f, "schedule is {status}, expected active")
            }
            Rejection::FrequencyUnchanged => f.write_str("schedule already has this frequency"),
            Rejection::WrongScheduleKind => f.write_str("operation does not apply to this schedule kind"),
            Rejection::CancelWindowPassed => f.write_str("pickup is too close to be cancelled"),
        }
    }
}

/// Coarse classification of service errors for the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is missing or malformed.
    InvalidInput,
    /// A business rule (licence, crew size, availability) was violated.
    RuleViolation,
    /// A referenced entity does not exist.
    NotFound,
    /// The storage collaborator failed.
    Persistence,
}
