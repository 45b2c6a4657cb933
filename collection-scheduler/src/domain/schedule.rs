//! Customer schedules and the per-waste weekday rules.
//!
//! A schedule is either a one-off pickup or a recurring arrangement. Both
//! share the customer, waste and status; only the recurring variant carries
//! a frequency and a moving next-collection date.

use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{CustomerId, ScheduleId};

/// Kind of waste collected, e.g. "Plastic" or "Glass".
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WasteType(String);

impl WasteType {
    pub fn new(name: impl Into<String>) -> Self {
        WasteType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WasteType({})", self.0)
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed weekday on which a waste type is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayRule {
    pub waste: WasteType,
    pub weekday: Weekday,
}

/// How often a recurring schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Weekly,
    Monthly,
}

/// Status of a schedule. `Cancelled` and `Completed` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Active,
    Paused,
    Cancelled,
    Completed,
}

impl ScheduleStatus {
    pub fn is_closed(self) -> bool {
        matches!(self, ScheduleStatus::Cancelled | ScheduleStatus::Completed)
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScheduleStatus::Active => "active",
            ScheduleStatus::Paused => "paused",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Recurrence data of a periodic schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    /// `None` until the first occurrence has been computed.
    pub next_collection_date: Option<NaiveDate>,
}

/// Variant payload of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleKind {
    OneTime { pickup_date: NaiveDate },
    Recurring(Recurrence),
}

/// A schedule before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub customer: CustomerId,
    pub postal_code: String,
    pub waste: WasteType,
    pub created_on: NaiveDate,
    pub kind: ScheduleKind,
}

/// A persisted schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub customer: CustomerId,
    pub postal_code: String,
    pub waste: WasteType,
    pub status: ScheduleStatus,
    pub created_on: NaiveDate,
    pub kind: ScheduleKind,
}

impl Schedule {
    /// A new, active schedule.
    pub fn from_draft(id: ScheduleId, draft: ScheduleDraft) -> Self {
        Self {
            id,
            customer: draft.customer,
            postal_code: draft.postal_code,
            waste: draft.waste,
            status: ScheduleStatus::Active,
            created_on: draft.created_on,
            kind: draft.kind,
        }
    }

    /// Date of the pickup this schedule currently points at.
    pub fn collection_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            ScheduleKind::OneTime { pickup_date } => Some(*pickup_date),
            ScheduleKind::Recurring(r) => r.next_collection_date,
        }
    }

    pub fn recurrence(&self) -> Option<&Recurrence> {
        match &self.kind {
            ScheduleKind::Recurring(r) => Some(r),
            ScheduleKind::OneTime { .. } => None,
        }
    }

    pub fn recurrence_mut(&mut self) -> Option<&mut Recurrence> {
        match &mut self.kind {
            ScheduleKind::Recurring(r) => Some(r),
            ScheduleKind::OneTime { .. } => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence().is_some()
    }
}
