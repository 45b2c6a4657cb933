//! Collections: a single pickup materialized from a schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CollectionId, CustomerId, ScheduleId, TripId, WasteType};

/// Status of a single collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStatus {
    /// Scheduled and not yet performed.
    Active,
    Completed,
    Cancelled,
}

/// A collection before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
    pub schedule: ScheduleId,
    pub customer: CustomerId,
    pub postal_code: String,
    pub waste: WasteType,
    pub date: NaiveDate,
    pub cancel_limit_days: u32,
}

/// A persisted collection.
///
/// The `trip` link is a weak back-reference: canceling a trip clears it but
/// the collection itself lives on and can be picked up by another trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub schedule: ScheduleId,
    pub customer: CustomerId,
    pub postal_code: String,
    pub waste: WasteType,
    pub date: NaiveDate,
    pub status: CollectionStatus,
    pub cancel_limit_days: u32,
    pub trip: Option<TripId>,
}

impl Collection {
    /// A fresh, active, unassigned collection.
    pub fn from_draft(id: CollectionId, draft: CollectionDraft) -> Self {
        Self {
            id,
            schedule: draft.schedule,
            customer: draft.customer,
            postal_code: draft.postal_code,
            waste: draft.waste,
            date: draft.date,
            status: CollectionStatus::Active,
            cancel_limit_days: draft.cancel_limit_days,
            trip: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CollectionStatus::Active
    }

    /// Active and not yet picked up by any trip.
    pub fn is_unassigned(&self) -> bool {
        self.is_active() && self.trip.is_none()
    }
}
