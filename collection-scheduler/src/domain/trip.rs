//! Trips: a vehicle and its crew booked over a time window.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CollectionId, EmployeeId, TimeWindow, TripId, VehicleId};

/// Lifecycle status of a trip.
///
/// Only `Active` trips hold their vehicle and crew; `Completed` and
/// `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripStatus {
    Pending,
    Active,
    Completed,
    Canceled,
}

impl TripStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Canceled)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TripStatus::Pending => "pending",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
            TripStatus::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

/// Ordered crew of a trip. Position 0 is the driver.
///
/// A crew is never empty and never lists the same employee twice.
///
/// # Examples
///
/// ```
/// use collection_scheduler::domain::{Crew, EmployeeId};
///
/// let crew = Crew::new(EmployeeId(1), [EmployeeId(2), EmployeeId(1), EmployeeId(2)]);
/// assert_eq!(crew.driver(), EmployeeId(1));
/// assert_eq!(crew.members(), &[EmployeeId(1), EmployeeId(2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EmployeeId>", into = "Vec<EmployeeId>")]
pub struct Crew(Vec<EmployeeId>);

/// Error returned when building a crew from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("crew must have at least one member")]
pub struct EmptyCrew;

impl Crew {
    /// Build a crew with `driver` first, dropping repeated members.
    pub fn new(driver: EmployeeId, operators: impl IntoIterator<Item = EmployeeId>) -> Self {
        let mut members = vec![driver];
        for id in operators {
            if !members.contains(&id) {
                members.push(id);
            }
        }
        Crew(members)
    }

    /// Build a crew from an ordered list whose first entry is the driver.
    pub fn from_ordered(members: Vec<EmployeeId>) -> Result<Self, EmptyCrew> {
        let mut iter = members.into_iter();
        let driver = iter.next().ok_or(EmptyCrew)?;
        Ok(Crew::new(driver, iter))
    }

    pub fn driver(&self) -> EmployeeId {
        self.0[0]
    }

    /// Non-driving members, in order.
    pub fn operators(&self) -> &[EmployeeId] {
        &self.0[1..]
    }

    pub fn members(&self) -> &[EmployeeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.0.contains(&id)
    }
}

impl TryFrom<Vec<EmployeeId>> for Crew {
    type Error = EmptyCrew;

    fn try_from(members: Vec<EmployeeId>) -> Result<Self, Self::Error> {
        Crew::from_ordered(members)
    }
}

impl From<Crew> for Vec<EmployeeId> {
    fn from(crew: Crew) -> Self {
        crew.0
    }
}

/// A trip before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub postal_code: String,
    pub vehicle: VehicleId,
    pub crew: Crew,
    pub window: TimeWindow,
    pub status: TripStatus,
    pub collections: Vec<CollectionId>,
}

/// A persisted trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub postal_code: String,
    pub vehicle: VehicleId,
    pub crew: Crew,
    pub window: TimeWindow,
    pub status: TripStatus,
    pub collections: Vec<CollectionId>,
}

impl Trip {
    /// Attach a store-assigned id to a draft.
    pub fn from_draft(id: TripId, draft: TripDraft) -> Self {
        Self {
            id,
            postal_code: draft.postal_code,
            vehicle: draft.vehicle,
            crew: draft.crew,
            window: draft.window,
            status: draft.status,
            collections: draft.collections,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }

    /// Whether this trip currently blocks `vehicle` during `window`.
    pub fn blocks_vehicle(&self, vehicle: VehicleId, window: &TimeWindow) -> bool {
        self.is_active() && self.vehicle == vehicle && self.window.overlaps(window)
    }

    /// Whether this trip currently blocks `employee` during `window`.
    pub fn blocks_employee(&self, employee: EmployeeId, window: &TimeWindow) -> bool {
        self.is_active() && self.crew.contains(employee) && self.window.overlaps(window)
    }
}
