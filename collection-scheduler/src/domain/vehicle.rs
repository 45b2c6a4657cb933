//! Collection vehicles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{LicenceClass, TimeWindow, VehicleId};

/// Operational status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    InService,
    InMaintenance,
    OutOfService,
}

/// A vehicle that can be assigned to trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,

    /// Licence plate, normalized to upper case.
    pub plate: String,

    /// Licence class the driver must hold.
    pub required_licence: LicenceClass,

    /// Exact crew size (driver included) needed to operate the vehicle.
    pub required_operators: usize,

    pub status: VehicleStatus,

    /// Next scheduled maintenance; the vehicle cannot be booked past it.
    pub next_maintenance: NaiveDate,
}

impl Vehicle {
    /// Whether the vehicle may be booked for `window`, ignoring other trips.
    ///
    /// The vehicle must be in service and its next maintenance must not fall
    /// before the day the window ends.
    pub fn is_eligible_for(&self, window: &TimeWindow) -> bool {
        self.status == VehicleStatus::InService && self.next_maintenance >= window.end_date()
    }
}
