//! Data transfer objects for web requests and responses.
//!
//! Ids in query strings are plain integers; JSON bodies use the domain id
//! types directly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CollectionId, CustomerId, Employee, EmployeeId, Frequency, InvalidWindow, Schedule,
    ScheduleStatus, TimeWindow, Trip, TripStatus, Vehicle, VehicleId, WasteType,
};
use crate::trips::NewTrip;

/// Query for free vehicles or employees.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,

    /// Trip under edit whose own booking is ignored
    pub trip: Option<u32>,
}

/// Query for drivers licensed for a vehicle.
#[derive(Debug, Deserialize)]
pub struct DriverQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub vehicle: u32,
}

/// Query for operators other than the chosen driver.
#[derive(Debug, Deserialize)]
pub struct OperatorQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub driver: u32,
}

/// Query for postal codes with pending collections.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// Query for the trips an employee may see.
#[derive(Debug, Deserialize)]
pub struct TripsQuery {
    pub employee: u32,
}

#[derive(Debug, Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Serialize)]
pub struct EmployeesResponse {
    pub employees: Vec<Employee>,
}

#[derive(Debug, Serialize)]
pub struct PostalCodesResponse {
    pub postal_codes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TripsResponse {
    pub trips: Vec<Trip>,
}

/// Request to create a trip.
///
/// Missing fields are let through so that the trip service reports which
/// one is absent.
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    #[serde(default)]
    pub postal_code: String,

    pub vehicle: Option<VehicleId>,

    /// Driver first, then the other operators
    #[serde(default)]
    pub crew: Vec<EmployeeId>,

    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,

    /// Defaults to `Active`
    #[serde(default = "active")]
    pub status: TripStatus,

    #[serde(default)]
    pub collections: Vec<CollectionId>,
}

fn active() -> TripStatus {
    TripStatus::Active
}

impl CreateTripRequest {
    /// Convert into the trip service's input.
    ///
    /// The window is only built when both ends are given; a reversed or
    /// empty window is an error.
    pub fn into_new_trip(self) -> Result<NewTrip, InvalidWindow> {
        let window = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(TimeWindow::new(start, end)?),
            _ => None,
        };
        Ok(NewTrip {
            postal_code: self.postal_code,
            vehicle: self.vehicle,
            crew: self.crew,
            window,
            status: self.status,
            collections: self.collections,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateVehicleRequest {
    pub vehicle: VehicleId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCrewRequest {
    /// Driver first
    pub crew: Vec<EmployeeId>,
}

/// A completed trip and the schedules moved on because of it.
#[derive(Debug, Serialize)]
pub struct CompleteTripResponse {
    pub trip: Trip,
    pub rescheduled: Vec<Schedule>,
}

#[derive(Debug, Deserialize)]
pub struct RecurringScheduleRequest {
    pub customer: CustomerId,
    pub waste: WasteType,
    pub start_date: NaiveDate,
    pub frequency: Frequency,
}

#[derive(Debug, Deserialize)]
pub struct OneTimeScheduleRequest {
    pub customer: CustomerId,
    pub waste: WasteType,
    pub pickup_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ScheduleStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFrequencyRequest {
    pub frequency: Frequency,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
