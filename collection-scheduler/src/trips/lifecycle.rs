//! Trip lifecycle: creation, activation, cancellation, completion and edits.
//!
//! ```text
//! PENDING --activate--> ACTIVE --complete--> COMPLETED
//!                         |
//!                         +----cancel----> CANCELED
//! ```
//!
//! Every operation runs against a single `&mut` borrow of the store, so the
//! availability check and the write that depends on it cannot interleave
//! with another caller's.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::domain::{
    Collection, CollectionId, CollectionStatus, Crew, Employee, EmployeeId, TimeWindow, Trip,
    TripDraft, TripId, TripStatus, Vehicle, VehicleId,
};
use crate::outcome::{Outcome, Rejection};
use crate::store::Storage;

use super::{CrewAssignmentValidator, CrewError, TripError};

/// Input for [`TripManager::create_trip`].
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub postal_code: String,
    pub vehicle: Option<VehicleId>,
    /// Driver first, then the other operators.
    pub crew: Vec<EmployeeId>,
    pub window: Option<TimeWindow>,
    /// `Active` to book resources now, `Pending` to draft.
    pub status: TripStatus,
    pub collections: Vec<CollectionId>,
}

/// Applies trip transitions against a store.
pub struct TripManager<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: Storage + ?Sized> TripManager<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Validate and persist a new trip, then link its collections to it.
    ///
    /// An `Active` trip must find its vehicle and every crew member free for
    /// the window; a `Pending` one holds nothing and is only checked when
    /// activated.
    pub fn create_trip(&mut self, request: NewTrip) -> Result<Trip, TripError> {
        let postal_code = request.postal_code.trim();
        if postal_code.is_empty() {
            return Err(TripError::EmptyPostalCode);
        }
        if !matches!(request.status, TripStatus::Pending | TripStatus::Active) {
            return Err(TripError::InvalidInitialStatus(request.status));
        }

        let vehicle_id = request.vehicle.ok_or(CrewError::MissingField("vehicle"))?;
        let (&driver_id, operator_ids) = request
            .crew
            .split_first()
            .ok_or(CrewError::MissingField("driver"))?;
        let window = request.window.ok_or(CrewError::MissingField("window"))?;

        let vehicle = self.vehicle(vehicle_id)?;
        let driver = self.employee(driver_id)?;
        let operators = operator_ids
            .iter()
            .map(|&id| self.employee(id))
            .collect::<Result<Vec<_>, _>>()?;

        let crew = CrewAssignmentValidator::validate(
            Some(&vehicle),
            Some(&driver),
            &operators,
            Some(&window),
        )?;

        if !vehicle.is_eligible_for(&window) {
            return Err(TripError::VehicleNotEligible(vehicle.id));
        }

        let collections = self.claimable_collections(postal_code, &request.collections)?;

        if request.status == TripStatus::Active {
            self.ensure_free(&window, vehicle.id, &crew, None)?;
        }

        let trip = self.store.save_trip(TripDraft {
            postal_code: postal_code.to_owned(),
            vehicle: vehicle.id,
            crew,
            window,
            status: request.status,
            collections: collections.iter().map(|c| c.id).collect(),
        })?;

        for mut collection in collections {
            collection.trip = Some(trip.id);
            self.store.update_collection(&collection)?;
        }

        info!(
            trip = %trip.id,
            vehicle = %trip.vehicle,
            window = %trip.window,
            status = %trip.status,
            crew = trip.crew.len(),
            "trip created"
        );
        Ok(trip)
    }

    /// PENDING -> ACTIVE, provided the vehicle and crew are still free.
    pub fn activate_trip(&mut self, id: TripId) -> Result<Outcome<Trip>, TripError> {
        let Some(mut trip) = self.store.find_trip(id)? else {
            return Ok(Outcome::NotFound);
        };
        if trip.status != TripStatus::Pending {
            return Ok(self.reject(&trip, TripStatus::Pending));
        }

        let vehicle = self.vehicle(trip.vehicle)?;
        if !vehicle.is_eligible_for(&trip.window) {
            return Err(TripError::VehicleNotEligible(vehicle.id));
        }
        self.ensure_free(&trip.window, trip.vehicle, &trip.crew, Some(trip.id))?;

        trip.status = TripStatus::Active;
        self.store.update_trip(&trip)?;
        info!(trip = %trip.id, "trip activated");
        Ok(Outcome::Applied(trip))
    }

    /// ACTIVE -> CANCELED. Linked collections are detached and stay active.
    pub fn cancel_trip(&mut self, id: TripId) -> Result<Outcome<Trip>, TripError> {
        let Some(mut trip) = self.store.find_trip(id)? else {
            return Ok(Outcome::NotFound);
        };
        if trip.status != TripStatus::Active {
            return Ok(self.reject(&trip, TripStatus::Active));
        }

        for &collection_id in &trip.collections {
            if let Some(mut collection) = self.store.find_collection(collection_id)? {
                if collection.trip == Some(trip.id) {
                    collection.trip = None;
                    self.store.update_collection(&collection)?;
                }
            }
        }

        let detached = std::mem::take(&mut trip.collections).len();
        trip.status = TripStatus::Canceled;
        self.store.update_trip(&trip)?;
        info!(trip = %trip.id, detached, "trip canceled");
        Ok(Outcome::Applied(trip))
    }

    /// ACTIVE -> COMPLETED, completing every linked collection.
    ///
    /// Nothing is written unless every linked collection is still active.
    pub fn complete_trip(&mut self, id: TripId) -> Result<Outcome<Trip>, TripError> {
        let Some(mut trip) = self.store.find_trip(id)? else {
            return Ok(Outcome::NotFound);
        };
        if trip.status != TripStatus::Active {
            return Ok(self.reject(&trip, TripStatus::Active));
        }

        let mut collections = Vec::with_capacity(trip.collections.len());
        for &collection_id in &trip.collections {
            let collection = self
                .store
                .find_collection(collection_id)?
                .ok_or(TripError::UnknownCollection(collection_id))?;
            if !collection.is_active() {
                warn!(
                    trip = %trip.id,
                    collection = %collection.id,
                    status = ?collection.status,
                    "trip not completed: collection is not active"
                );
                return Ok(Outcome::Rejected(Rejection::CollectionNotActive {
                    collection: collection.id,
                    status: collection.status,
                }));
            }
            collections.push(collection);
        }

        for mut collection in collections {
            collection.status = CollectionStatus::Completed;
            self.store.update_collection(&collection)?;
        }

        trip.status = TripStatus::Completed;
        self.store.update_trip(&trip)?;
        info!(trip = %trip.id, collections = trip.collections.len(), "trip completed");
        Ok(Outcome::Applied(trip))
    }

    /// Replace the vehicle of a trip.
    ///
    /// The current driver must be licensed for the new vehicle and the crew
    /// must match its required size. An active trip must also find the new
    /// vehicle free, ignoring its own booking.
    pub fn update_vehicle(&mut self, id: TripId, vehicle: VehicleId) -> Result<Trip, TripError> {
        let mut trip = self.trip(id)?;
        let vehicle = self.vehicle(vehicle)?;
        let driver = self.employee(trip.crew.driver())?;

        CrewAssignmentValidator::check(&vehicle, &driver, &trip.crew)?;
        if trip.is_active() {
            if !vehicle.is_eligible_for(&trip.window) {
                return Err(TripError::VehicleNotEligible(vehicle.id));
            }
            self.ensure_free(&trip.window, vehicle.id, &trip.crew, Some(trip.id))?;
        }

        let previous = std::mem::replace(&mut trip.vehicle, vehicle.id);
        self.store.update_trip(&trip)?;
        info!(trip = %trip.id, from = %previous, to = %trip.vehicle, "trip vehicle replaced");
        Ok(trip)
    }

    /// Replace the crew of a trip. `crew` lists the driver first.
    pub fn update_operators(
        &mut self,
        id: TripId,
        crew: Vec<EmployeeId>,
    ) -> Result<Trip, TripError> {
        let crew = Crew::from_ordered(crew).map_err(|_| CrewError::MissingField("driver"))?;
        let mut trip = self.trip(id)?;

        let driver = self.employee(crew.driver())?;
        for &member in crew.operators() {
            self.employee(member)?;
        }
        let vehicle = self.vehicle(trip.vehicle)?;

        CrewAssignmentValidator::check(&vehicle, &driver, &crew)?;
        if trip.is_active() {
            self.ensure_free(&trip.window, trip.vehicle, &crew, Some(trip.id))?;
        }

        trip.crew = crew;
        self.store.update_trip(&trip)?;
        info!(trip = %trip.id, crew = trip.crew.len(), "trip crew replaced");
        Ok(trip)
    }

    /// Trips visible to `employee`: all of them for office roles, otherwise
    /// only the trips the employee is crewing.
    pub fn trips_for(&self, employee: EmployeeId) -> Result<Vec<Trip>, TripError> {
        let employee = self.employee(employee)?;
        let trips = if employee.role.sees_all_trips() {
            self.store.all_trips()?
        } else {
            self.store.trips_by_operator(employee.id)?
        };
        Ok(trips)
    }

    fn trip(&self, id: TripId) -> Result<Trip, TripError> {
        self.store
            .find_trip(id)?
            .ok_or(TripError::TripNotFound(id))
    }

    fn vehicle(&self, id: VehicleId) -> Result<Vehicle, TripError> {
        self.store
            .find_vehicle(id)?
            .ok_or(TripError::UnknownVehicle(id))
    }

    fn employee(&self, id: EmployeeId) -> Result<Employee, TripError> {
        self.store
            .find_employee(id)?
            .ok_or(TripError::UnknownEmployee(id))
    }

    /// Load the requested collections, refusing any outside `postal_code`,
    /// held by another trip or no longer active. Repeated ids are collapsed.
    fn claimable_collections(
        &self,
        postal_code: &str,
        ids: &[CollectionId],
    ) -> Result<Vec<Collection>, TripError> {
        let mut seen = HashSet::new();
        let mut collections = Vec::with_capacity(ids.len());
        for &id in ids {
            if !seen.insert(id) {
                continue;
            }
            let collection = self
                .store
                .find_collection(id)?
                .ok_or(TripError::UnknownCollection(id))?;
            if collection.postal_code != postal_code {
                return Err(TripError::PostalCodeMismatch {
                    collection: id,
                    postal_code: collection.postal_code,
                });
            }
            if !collection.is_active() {
                return Err(TripError::CollectionNotActive(id));
            }
            if let Some(trip) = collection.trip {
                return Err(TripError::CollectionTaken {
                    collection: id,
                    trip,
                });
            }
            collections.push(collection);
        }
        Ok(collections)
    }

    fn ensure_free(
        &self,
        window: &TimeWindow,
        vehicle: VehicleId,
        crew: &Crew,
        excluding: Option<TripId>,
    ) -> Result<(), TripError> {
        let vehicles = self.store.find_available_vehicles(window, excluding)?;
        if !vehicles.iter().any(|v| v.id == vehicle) {
            warn!(%vehicle, %window, "vehicle already booked");
            return Err(TripError::VehicleUnavailable(vehicle));
        }

        let free: HashSet<EmployeeId> = self
            .store
            .find_available_employees(window, excluding)?
            .into_iter()
            .map(|e| e.id)
            .collect();
        if let Some(&busy) = crew.members().iter().find(|id| !free.contains(*id)) {
            warn!(employee = %busy, %window, "employee already booked");
            return Err(TripError::EmployeeUnavailable(busy));
        }

        Ok(())
    }

    fn reject(&self, trip: &Trip, expected: TripStatus) -> Outcome<Trip> {
        warn!(trip = %trip.id, status = %trip.status, %expected, "transition rejected");
        Outcome::Rejected(Rejection::TripNotInStatus {
            expected,
            actual: trip.status,
        })
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
