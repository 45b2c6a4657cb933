//! Which vehicles, employees and postal codes are free for a time window.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Employee, EmployeeId, TimeWindow, TripId, Vehicle};
use crate::store::{CollectionStore, StoreResult, TripStore};

/// Read-only availability queries over a store.
///
/// A resource is busy when it belongs to an ACTIVE trip whose window
/// overlaps the requested one. Pending, completed and canceled trips hold
/// nothing.
pub struct ResourceAvailability<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> ResourceAvailability<'a, S>
where
    S: TripStore + CollectionStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Vehicles that are free, in service, and not due for maintenance
    /// before the window ends.
    pub fn available_vehicles(&self, window: &TimeWindow) -> StoreResult<Vec<Vehicle>> {
        self.vehicles(window, None)
    }

    /// Like [`available_vehicles`](Self::available_vehicles), ignoring the
    /// booking held by `trip`.
    pub fn available_vehicles_for_edit(
        &self,
        window: &TimeWindow,
        trip: TripId,
    ) -> StoreResult<Vec<Vehicle>> {
        self.vehicles(window, Some(trip))
    }

    /// Employees with no active trip overlapping `window`.
    pub fn available_employees(&self, window: &TimeWindow) -> StoreResult<Vec<Employee>> {
        self.employees(window, None)
    }

    /// Employees free during `window` if `trip` did not exist.
    pub fn available_employees_for_edit(
        &self,
        window: &TimeWindow,
        trip: TripId,
    ) -> StoreResult<Vec<Employee>> {
        self.employees(window, Some(trip))
    }

    /// Available employees whose licence covers `vehicle`.
    pub fn qualified_drivers(
        &self,
        window: &TimeWindow,
        vehicle: &Vehicle,
    ) -> StoreResult<Vec<Employee>> {
        let drivers: Vec<Employee> = self
            .employees(window, None)?
            .into_iter()
            .filter(|e| e.can_drive(vehicle.required_licence))
            .collect();
        debug!(
            vehicle = %vehicle.id,
            required = %vehicle.required_licence,
            count = drivers.len(),
            "qualified drivers"
        );
        Ok(drivers)
    }

    /// Available employees other than `driver`. No licence filter applies.
    pub fn available_operators_excluding(
        &self,
        window: &TimeWindow,
        driver: EmployeeId,
    ) -> StoreResult<Vec<Employee>> {
        let mut employees = self.employees(window, None)?;
        employees.retain(|e| e.id != driver);
        Ok(employees)
    }

    /// Postal codes with at least one active, unassigned collection on `date`.
    pub fn available_postal_codes(&self, date: NaiveDate) -> StoreResult<Vec<String>> {
        let codes = self.store.find_available_postal_codes(date)?;
        debug!(%date, count = codes.len(), "available postal codes");
        Ok(codes)
    }

    fn vehicles(&self, window: &TimeWindow, excluding: Option<TripId>) -> StoreResult<Vec<Vehicle>> {
        let free = self.store.find_available_vehicles(window, excluding)?;
        let total = free.len();
        let eligible: Vec<Vehicle> = free
            .into_iter()
            .filter(|v| v.is_eligible_for(window))
            .collect();
        debug!(
            %window,
            free = total,
            eligible = eligible.len(),
            "available vehicles"
        );
        Ok(eligible)
    }

    fn employees(
        &self,
        window: &TimeWindow,
        excluding: Option<TripId>,
    ) -> StoreResult<Vec<Employee>> {
        let employees = self.store.find_available_employees(window, excluding)?;
        debug!(%window, count = employees.len(), "available employees");
        Ok(employees)
    }
}
