//! In-memory storage.
//!
//! Holds every entity in ordered maps so that query results come back in id
//! order. Used by the server binary (seeded from JSON) and by the tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::domain::{
    Collection, CollectionDraft, CollectionId, Customer, CustomerId, Employee, EmployeeId,
    Schedule, ScheduleDraft, ScheduleId, ScheduleStatus, TimeWindow, Trip, TripDraft, TripId,
    Vehicle, VehicleId, WasteType, WeekdayRule,
};

use super::{
    CollectionStore, FleetStore, ScheduleStore, Seed, StoreError, StoreResult, TripStore,
};

/// Storage backed by in-process maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    employees: BTreeMap<EmployeeId, Employee>,
    customers: BTreeMap<CustomerId, Customer>,
    weekday_rules: HashMap<WasteType, WeekdayRule>,
    trips: BTreeMap<TripId, Trip>,
    collections: BTreeMap<CollectionId, Collection>,
    schedules: BTreeMap<ScheduleId, Schedule>,
    next_trip: u32,
    next_collection: u32,
    next_schedule: u32,
    #[cfg(test)]
    writes_broken: bool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with reference data.
    pub fn from_seed(seed: Seed) -> Self {
        let mut store = Self::new();
        for vehicle in seed.vehicles {
            store.insert_vehicle(vehicle);
        }
        for employee in seed.employees {
            store.insert_employee(employee);
        }
        for customer in seed.customers {
            store.insert_customer(customer);
        }
        for rule in seed.weekday_rules {
            store.set_weekday_rule(rule);
        }
        store
    }

    /// Add or replace a vehicle. The plate is normalized to upper case.
    pub fn insert_vehicle(&mut self, mut vehicle: Vehicle) {
        vehicle.plate = vehicle.plate.trim().to_uppercase();
        self.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn insert_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }

    pub fn insert_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    /// Set the collection weekday for a waste type, replacing any previous rule.
    pub fn set_weekday_rule(&mut self, rule: WeekdayRule) {
        self.weekday_rules.insert(rule.waste.clone(), rule);
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Make every subsequent write fail with a backend error.
    #[cfg(test)]
    pub(crate) fn break_writes(&mut self) {
        self.writes_broken = true;
    }

    fn check_writable(&self) -> StoreResult<()> {
        #[cfg(test)]
        if self.writes_broken {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        Ok(())
    }

    fn active_trips_overlapping<'a>(
        &'a self,
        window: &'a TimeWindow,
        excluding: Option<TripId>,
    ) -> impl Iterator<Item = &'a Trip> + 'a {
        self.trips.values().filter(move |trip| {
            trip.is_active() && Some(trip.id) != excluding && trip.window.overlaps(window)
        })
    }
}

impl FleetStore for InMemoryStore {
    fn find_vehicle(&self, id: VehicleId) -> StoreResult<Option<Vehicle>> {
        Ok(self.vehicles.get(&id).cloned())
    }

    fn find_employee(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        Ok(self.employees.get(&id).cloned())
    }

    fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.customers.get(&id).cloned())
    }
}

impl TripStore for InMemoryStore {
    fn find_available_vehicles(
        &self,
        window: &TimeWindow,
        excluding: Option<TripId>,
    ) -> StoreResult<Vec<Vehicle>> {
        let busy: BTreeSet<VehicleId> = self
            .active_trips_overlapping(window, excluding)
            .map(|trip| trip.vehicle)
            .collect();

        Ok(self
            .vehicles
            .values()
            .filter(|v| !busy.contains(&v.id))
            .cloned()
            .collect())
    }

    fn find_available_employees(
        &self,
        window: &TimeWindow,
        excluding: Option<TripId>,
    ) -> StoreResult<Vec<Employee>> {
        let busy: BTreeSet<EmployeeId> = self
            .active_trips_overlapping(window, excluding)
            .flat_map(|trip| trip.crew.members().iter().copied())
            .collect();

        Ok(self
            .employees
            .values()
            .filter(|e| !busy.contains(&e.id))
            .cloned()
            .collect())
    }

    fn save_trip(&mut self, draft: TripDraft) -> StoreResult<Trip> {
        self.check_writable()?;
        self.next_trip += 1;
        let trip = Trip::from_draft(TripId(self.next_trip), draft);
        self.trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    fn update_trip(&mut self, trip: &Trip) -> StoreResult<()> {
        self.check_writable()?;
        match self.trips.get_mut(&trip.id) {
            Some(stored) => {
                *stored = trip.clone();
                Ok(())
            }
            None => Err(StoreError::missing("trip", trip.id)),
        }
    }

    fn find_trip(&self, id: TripId) -> StoreResult<Option<Trip>> {
        Ok(self.trips.get(&id).cloned())
    }

    fn all_trips(&self) -> StoreResult<Vec<Trip>> {
        Ok(self.trips.values().cloned().collect())
    }

    fn trips_by_operator(&self, employee: EmployeeId) -> StoreResult<Vec<Trip>> {
        Ok(self
            .trips
            .values()
            .filter(|trip| trip.crew.contains(employee))
            .cloned()
            .collect())
    }
}

impl CollectionStore for InMemoryStore {
    fn save_collection(&mut self, draft: CollectionDraft) -> StoreResult<Collection> {
        self.check_writable()?;
        self.next_collection += 1;
        let collection = Collection::from_draft(CollectionId(self.next_collection), draft);
        self.collections.insert(collection.id, collection.clone());
        Ok(collection)
    }

    fn update_collection(&mut self, collection: &Collection) -> StoreResult<()> {
        self.check_writable()?;
        match self.collections.get_mut(&collection.id) {
            Some(stored) => {
                *stored = collection.clone();
                Ok(())
            }
            None => Err(StoreError::missing("collection", collection.id)),
        }
    }

    fn find_collection(&self, id: CollectionId) -> StoreResult<Option<Collection>> {
        Ok(self.collections.get(&id).cloned())
    }

    fn collections_by_schedule(&self, schedule: ScheduleId) -> StoreResult<Vec<Collection>> {
        Ok(self
            .collections
            .values()
            .filter(|c| c.schedule == schedule)
            .cloned()
            .collect())
    }

    fn active_collections_for_schedule(
        &self,
        schedule: ScheduleId,
    ) -> StoreResult<Vec<Collection>> {
        let mut active: Vec<Collection> = self
            .collections
            .values()
            .filter(|c| c.schedule == schedule && c.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|c| (c.date, c.id));
        Ok(active)
    }

    fn find_available_postal_codes(&self, date: NaiveDate) -> StoreResult<Vec<String>> {
        let codes: BTreeSet<&str> = self
            .collections
            .values()
            .filter(|c| c.date == date && c.is_unassigned())
            .map(|c| c.postal_code.as_str())
            .collect();
        Ok(codes.into_iter().map(str::to_owned).collect())
    }
}

impl ScheduleStore for InMemoryStore {
    fn save_schedule(&mut self, draft: ScheduleDraft) -> StoreResult<Schedule> {
        self.check_writable()?;
        self.next_schedule += 1;
        let schedule = Schedule::from_draft(ScheduleId(self.next_schedule), draft);
        self.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    fn update_schedule(&mut self, schedule: &Schedule) -> StoreResult<()> {
        self.check_writable()?;
        match self.schedules.get_mut(&schedule.id) {
            Some(stored) => {
                *stored = schedule.clone();
                Ok(())
            }
            None => Err(StoreError::missing("schedule", schedule.id)),
        }
    }

    fn find_schedule(&self, id: ScheduleId) -> StoreResult<Option<Schedule>> {
        Ok(self.schedules.get(&id).cloned())
    }

    fn active_schedules_with_next_date_before(
        &self,
        today: NaiveDate,
    ) -> StoreResult<Vec<Schedule>> {
        Ok(self
            .schedules
            .values()
            .filter(|s| s.status == ScheduleStatus::Active)
            .filter(|s| {
                s.recurrence()
                    .and_then(|r| r.next_collection_date)
                    .is_some_and(|next| next < today)
            })
            .cloned()
            .collect())
    }

    fn active_schedules_without_future_collections(
        &self,
        today: NaiveDate,
    ) -> StoreResult<Vec<Schedule>> {
        Ok(self
            .schedules
            .values()
            .filter(|s| s.status == ScheduleStatus::Active)
            .filter(|s| {
                s.recurrence()
                    .is_some_and(|r| r.next_collection_date.is_some())
            })
            .filter(|s| {
                !self
                    .collections
                    .values()
                    .any(|c| c.schedule == s.id && c.is_active() && c.date >= today)
            })
            .cloned()
            .collect())
    }

    fn weekday_rule(&self, waste: &WasteType) -> StoreResult<Option<WeekdayRule>> {
        Ok(self.weekday_rules.get(waste).cloned())
    }
}
