//! Storage collaborator.
//!
//! The scheduling core never talks to a database directly. It consumes the
//! traits below, which a persistence layer implements; [`InMemoryStore`] is
//! the implementation used by the server binary and the tests.
//!
//! Reads take `&self`, writes take `&mut self`. A caller that holds a single
//! `&mut` borrow across "check availability, then save" therefore runs that
//! sequence without interleaving.

mod error;
mod memory;
mod seed;

use chrono::NaiveDate;

use crate::domain::{
    Collection, CollectionDraft, CollectionId, Customer, CustomerId, Employee, EmployeeId,
    Schedule, ScheduleDraft, ScheduleId, TimeWindow, Trip, TripDraft, TripId, Vehicle, VehicleId,
    WasteType, WeekdayRule,
};

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use seed::{Seed, SeedError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookup of the entities the core does not manage itself.
pub trait FleetStore {
    fn find_vehicle(&self, id: VehicleId) -> StoreResult<Option<Vehicle>>;

    fn find_employee(&self, id: EmployeeId) -> StoreResult<Option<Employee>>;

    fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>>;
}

/// Trip persistence and the window-overlap queries.
pub trait TripStore {
    /// Vehicles with no active trip overlapping `window`.
    ///
    /// `excluding` names a trip under edit whose own booking is ignored.
    /// Operational status and maintenance are not considered here.
    fn find_available_vehicles(
        &self,
        window: &TimeWindow,
        excluding: Option<TripId>,
    ) -> StoreResult<Vec<Vehicle>>;

    /// Employees with no active trip overlapping `window`.
    ///
    /// `excluding` names a trip under edit whose own booking is ignored.
    fn find_available_employees(
        &self,
        window: &TimeWindow,
        excluding: Option<TripId>,
    ) -> StoreResult<Vec<Employee>>;

    fn save_trip(&mut self, draft: TripDraft) -> StoreResult<Trip>;

    fn update_trip(&mut self, trip: &Trip) -> StoreResult<()>;

    fn find_trip(&self, id: TripId) -> StoreResult<Option<Trip>>;

    fn all_trips(&self) -> StoreResult<Vec<Trip>>;

    /// Trips whose crew includes `employee`, in any status.
    fn trips_by_operator(&self, employee: EmployeeId) -> StoreResult<Vec<Trip>>;
}

/// Collection persistence.
pub trait CollectionStore {
    fn save_collection(&mut self, draft: CollectionDraft) -> StoreResult<Collection>;

    fn update_collection(&mut self, collection: &Collection) -> StoreResult<()>;

    fn find_collection(&self, id: CollectionId) -> StoreResult<Option<Collection>>;

    fn collections_by_schedule(&self, schedule: ScheduleId) -> StoreResult<Vec<Collection>>;

    /// Active collections generated from `schedule`, earliest first.
    fn active_collections_for_schedule(
        &self,
        schedule: ScheduleId,
    ) -> StoreResult<Vec<Collection>>;

    /// Distinct postal codes with an active, unassigned collection on `date`.
    fn find_available_postal_codes(&self, date: NaiveDate) -> StoreResult<Vec<String>>;
}

/// Schedule persistence and weekday rules.
pub trait ScheduleStore {
    fn save_schedule(&mut self, draft: ScheduleDraft) -> StoreResult<Schedule>;

    fn update_schedule(&mut self, schedule: &Schedule) -> StoreResult<()>;

    fn find_schedule(&self, id: ScheduleId) -> StoreResult<Option<Schedule>>;

    /// Active recurring schedules whose next date is strictly before `today`.
    fn active_schedules_with_next_date_before(&self, today: NaiveDate)
    -> StoreResult<Vec<Schedule>>;

    /// Active recurring schedules with a next date but no active collection
    /// dated `today` or later.
    fn active_schedules_without_future_collections(
        &self,
        today: NaiveDate,
    ) -> StoreResult<Vec<Schedule>>;

    fn weekday_rule(&self, waste: &WasteType) -> StoreResult<Option<WeekdayRule>>;
}

/// Everything the scheduling core needs from storage.
pub trait Storage: FleetStore + TripStore + CollectionStore + ScheduleStore {}

impl<T: FleetStore + TripStore + CollectionStore + ScheduleStore> Storage for T {}
