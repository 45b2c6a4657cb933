//! Domain types for collection scheduling.
//!
//! This module contains the core domain model: vehicles, employees, trips,
//! collections and schedules. Types that carry invariants (time windows,
//! crews) enforce them at construction time, so code that receives these
//! types can trust their validity.

mod collection;
mod ids;
mod licence;
mod people;
mod schedule;
mod trip;
mod vehicle;
mod window;

pub use collection::{Collection, CollectionDraft, CollectionStatus};
pub use ids::{CollectionId, CustomerId, EmployeeId, ScheduleId, TripId, VehicleId};
pub use licence::{LicenceClass, LicenceGrade};
pub use people::{Customer, Employee, Role};
pub use schedule::{
    Frequency, Recurrence, Schedule, ScheduleDraft, ScheduleKind, ScheduleStatus, WasteType,
    WeekdayRule,
};
pub use trip::{Crew, EmptyCrew, Trip, TripDraft, TripStatus};
pub use vehicle::{Vehicle, VehicleStatus};
pub use window::{InvalidWindow, TimeWindow};
