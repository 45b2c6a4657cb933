//! Trip resource allocation.
//!
//! A trip books one vehicle and a crew for a time window. This module
//! answers which resources are free ([`ResourceAvailability`]), whether a
//! crew may operate a vehicle ([`CrewAssignmentValidator`]), and moves trips
//! through their lifecycle ([`TripManager`]).

mod availability;
mod crew;
mod error;
mod lifecycle;

pub use availability::ResourceAvailability;
pub use crew::{CrewAssignmentValidator, CrewError};
pub use error::TripError;
pub use lifecycle::{NewTrip, TripManager};
