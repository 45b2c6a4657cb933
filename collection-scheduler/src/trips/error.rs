//! Trip service errors.

use crate::domain::{CollectionId, EmployeeId, TripId, TripStatus, VehicleId};
use crate::outcome::ErrorKind;
use crate::store::StoreError;

use super::CrewError;

/// Errors from trip operations.
///
/// Transitions that are merely not applicable are reported through
/// [`Outcome`](crate::outcome::Outcome), not here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripError {
    #[error("postal code must not be empty")]
    EmptyPostalCode,

    #[error("a new trip must be pending or active, not {0}")]
    InvalidInitialStatus(TripStatus),

    #[error(transparent)]
    Crew(#[from] CrewError),

    #[error("vehicle {0} is not in service or is due for maintenance")]
    VehicleNotEligible(VehicleId),

    #[error("vehicle {0} is already booked for an overlapping trip")]
    VehicleUnavailable(VehicleId),

    #[error("employee {0} is already booked for an overlapping trip")]
    EmployeeUnavailable(EmployeeId),

    #[error("trip {0} not found")]
    TripNotFound(TripId),

    #[error("vehicle {0} not found")]
    UnknownVehicle(VehicleId),

    #[error("employee {0} not found")]
    UnknownEmployee(EmployeeId),

    #[error("collection {0} not found")]
    UnknownCollection(CollectionId),

    #[error("collection {collection} is in postal code {postal_code}, not the trip's")]
    PostalCodeMismatch {
        collection: CollectionId,
        postal_code: String,
    },

    #[error("collection {0} is not active")]
    CollectionNotActive(CollectionId),

    #[error("collection {collection} is already assigned to trip {trip}")]
    CollectionTaken {
        collection: CollectionId,
        trip: TripId,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TripError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TripError::EmptyPostalCode
            | TripError::InvalidInitialStatus(_)
            | TripError::Crew(CrewError::MissingField(_)) => ErrorKind::InvalidInput,
            TripError::Crew(_)
            | TripError::VehicleNotEligible(_)
            | TripError::VehicleUnavailable(_)
            | TripError::EmployeeUnavailable(_)
            | TripError::PostalCodeMismatch { .. }
            | TripError::CollectionNotActive(_)
            | TripError::CollectionTaken { .. } => ErrorKind::RuleViolation,
            TripError::TripNotFound(_)
            | TripError::UnknownVehicle(_)
            | TripError::UnknownEmployee(_)
            | TripError::UnknownCollection(_) => ErrorKind::NotFound,
            TripError::Store(_) => ErrorKind::Persistence,
        }
    }
}
