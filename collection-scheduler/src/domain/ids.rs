//! Identifier newtypes.
//!
//! Every persisted entity gets its own id type so a vehicle id can never be
//! passed where an employee id is expected. Ids are assigned by the store.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Vehicle`](super::Vehicle).
    VehicleId,
    "V"
);
entity_id!(
    /// Identifier of an [`Employee`](super::Employee).
    EmployeeId,
    "E"
);
entity_id!(
    /// Identifier of a [`Customer`](super::Customer).
    CustomerId,
    "C"
);
entity_id!(
    /// Identifier of a [`Trip`](super::Trip).
    TripId,
    "T"
);
entity_id!(
    /// Identifier of a [`Collection`](super::Collection).
    CollectionId,
    "COL"
);
entity_id!(
    /// Identifier of a [`Schedule`](super::Schedule).
    ScheduleId,
    "S"
);
