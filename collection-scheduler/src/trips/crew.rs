//! Crew assignment validation.
//!
//! A vehicle needs exactly `required_operators` people on board, and the
//! person at the wheel must hold a licence grade that covers the vehicle's
//! class. Both under- and over-staffing are rejected.

use crate::domain::{
    Crew, Employee, EmployeeId, LicenceClass, LicenceGrade, TimeWindow, Vehicle,
};

/// A violated crew rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrewError {
    /// A required part of the proposal is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The driver's licence does not cover the vehicle class.
    #[error("driver {driver} holds licence {grade}, vehicle requires {required}")]
    LicenceMismatch {
        driver: EmployeeId,
        grade: LicenceGrade,
        required: LicenceClass,
    },

    /// The crew is not exactly the size the vehicle needs.
    #[error("vehicle requires a crew of {required}, got {actual}")]
    CrewSizeMismatch { required: usize, actual: usize },
}

/// Checks a proposed (vehicle, driver, operators) assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrewAssignmentValidator;

impl CrewAssignmentValidator {
    /// Validate a proposal and return the ordered crew.
    ///
    /// The driver ends up at index 0. If the driver is also listed among the
    /// operators, or an operator is listed twice, the repeat is dropped before
    /// the size check, so a repeated name never counts as an extra person.
    ///
    /// # Examples
    ///
    /// ```
    /// use collection_scheduler::domain::*;
    /// use collection_scheduler::trips::{CrewAssignmentValidator, CrewError};
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    /// let window = TimeWindow::new(day.and_hms_opt(8, 0, 0).unwrap(), day.and_hms_opt(12, 0, 0).unwrap()).unwrap();
    /// let truck = Vehicle {
    ///     id: VehicleId(1),
    ///     plate: "AB123CD".into(),
    ///     required_licence: LicenceClass::C1,
    ///     required_operators: 2,
    ///     status: VehicleStatus::InService,
    ///     next_maintenance: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    /// };
    /// let person = |id, licence| Employee { id: EmployeeId(id), name: format!("E{id}"), role: Role::Operator, licence };
    ///
    /// let err = CrewAssignmentValidator::validate(
    ///     Some(&truck), Some(&person(1, LicenceGrade::B)), &[person(2, LicenceGrade::None)], Some(&window),
    /// );
    /// assert!(matches!(err, Err(CrewError::LicenceMismatch { .. })));
    ///
    /// let crew = CrewAssignmentValidator::validate(
    ///     Some(&truck), Some(&person(1, LicenceGrade::C1)), &[person(2, LicenceGrade::None)], Some(&window),
    /// )
    /// .unwrap();
    /// assert_eq!(crew.members(), &[EmployeeId(1), EmployeeId(2)]);
    /// ```
    pub fn validate(
        vehicle: Option<&Vehicle>,
        driver: Option<&Employee>,
        operators: &[Employee],
        window: Option<&TimeWindow>,
    ) -> Result<Crew, CrewError> {
        let vehicle = vehicle.ok_or(CrewError::MissingField("vehicle"))?;
        let driver = driver.ok_or(CrewError::MissingField("driver"))?;
        window.ok_or(CrewError::MissingField("window"))?;

        let crew = Crew::new(driver.id, operators.iter().map(|e| e.id));
        Self::check(vehicle, driver, &crew)?;
        Ok(crew)
    }

    /// Check an already-built crew against a vehicle.
    ///
    /// `driver` must be the employee at `crew.driver()`.
    pub fn check(vehicle: &Vehicle, driver: &Employee, crew: &Crew) -> Result<(), CrewError> {
        debug_assert_eq!(driver.id, crew.driver());

        if !driver.can_drive(vehicle.required_licence) {
            return Err(CrewError::LicenceMismatch {
                driver: driver.id,
                grade: driver.licence,
                required: vehicle.required_licence,
            });
        }

        if crew.len() != vehicle.required_operators {
            return Err(CrewError::CrewSizeMismatch {
                required: vehicle.required_operators,
                actual: crew.len(),
            });
        }

        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Role, VehicleId, VehicleStatus};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn window() -> TimeWindow {
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        TimeWindow::new(
            day.and_hms_opt(8, 0, 0).unwrap(),
            day.and_hms_opt(12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    proptest! {
        /// Accepted crews always have exactly the required size
        #[test]
        fn accepted_crew_has_exact_size(required in 1usize..6, operator_count in 0usize..8) {
            let v = Vehicle {
                id: VehicleId(1),
                plate: "X".into(),
                required_licence: LicenceClass::B,
                required_operators: required,
                status: VehicleStatus::InService,
                next_maintenance: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            };
            let driver = Employee {
                id: EmployeeId(0),
                name: "driver".into(),
                role: Role::Operator,
                licence: LicenceGrade::C,
            };
            let operators: Vec<Employee> = (1..=operator_count as u32)
                .map(|id| Employee {
                    id: EmployeeId(id),
                    name: format!("op{id}"),
                    role: Role::Operator,
                    licence: LicenceGrade::None,
                })
                .collect();

            let result = CrewAssignmentValidator::validate(Some(&v), Some(&driver), &operators, Some(&window()));
            if 1 + operator_count == required {
                let crew = result.unwrap();
                prop_assert_eq!(crew.len(), required);
                prop_assert_eq!(crew.driver(), EmployeeId(0));
            } else {
                let is_size_mismatch = matches!(result, Err(CrewError::CrewSizeMismatch { .. }));
                prop_assert!(is_size_mismatch);
            }
        }
    }
}
