//! Employees and customers.
//!
//! People are small flat records: an employee is a role plus a licence grade,
//! a customer is what collection generation needs to address a pickup.

use serde::{Deserialize, Serialize};

use super::{CustomerId, EmployeeId, LicenceClass, LicenceGrade};

/// Role of an employee within the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrator,
    OfficeWorker,
    Operator,
}

impl Role {
    /// Whether this role sees every trip rather than only its own.
    pub fn sees_all_trips(self) -> bool {
        matches!(self, Role::Administrator | Role::OfficeWorker)
    }
}

/// An employee who may be assigned to trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub licence: LicenceGrade,
}

impl Employee {
    /// Whether this employee may drive a vehicle of the given class.
    pub fn can_drive(&self, class: LicenceClass) -> bool {
        self.licence.can_drive(class)
    }
}

/// A customer subscribing to pickups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub postal_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn office_roles_see_all_trips() {
        assert!(Role::Administrator.sees_all_trips());
        assert!(Role::OfficeWorker.sees_all_trips());
        assert!(!Role::Operator.sees_all_trips());
    }

    #[test]
    fn licence_defaults_to_none() {
        let json = r#"{"id": 4, "name": "Ada", "role": "Operator"}"#;
        let e: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(e.licence, LicenceGrade::None);
        assert!(!e.can_drive(LicenceClass::B));
    }
}
