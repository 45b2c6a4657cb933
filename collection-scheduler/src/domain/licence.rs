//! Driving licence hierarchy.
//!
//! Vehicle classes form a strict total order `B < C1 < C`. An employee may
//! drive every class up to and including their own grade; an employee without
//! a licence drives nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Licence class a vehicle requires of its driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LicenceClass {
    /// Vehicles up to 3.5 t.
    B,
    /// Vehicles between 3.5 t and 7.5 t.
    C1,
    /// Heavy vehicles over 7.5 t.
    C,
}

impl LicenceClass {
    /// All classes, lowest first.
    pub const ALL: [LicenceClass; 3] = [LicenceClass::B, LicenceClass::C1, LicenceClass::C];

    fn rank(self) -> u8 {
        match self {
            LicenceClass::B => 1,
            LicenceClass::C1 => 2,
            LicenceClass::C => 3,
        }
    }
}

impl fmt::Display for LicenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LicenceClass::B => "B",
            LicenceClass::C1 => "C1",
            LicenceClass::C => "C",
        };
        f.write_str(s)
    }
}

/// Licence grade held by an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LicenceGrade {
    #[default]
    None,
    B,
    C1,
    C,
}

impl LicenceGrade {
    fn rank(self) -> u8 {
        match self {
            LicenceGrade::None => 0,
            LicenceGrade::B => 1,
            LicenceGrade::C1 => 2,
            LicenceGrade::C => 3,
        }
    }

    /// Whether this grade qualifies a driver for `class`.
    ///
    /// # Examples
    ///
    /// ```
    /// use collection_scheduler::domain::{LicenceClass, LicenceGrade};
    ///
    /// assert!(LicenceGrade::C.can_drive(LicenceClass::C1));
    /// assert!(LicenceGrade::C1.can_drive(LicenceClass::C1));
    /// assert!(!LicenceGrade::B.can_drive(LicenceClass::C1));
    /// assert!(!LicenceGrade::None.can_drive(LicenceClass::B));
    /// ```
    pub fn can_drive(self, class: LicenceClass) -> bool {
        self != LicenceGrade::None && self.rank() >= class.rank()
    }

    /// Vehicle classes this grade may drive, lowest first.
    pub fn allowed_classes(self) -> Vec<LicenceClass> {
        LicenceClass::ALL
            .into_iter()
            .filter(|class| self.can_drive(*class))
            .collect()
    }
}

impl fmt::Display for LicenceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LicenceGrade::None => "none",
            LicenceGrade::B => "B",
            LicenceGrade::C1 => "C1",
            LicenceGrade::C => "C",
        };
        f.write_str(s)
    }
}
