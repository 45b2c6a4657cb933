//! Reference data loaded from JSON.
//!
//! Vehicles, employees, customers and weekday rules are owned by other
//! parts of the system. The server loads a snapshot of them from a JSON file
//! at startup:
//!
//! ```json
//! {
//!   "vehicles": [{"id": 1, "plate": "AB123CD", "required_licence": "C1",
//!                 "required_operators": 2, "status": "InService",
//!                 "next_maintenance": "2025-06-01"}],
//!   "employees": [{"id": 1, "name": "Ada", "role": "Operator", "licence": "C1"}],
//!   "customers": [{"id": 1, "name": "Rossi", "postal_code": "40100"}],
//!   "weekday_rules": [{"waste": "Plastic", "weekday": "Mon"}]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Customer, Employee, Vehicle, WeekdayRule};

/// Errors from loading seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse seed data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid seed data: {0}")]
    Invalid(String),
}

/// Snapshot of reference data.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub weekday_rules: Vec<WeekdayRule>,
}

impl Seed {
    /// Read and validate a seed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate seed data from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        let seed: Seed = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<(), SeedError> {
        let mut seen = HashSet::new();
        for v in &self.vehicles {
            if v.required_operators == 0 {
                return Err(SeedError::Invalid(format!(
                    "vehicle {} requires zero operators",
                    v.id
                )));
            }
            if !seen.insert(v.id) {
                return Err(SeedError::Invalid(format!("duplicate vehicle id {}", v.id)));
            }
        }

        let mut seen = HashSet::new();
        for e in &self.employees {
            if !seen.insert(e.id) {
                return Err(SeedError::Invalid(format!("duplicate employee id {}", e.id)));
            }
        }

        let mut seen = HashSet::new();
        for rule in &self.weekday_rules {
            if !seen.insert(&rule.waste) {
                return Err(SeedError::Invalid(format!(
                    "more than one weekday rule for {}",
                    rule.waste
                )));
            }
        }

        Ok(())
    }
}
