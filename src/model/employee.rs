//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record shared by repository and service.
//!
//! # Invariants
//! - `id` is assigned by storage on first persist and never reused.
//! - `first_name`, `last_name` and `email` are always present.
//! - At most one stored employee per `email` (enforced by the service
//!   before insert, not by the schema).

use serde::{Deserialize, Serialize};

/// Storage-assigned identifier for a persisted employee.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EmployeeId = i64;

/// Canonical employee record.
///
/// `id` stays `None` until the record is persisted for the first time;
/// repositories return a copy with `id` populated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable row id. `None` for records not yet persisted.
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    /// Business-unique address; the service rejects duplicates on create.
    pub email: String,
}

impl Employee {
    /// Creates a new, not-yet-persisted employee with an unset id.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Creates an employee with a known storage id.
    ///
    /// Used by rehydration paths where identity already exists in storage.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Returns whether this record has been persisted at least once.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
