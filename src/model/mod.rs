//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted employee is identified by a storage-assigned
//!   `EmployeeId`; the id never changes once assigned.
//! - Email uniqueness is a business invariant owned by the service layer,
//!   not a structural property of the model.

pub mod employee;
