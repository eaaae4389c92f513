//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own business rules that span more than one repository call.

pub mod employee_service;
