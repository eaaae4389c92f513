//! Employee use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Enforce the email-uniqueness rule before any insert.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - `save_employee` never calls `save` when the email is already taken.
//! - The service holds no state; every call round-trips to storage.
//! - Absence on id lookups is a normal `None` outcome, never an error.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum EmployeeServiceError {
    /// Another employee already holds this email address.
    EmailAlreadyExists(String),
    /// Update was requested for a record that was never persisted.
    MissingId,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EmployeeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailAlreadyExists(email) => {
                write!(f, "employee with email `{email}` already exists")
            }
            Self::MissingId => write!(f, "employee record has no id; save it first"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmployeeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for employee CRUD operations.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new employee after checking that the email is free.
    ///
    /// # Contract
    /// - Fails with `EmailAlreadyExists` when any stored record holds the
    ///   same email, without touching the store.
    /// - The check and the insert are two separate storage calls; two
    ///   concurrent creates with the same new email can both pass the
    ///   check. The schema carries no unique index, so uniqueness here is
    ///   best-effort validation, not a structural guarantee.
    pub fn save_employee(&self, employee: Employee) -> Result<Employee, EmployeeServiceError> {
        if let Some(existing) = self.repo.find_by_email(&employee.email)? {
            return Err(EmployeeServiceError::EmailAlreadyExists(existing.email));
        }

        Ok(self.repo.save(&employee)?)
    }

    /// Lists every stored employee. Empty vec when the store is empty.
    pub fn get_all_employees(&self) -> Result<Vec<Employee>, EmployeeServiceError> {
        Ok(self.repo.find_all()?)
    }

    /// Gets one employee by id. `None` is a valid, non-error outcome.
    pub fn get_employee_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<Employee>, EmployeeServiceError> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Replaces the full record identified by `employee.id`.
    ///
    /// No merge/partial-update semantics: the caller supplies every field.
    pub fn update_employee(&self, employee: Employee) -> Result<Employee, EmployeeServiceError> {
        if !employee.is_persisted() {
            return Err(EmployeeServiceError::MissingId);
        }

        Ok(self.repo.save(&employee)?)
    }

    /// Deletes the employee with the given id. No-op when the id is absent.
    pub fn delete_employee(&self, id: EmployeeId) -> Result<(), EmployeeServiceError> {
        Ok(self.repo.delete_by_id(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeService, EmployeeServiceError};
    use crate::model::employee::{Employee, EmployeeId};
    use crate::repo::employee_repo::{EmployeeRepository, RepoError, RepoResult};
    use std::cell::{Cell, RefCell};

    /// In-memory fake that records how often each write path is hit.
    #[derive(Default)]
    struct RecordingRepo {
        rows: RefCell<Vec<Employee>>,
        save_calls: Cell<u32>,
    }

    impl RecordingRepo {
        fn with_rows(rows: Vec<Employee>) -> Self {
            Self {
                rows: RefCell::new(rows),
                save_calls: Cell::new(0),
            }
        }
    }

    impl EmployeeRepository for RecordingRepo {
        fn save(&self, employee: &Employee) -> RepoResult<Employee> {
            self.save_calls.set(self.save_calls.get() + 1);
            let mut rows = self.rows.borrow_mut();
            match employee.id {
                None => {
                    let id = rows.len() as EmployeeId + 1;
                    let stored = Employee {
                        id: Some(id),
                        ..employee.clone()
                    };
                    rows.push(stored.clone());
                    Ok(stored)
                }
                Some(id) => {
                    let slot = rows
                        .iter_mut()
                        .find(|row| row.id == Some(id))
                        .ok_or_else(|| RepoError::NotFound(format!("id={id}")))?;
                    *slot = employee.clone();
                    Ok(employee.clone())
                }
            }
        }

        fn find_all(&self) -> RepoResult<Vec<Employee>> {
            Ok(self.rows.borrow().clone())
        }

        fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|row| row.id == Some(id))
                .cloned())
        }

        fn delete(&self, employee: &Employee) -> RepoResult<()> {
            match employee.id {
                Some(id) => self.delete_by_id(id),
                None => Ok(()),
            }
        }

        fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()> {
            self.rows.borrow_mut().retain(|row| row.id != Some(id));
            Ok(())
        }

        fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|row| row.email == email)
                .cloned())
        }

        fn find_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
            self.rows
                .borrow()
                .iter()
                .find(|row| row.first_name == first_name && row.last_name == last_name)
                .cloned()
                .ok_or_else(|| {
                    RepoError::NotFound(format!(
                        "first_name=`{first_name}` last_name=`{last_name}`"
                    ))
                })
        }

        fn find_by_name_named(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
            self.find_by_name(first_name, last_name)
        }

        fn find_by_name_sql(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
            self.find_by_name(first_name, last_name)
        }

        fn find_by_name_sql_named(
            &self,
            first_name: &str,
            last_name: &str,
        ) -> RepoResult<Employee> {
            self.find_by_name(first_name, last_name)
        }
    }

    fn heikel() -> Employee {
        Employee::new("Heikel", "Khaldi", "heikel.khaldi1@gmail.com")
    }

    #[test]
    fn save_employee_persists_when_email_is_free() {
        let service = EmployeeService::new(RecordingRepo::default());

        let saved = service.save_employee(heikel()).unwrap();

        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.first_name, "Heikel");
    }

    #[test]
    fn save_employee_with_taken_email_never_reaches_save() {
        let existing = Employee::with_id(1, "Heikel", "Khaldi", "heikel.khaldi1@gmail.com");
        let repo = RecordingRepo::with_rows(vec![existing]);
        let service = EmployeeService::new(repo);

        let err = service.save_employee(heikel()).unwrap_err();

        assert!(matches!(
            err,
            EmployeeServiceError::EmailAlreadyExists(email)
                if email == "heikel.khaldi1@gmail.com"
        ));
        assert_eq!(service.repo.save_calls.get(), 0);
        assert_eq!(service.repo.rows.borrow().len(), 1);
    }

    #[test]
    fn get_all_employees_passes_through_empty_store() {
        let service = EmployeeService::new(RecordingRepo::default());

        let all = service.get_all_employees().unwrap();

        assert!(all.is_empty());
    }

    #[test]
    fn get_employee_by_id_returns_none_for_missing_row() {
        let service = EmployeeService::new(RecordingRepo::default());

        assert!(service.get_employee_by_id(42).unwrap().is_none());
    }

    #[test]
    fn update_employee_requires_persisted_record() {
        let service = EmployeeService::new(RecordingRepo::default());

        let err = service.update_employee(heikel()).unwrap_err();

        assert!(matches!(err, EmployeeServiceError::MissingId));
    }

    #[test]
    fn update_employee_replaces_full_record() {
        let existing = Employee::with_id(1, "Heikel", "Khaldi", "heikel.khaldi1@gmail.com");
        let service = EmployeeService::new(RecordingRepo::with_rows(vec![existing]));

        let mut changed = Employee::with_id(1, "Haykel", "Khaldi", "heikel.khaldi1@gmail.com");
        changed = service.update_employee(changed).unwrap();

        assert_eq!(changed.first_name, "Haykel");
        let reloaded = service.get_employee_by_id(1).unwrap().unwrap();
        assert_eq!(reloaded.first_name, "Haykel");
    }

    #[test]
    fn delete_employee_is_noop_for_missing_id() {
        let service = EmployeeService::new(RecordingRepo::default());

        service.delete_employee(99).unwrap();

        assert!(service.get_all_employees().unwrap().is_empty());
    }
}
