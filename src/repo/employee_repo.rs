//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `employees` storage.
//! - Keep SQL details inside the core persistence boundary.
//! - Offer several observably-equivalent name-lookup entry points built on
//!   different statement/binding mechanisms.
//!
//! # Invariants
//! - `save` never enforces email uniqueness; that rule lives in the service.
//! - All four name-lookup variants agree: exactly-one match returns that
//!   row, no match returns `RepoError::NotFound`, several matches return
//!   the lowest-id row.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId};
use rusqlite::{named_params, params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email
FROM employees";

const REQUIRED_COLUMNS: &[&str] = &["id", "first_name", "last_name", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No employee matched the described lookup criteria.
    NotFound(String),
    /// The connection has not been migrated to the supported schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(criteria) => write!(f, "employee not found: {criteria}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for employee CRUD and lookup operations.
///
/// The four `find_by_name*` variants exist as separate entry points on
/// purpose: each uses a different statement-construction or
/// parameter-binding mechanism, and the contract is that all of them
/// return the same result for the same inputs.
pub trait EmployeeRepository {
    /// Inserts when `employee.id` is unset, otherwise replaces the full row.
    ///
    /// Returns the persisted record with `id` populated on insert.
    /// Replacing a row that does not exist returns `RepoError::NotFound`.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Returns every stored employee; empty vec when the store is empty.
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
    /// Gets one employee by id. Absence is `None`, not an error.
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Removes the given record. No-op when the record was never persisted
    /// or is already gone.
    fn delete(&self, employee: &Employee) -> RepoResult<()>;
    /// Removes the row with the given id. Idempotent.
    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()>;
    /// Exact-match lookup by the business-unique email field.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
    /// Name lookup via the shared statement with positional binding.
    fn find_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Employee>;
    /// Name lookup via the shared statement with named binding.
    fn find_by_name_named(&self, first_name: &str, last_name: &str) -> RepoResult<Employee>;
    /// Name lookup via a self-contained raw statement with positional binding.
    fn find_by_name_sql(&self, first_name: &str, last_name: &str) -> RepoResult<Employee>;
    /// Name lookup via a self-contained raw statement with named binding.
    fn find_by_name_sql_named(&self, first_name: &str, last_name: &str) -> RepoResult<Employee>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `employees` shape is incomplete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        match employee.id {
            None => {
                self.conn.execute(
                    "INSERT INTO employees (first_name, last_name, email)
                     VALUES (?1, ?2, ?3);",
                    params![
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.email.as_str(),
                    ],
                )?;

                let id = self.conn.last_insert_rowid();
                Ok(Employee::with_id(
                    id,
                    employee.first_name.clone(),
                    employee.last_name.clone(),
                    employee.email.clone(),
                ))
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE employees
                     SET
                        first_name = ?1,
                        last_name = ?2,
                        email = ?3
                     WHERE id = ?4;",
                    params![
                        employee.first_name.as_str(),
                        employee.last_name.as_str(),
                        employee.email.as_str(),
                        id,
                    ],
                )?;

                if changed == 0 {
                    return Err(RepoError::NotFound(format!("id={id}")));
                }

                Ok(employee.clone())
            }
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        // Order by id for stable iteration; callers must not rely on it.
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn delete(&self, employee: &Employee) -> RepoResult<()> {
        match employee.id {
            Some(id) => self.delete_by_id(id),
            // Never persisted, nothing to remove.
            None => Ok(()),
        }
    }

    fn delete_by_id(&self, id: EmployeeId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM employees WHERE id = ?1;", params![id])?;
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query(params![email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn find_by_name(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE first_name = ?1 AND last_name = ?2
             ORDER BY id
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![first_name, last_name])?;
        single_name_match(rows.next()?, first_name, last_name)
    }

    fn find_by_name_named(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
        let mut stmt = self.conn.prepare(&format!(
            "{EMPLOYEE_SELECT_SQL}
             WHERE first_name = :first_name AND last_name = :last_name
             ORDER BY id
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(named_params! {
            ":first_name": first_name,
            ":last_name": last_name,
        })?;
        single_name_match(rows.next()?, first_name, last_name)
    }

    fn find_by_name_sql(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, email
             FROM employees
             WHERE first_name = ?1 AND last_name = ?2
             ORDER BY id
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(params![first_name, last_name])?;
        single_name_match(rows.next()?, first_name, last_name)
    }

    fn find_by_name_sql_named(&self, first_name: &str, last_name: &str) -> RepoResult<Employee> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name, last_name, email
             FROM employees
             WHERE first_name = :first_name AND last_name = :last_name
             ORDER BY id
             LIMIT 1;",
        )?;
        let mut rows = stmt.query(named_params! {
            ":first_name": first_name,
            ":last_name": last_name,
        })?;
        single_name_match(rows.next()?, first_name, last_name)
    }
}

fn single_name_match(
    row: Option<&Row<'_>>,
    first_name: &str,
    last_name: &str,
) -> RepoResult<Employee> {
    match row {
        Some(row) => parse_employee_row(row),
        None => Err(RepoError::NotFound(format!(
            "first_name=`{first_name}` last_name=`{last_name}`"
        ))),
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    Ok(Employee {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'employees'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for &column in REQUIRED_COLUMNS {
        let column_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM pragma_table_info('employees')
                WHERE name = ?1
            );",
            params![column],
            |row| row.get(0),
        )?;
        if column_exists == 0 {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}
