//! Represents an employee record, the unit of CRUD in this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single employee row.
///
/// The `file` column holds the generated filename of the optional attachment,
/// not the bytes themselves; the payload lives in the file store.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Employee {
    /// Database-assigned identifier, immutable after insert.
    pub id: i64,

    /// Display name, validated to 3-100 characters before persisting.
    pub name: String,

    /// Non-negative salary. Zero is a legitimate value.
    pub salary: f64,

    /// Generated attachment filename, if one was uploaded.
    pub file: Option<String>,

    /// Set once when the row is inserted.
    pub created_on: DateTime<Utc>,

    /// Set on every edit, absent until the first one.
    pub updated_on: Option<DateTime<Utc>>,
}

/// Fields for a not-yet-inserted employee. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub salary: f64,
    pub file: Option<String>,
    pub created_on: DateTime<Utc>,
}

/// Projection returned by the list endpoint.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct EmployeeSummary {
    pub id: i64,
    pub name: String,
    pub salary: f64,
    pub file: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl From<Employee> for EmployeeSummary {
    fn from(emp: Employee) -> Self {
        Self {
            id: emp.id,
            name: emp.name,
            salary: emp.salary,
            file: emp.file,
            created_on: emp.created_on,
        }
    }
}
