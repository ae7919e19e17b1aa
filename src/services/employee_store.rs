//! EmployeeStore — sqlx CRUD over the `employees` table.
//!
//! Every operation is a single-row statement; there are no multi-row
//! transactions. Concurrent edits of the same id are last-write-wins at the
//! storage layer.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::employee::{Employee, EmployeeSummary, NewEmployee};

#[derive(Debug, Error)]
pub enum EmployeeStoreError {
    #[error("employee {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type EmployeeStoreResult<T> = Result<T, EmployeeStoreError>;

/// Relational persistence for employee rows.
#[derive(Clone)]
pub struct EmployeeStore {
    db: Arc<SqlitePool>,
}

impl EmployeeStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// All rows, projected to the list view. No pagination or ordering
    /// beyond insertion order.
    pub async fn list(&self) -> EmployeeStoreResult<Vec<EmployeeSummary>> {
        let rows = sqlx::query_as::<_, EmployeeSummary>(
            "SELECT id, name, salary, file, created_on FROM employees ORDER BY id",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> EmployeeStoreResult<Employee> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, salary, file, created_on, updated_on
             FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => EmployeeStoreError::NotFound(id),
            other => EmployeeStoreError::Sqlx(other),
        })
    }

    /// Insert a new row, returning it with the database-assigned id.
    pub async fn insert(&self, new: NewEmployee) -> EmployeeStoreResult<Employee> {
        let row = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, salary, file, created_on, updated_on)
             VALUES (?, ?, ?, ?, NULL)
             RETURNING id, name, salary, file, created_on, updated_on",
        )
        .bind(&new.name)
        .bind(new.salary)
        .bind(&new.file)
        .bind(new.created_on)
        .fetch_one(&*self.db)
        .await?;
        Ok(row)
    }

    /// Persist the mutable fields of an already-fetched row.
    pub async fn update(&self, employee: &Employee) -> EmployeeStoreResult<()> {
        let result = sqlx::query(
            "UPDATE employees SET name = ?, salary = ?, file = ?, updated_on = ?
             WHERE id = ?",
        )
        .bind(&employee.name)
        .bind(employee.salary)
        .bind(&employee.file)
        .bind(employee.updated_on)
        .bind(employee.id)
        .execute(&*self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(EmployeeStoreError::NotFound(employee.id));
        }
        Ok(())
    }

    /// Physically delete a row. Nothing soft about it.
    pub async fn delete(&self, id: i64) -> EmployeeStoreResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EmployeeStoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool with the employees schema applied.
    pub(crate) async fn test_pool() -> Arc<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                salary REAL NOT NULL,
                file TEXT,
                created_on TEXT NOT NULL,
                updated_on TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        Arc::new(pool)
    }

    fn new_employee(name: &str, salary: f64) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            salary,
            file: None,
            created_on: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_list_includes_row() {
        let store = EmployeeStore::new(test_pool().await);

        let before = Utc::now();
        let inserted = store.insert(new_employee("Alice", 50_000.0)).await.unwrap();
        assert!(inserted.id > 0);
        assert!(inserted.created_on >= before);
        assert!(inserted.updated_on.is_none());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Alice");
        assert_eq!(listed[0].salary, 50_000.0);
        assert_eq!(listed[0].file, None);
    }

    #[tokio::test]
    async fn get_by_id_misses_with_not_found() {
        let store = EmployeeStore::new(test_pool().await);
        let err = store.get_by_id(42).await.unwrap_err();
        assert!(matches!(err, EmployeeStoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn update_persists_mutated_fields() {
        let store = EmployeeStore::new(test_pool().await);
        let mut employee = store.insert(new_employee("Alice", 50_000.0)).await.unwrap();

        employee.name = "Alice B".to_string();
        employee.salary = 55_000.0;
        employee.file = Some("abc123cv.pdf".to_string());
        employee.updated_on = Some(Utc::now());
        store.update(&employee).await.unwrap();

        let fetched = store.get_by_id(employee.id).await.unwrap();
        assert_eq!(fetched.name, "Alice B");
        assert_eq!(fetched.salary, 55_000.0);
        assert_eq!(fetched.file.as_deref(), Some("abc123cv.pdf"));
        assert!(fetched.updated_on.is_some());
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let store = EmployeeStore::new(test_pool().await);
        let ghost = Employee {
            id: 99,
            name: "Ghost".to_string(),
            salary: 1.0,
            file: None,
            created_on: Utc::now(),
            updated_on: None,
        };
        let err = store.update(&ghost).await.unwrap_err();
        assert!(matches!(err, EmployeeStoreError::NotFound(99)));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let store = EmployeeStore::new(test_pool().await);
        let inserted = store.insert(new_employee("Alice", 50_000.0)).await.unwrap();

        store.delete(inserted.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete(inserted.id).await.unwrap_err();
        assert!(matches!(err, EmployeeStoreError::NotFound(_)));
    }
}
