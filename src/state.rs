//! Shared application state handed to every handler via axum `State`.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::{employee_store::EmployeeStore, file_store::FileStore};

#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeStore,
    pub files: FileStore,
}

impl AppState {
    pub fn new(db: Arc<SqlitePool>, files_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            employees: EmployeeStore::new(db),
            files: FileStore::new(files_dir),
        }
    }
}
