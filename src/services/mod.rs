//! Storage services: relational rows in SQLite, attachment payloads on disk.

pub mod employee_store;
pub mod file_store;
