//! Core data models for the employee registry.
//!
//! Rows map to the database via `sqlx::FromRow` and serialize as JSON via
//! `serde`; form types capture what a client actually submitted.

pub mod employee;
pub mod forms;
