//! Defines routes for the employee CRUD surface.
//!
//! ## Structure
//! - **Collection endpoints**
//!   - `GET    /employees` — list all rows, or one row via `?id=N`
//!   - `POST   /employees` — create (multipart: name, salary, optional file)
//!
//! - **Row endpoints**
//!   - `GET    /employees/{id}` — fetch one row (edit/delete views)
//!   - `POST   /employees/{id}` — edit (multipart, optional replacement file)
//!   - `DELETE /employees/{id}` — confirmed deletion
//!
//! - **Attachments**
//!   - `GET /files/{filename}` — stream a stored attachment
//!
//! Successful mutations answer with a 303 redirect to `/employees`.

use crate::{
    handlers::{
        employee_handlers::{
            create_employee, delete_employee, download_attachment, get_employee, list_employees,
            update_employee,
        },
        health_handlers::{healthz, readyz},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::get,
};

/// Build and return the router for all employee registry routes.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // collection routes
        .route("/employees", get(list_employees).post(create_employee))
        // row routes
        .route(
            "/employees/{id}",
            get(get_employee)
                .post(update_employee)
                .delete(delete_employee),
        )
        // attachment download
        .route("/files/{filename}", get(download_attachment))
}
