pub mod employee_handlers;
pub mod health_handlers;
