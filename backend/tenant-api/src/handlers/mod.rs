pub mod auth;
pub mod employees;
pub mod health;

pub use auth::{login, logout};
pub use employees::{add_employee, list_employees, search_employees, update_employee};
pub use health::health;
