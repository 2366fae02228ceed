pub mod employees;
pub mod users;

pub use employees::{EmployeeRepository, InMemoryEmployeeRepository};
pub use users::{StaticUserDirectory, UserDirectory};
