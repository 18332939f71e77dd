pub mod analytics;
pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod payroll;
