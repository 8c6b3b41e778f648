pub mod attendance;
pub mod employee;
mod macros;
pub mod payroll;
pub mod user;

// Re-export all models for easy importing
pub use attendance::*;
pub use employee::*;
pub use payroll::*;
pub use user::*;
