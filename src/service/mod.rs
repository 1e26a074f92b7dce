pub mod action;
pub mod attendance;
pub mod employee;

pub use action::{Action, Dispatcher, Outcome};
pub use attendance::AttendanceService;
pub use employee::EmployeeRepository;
