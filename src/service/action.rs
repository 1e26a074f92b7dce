use crate::error::{AppError, AppResult};
use crate::model::attendance::{AttendanceRecord, CheckOutOutcome, DeleteOutcome, UpdateOutcome};
use crate::model::employee::{Employee, EmployeeFields, NewEmployee};

use super::{AttendanceService, EmployeeRepository};

/// Every state-changing request the front-end can make.
#[derive(Debug, Clone)]
pub enum Action {
    CheckIn { employee_id: String },
    CheckOut { employee_id: String },
    SetStatus { employee_id: String, note: String },
    DeleteToday { employee_id: String },
    CreateEmployee(NewEmployee),
    UpdateEmployee { employee_id: String, fields: EmployeeFields },
    DeleteEmployee { employee_id: String, confirmed: bool },
}

/// What an action did. Outcomes with `is_warning() == true` are "nothing
/// happened" results, shown to the user but not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    CheckedIn(AttendanceRecord),
    CheckedOut { employee_id: String },
    NoOpenCheckIn { employee_id: String },
    StatusUpdated(AttendanceRecord),
    AttendanceDeleted { employee_id: String },
    NoAttendanceToday { employee_id: String },
    EmployeeCreated(Employee),
    EmployeeUpdated { employee_id: String },
    EmployeeDeleted { employee_id: String },
    EmployeeNotFound { employee_id: String },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::CheckedIn(r) => format!("{} checked in.", r.employee_id),
            Outcome::CheckedOut { employee_id } => format!("{employee_id} checked out."),
            Outcome::NoOpenCheckIn { .. } => "No open check-in for today.".to_string(),
            Outcome::StatusUpdated(_) => "Status/notes updated.".to_string(),
            Outcome::AttendanceDeleted { employee_id } => {
                format!("Today's attendance for {employee_id} deleted.")
            }
            Outcome::NoAttendanceToday { employee_id } => {
                format!("No attendance recorded today for {employee_id}.")
            }
            Outcome::EmployeeCreated(e) => format!("Employee {} created.", e.employee_id),
            Outcome::EmployeeUpdated { employee_id } => format!("Employee {employee_id} updated."),
            Outcome::EmployeeDeleted { employee_id } => format!("Employee {employee_id} deleted."),
            Outcome::EmployeeNotFound { employee_id } => {
                format!("Employee {employee_id} not found.")
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Outcome::NoOpenCheckIn { .. }
                | Outcome::NoAttendanceToday { .. }
                | Outcome::EmployeeNotFound { .. }
        )
    }
}

/// Routes actions to the attendance service or the roster.
#[derive(Clone)]
pub struct Dispatcher {
    pub attendance: AttendanceService,
    pub employees: EmployeeRepository,
}

impl Dispatcher {
    pub fn new(attendance: AttendanceService, employees: EmployeeRepository) -> Self {
        Self {
            attendance,
            employees,
        }
    }

    pub async fn dispatch(&self, action: Action) -> AppResult<Outcome> {
        let outcome = match action {
            Action::CheckIn { employee_id } => {
                Outcome::CheckedIn(self.attendance.check_in(&employee_id).await?)
            }
            Action::CheckOut { employee_id } => match self.attendance.check_out(&employee_id).await? {
                CheckOutOutcome::CheckedOut => Outcome::CheckedOut { employee_id },
                CheckOutOutcome::NoOpenCheckIn => Outcome::NoOpenCheckIn { employee_id },
            },
            Action::SetStatus { employee_id, note } => {
                Outcome::StatusUpdated(self.attendance.set_status(&employee_id, &note).await?)
            }
            Action::DeleteToday { employee_id } => {
                match self.attendance.delete_today(&employee_id).await? {
                    DeleteOutcome::Deleted => Outcome::AttendanceDeleted { employee_id },
                    DeleteOutcome::NothingToDelete => Outcome::NoAttendanceToday { employee_id },
                }
            }
            Action::CreateEmployee(input) => {
                Outcome::EmployeeCreated(self.employees.create(input).await?)
            }
            Action::UpdateEmployee {
                employee_id,
                fields,
            } => match self.employees.update(&employee_id, fields).await? {
                UpdateOutcome::Updated => Outcome::EmployeeUpdated { employee_id },
                UpdateOutcome::NotFound => Outcome::EmployeeNotFound { employee_id },
            },
            Action::DeleteEmployee {
                employee_id,
                confirmed,
            } => {
                if !confirmed {
                    return Err(AppError::validation(
                        "confirm",
                        "Deleting an employee must be confirmed",
                    ));
                }
                match self.employees.delete(&employee_id).await? {
                    DeleteOutcome::Deleted => Outcome::EmployeeDeleted { employee_id },
                    DeleteOutcome::NothingToDelete => Outcome::EmployeeNotFound { employee_id },
                }
            }
        };
        Ok(outcome)
    }
}
