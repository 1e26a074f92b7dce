use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::model::attendance::{DeleteOutcome, UpdateOutcome};
use crate::model::employee::{Employee, EmployeeFields, EmployeeOption, NewEmployee};
use crate::store::EmployeeStore;

/// Hard cap on roster listings.
pub const LIST_LIMIT: i64 = 500;

const OPTIONS_TTL: Duration = Duration::from_secs(120);

/// Roster CRUD. Validates input before any write reaches the store.
#[derive(Clone)]
pub struct EmployeeRepository {
    store: Arc<dyn EmployeeStore>,
    options_cache: Cache<(), Arc<Vec<EmployeeOption>>>,
}

impl EmployeeRepository {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self {
            store,
            options_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(OPTIONS_TTL)
                .build(),
        }
    }

    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Employee>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.store.list_employees(search, LIST_LIMIT).await
    }

    /// Picker entries for the attendance form.
    pub async fn options(&self) -> AppResult<Arc<Vec<EmployeeOption>>> {
        if let Some(options) = self.options_cache.get(&()).await {
            return Ok(options);
        }
        let options = Arc::new(self.store.employee_options().await?);
        self.options_cache.insert((), options.clone()).await;
        Ok(options)
    }

    pub async fn get(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        self.store.find_employee(employee_id.trim()).await
    }

    pub async fn create(&self, input: NewEmployee) -> AppResult<Employee> {
        let input = input.normalized()?;
        let employee = self.store.insert_employee(&input).await?;
        self.options_cache.invalidate_all();
        info!(employee_id = %employee.employee_id, "Employee created");
        Ok(employee)
    }

    /// Replaces every mutable field. Zero rows affected means the id is unknown.
    pub async fn update(&self, employee_id: &str, fields: EmployeeFields) -> AppResult<UpdateOutcome> {
        let employee_id = employee_id.trim();
        let fields = fields.normalized()?;
        let outcome = UpdateOutcome::from(self.store.update_employee(employee_id, &fields).await?);
        if outcome == UpdateOutcome::Updated {
            self.options_cache.invalidate_all();
            info!(employee_id, "Employee updated");
        }
        Ok(outcome)
    }

    /// Callers must have confirmed the deletion; see `Action::DeleteEmployee`.
    pub async fn delete(&self, employee_id: &str) -> AppResult<DeleteOutcome> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(AppError::validation("employee_id", "Employee ID is required"));
        }
        let outcome = DeleteOutcome::from(self.store.delete_employee(employee_id).await?);
        if outcome == DeleteOutcome::Deleted {
            self.options_cache.invalidate_all();
            info!(employee_id, "Employee deleted");
        }
        Ok(outcome)
    }
}
