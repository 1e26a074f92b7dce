//! In-process store for tests. Emulates the Postgres constraints the services
//! rely on: unique employee id, unique (employee, day), FK restrict on delete.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use super::{AttendanceStore, EmployeeStore};
use crate::error::{AppError, AppResult};
use crate::model::attendance::{AttendanceEntry, AttendanceRecord, PRESENT};
use crate::model::employee::{Employee, EmployeeFields, EmployeeOption, NewEmployee};

#[derive(Default)]
struct Tables {
    /// Insertion order, oldest first.
    employees: Vec<Employee>,
    attendance: BTreeMap<(String, NaiveDate), AttendanceRecord>,
    next_log_id: i64,
}

pub struct MemoryStore {
    today: Mutex<NaiveDate>,
    tables: Mutex<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            today: Mutex::new(Utc::now().date_naive()),
            tables: Mutex::default(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the store's calendar, as if the database clock crossed midnight.
    pub fn set_today(&self, day: NaiveDate) {
        *self.today.lock().unwrap() = day;
    }

    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }

    pub fn record_count(&self) -> usize {
        self.tables.lock().unwrap().attendance.len()
    }

    fn entry(tables: &Tables, record: &AttendanceRecord) -> Option<AttendanceEntry> {
        let employee = tables
            .employees
            .iter()
            .find(|e| e.employee_id == record.employee_id)?;
        Some(AttendanceEntry {
            date: record.date,
            employee_id: employee.employee_id.clone(),
            first_name: employee.first_name.clone(),
            last_name: employee.last_name.clone(),
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            status: record.status.clone(),
            notes: record.notes.clone(),
        })
    }

    fn ensure_row<'a>(
        tables: &'a mut Tables,
        employee_id: &str,
        day: NaiveDate,
    ) -> AppResult<&'a mut AttendanceRecord> {
        if !tables.employees.iter().any(|e| e.employee_id == employee_id) {
            return Err(AppError::ReferentialIntegrity(format!(
                "Key (employee_id)=({employee_id}) is not present in table \"employees\"."
            )));
        }
        tables.next_log_id += 1;
        let log_id = tables.next_log_id;
        Ok(tables
            .attendance
            .entry((employee_id.to_string(), day))
            .or_insert_with(|| AttendanceRecord {
                log_id,
                employee_id: employee_id.to_string(),
                date: day,
                check_in_time: None,
                check_out_time: None,
                status: None,
                notes: None,
            }))
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list_employees(&self, search: Option<&str>, limit: i64) -> AppResult<Vec<Employee>> {
        let tables = self.tables.lock().unwrap();
        let needle = search.map(str::to_lowercase);
        let is_match = |e: &Employee| match &needle {
            None => true,
            Some(n) => [
                Some(&e.employee_id),
                Some(&e.first_name),
                Some(&e.last_name),
                e.email.as_ref(),
            ]
            .into_iter()
            .flatten()
            .any(|v| v.to_lowercase().contains(n.as_str())),
        };
        Ok(tables
            .employees
            .iter()
            .rev()
            .filter(|e| is_match(*e))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn employee_options(&self) -> AppResult<Vec<EmployeeOption>> {
        let tables = self.tables.lock().unwrap();
        let mut options: Vec<EmployeeOption> = tables
            .employees
            .iter()
            .map(|e| EmployeeOption {
                employee_id: e.employee_id.clone(),
                first_name: e.first_name.clone(),
                last_name: e.last_name.clone(),
            })
            .collect();
        options.sort_by(|a, b| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)));
        Ok(options)
    }

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .employees
            .iter()
            .any(|e| e.employee_id == employee.employee_id)
        {
            return Err(AppError::ConstraintViolation(format!(
                "Key (employee_id)=({}) already exists.",
                employee.employee_id
            )));
        }
        let fields = employee.fields.clone();
        let row = Employee {
            employee_id: employee.employee_id.clone(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            department: fields.department,
            job_title: fields.job_title,
            status: fields.status,
            hire_date: fields.hire_date,
            created_at: Some(Utc::now()),
        };
        tables.employees.push(row.clone());
        Ok(row)
    }

    async fn update_employee(&self, employee_id: &str, fields: &EmployeeFields) -> AppResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .employees
            .iter_mut()
            .find(|e| e.employee_id == employee_id)
        else {
            return Ok(0);
        };
        let fields = fields.clone();
        row.first_name = fields.first_name;
        row.last_name = fields.last_name;
        row.email = fields.email;
        row.department = fields.department;
        row.job_title = fields.job_title;
        row.status = fields.status;
        row.hire_date = fields.hire_date;
        Ok(1)
    }

    async fn delete_employee(&self, employee_id: &str) -> AppResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        if tables.attendance.keys().any(|(id, _)| id == employee_id) {
            return Err(AppError::ReferentialIntegrity(format!(
                "Key (employee_id)=({employee_id}) is still referenced from table \"attendance_log\"."
            )));
        }
        let before = tables.employees.len();
        tables.employees.retain(|e| e.employee_id != employee_id);
        Ok((before - tables.employees.len()) as u64)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn upsert_check_in(&self, employee_id: &str) -> AppResult<AttendanceRecord> {
        let today = self.today();
        let mut tables = self.tables.lock().unwrap();
        let fresh = !tables
            .attendance
            .contains_key(&(employee_id.to_string(), today));
        let row = Self::ensure_row(&mut tables, employee_id, today)?;
        if fresh {
            row.status = Some(PRESENT.to_string());
        }
        row.check_in_time.get_or_insert_with(Utc::now);
        Ok(row.clone())
    }

    async fn close_check_in(&self, employee_id: &str) -> AppResult<u64> {
        let today = self.today();
        let mut tables = self.tables.lock().unwrap();
        match tables.attendance.get_mut(&(employee_id.to_string(), today)) {
            Some(row) if row.check_in_time.is_some() && row.check_out_time.is_none() => {
                row.check_out_time = Some(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn write_status(
        &self,
        employee_id: &str,
        note: Option<&str>,
    ) -> AppResult<AttendanceRecord> {
        let today = self.today();
        let mut tables = self.tables.lock().unwrap();
        let row = Self::ensure_row(&mut tables, employee_id, today)?;
        row.status = note.map(str::to_string);
        row.notes = note.map(str::to_string);
        Ok(row.clone())
    }

    async fn delete_today(&self, employee_id: &str) -> AppResult<u64> {
        let today = self.today();
        let mut tables = self.tables.lock().unwrap();
        let removed = tables
            .attendance
            .remove(&(employee_id.to_string(), today))
            .is_some();
        Ok(u64::from(removed))
    }

    async fn find_today(&self, employee_id: &str) -> AppResult<Option<AttendanceRecord>> {
        let today = self.today();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .attendance
            .get(&(employee_id.to_string(), today))
            .cloned())
    }

    async fn list_today(&self) -> AppResult<Vec<AttendanceEntry>> {
        let today = self.today();
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<AttendanceEntry> = tables
            .attendance
            .values()
            .filter(|r| r.date == today)
            .filter_map(|r| Self::entry(&tables, r))
            .collect();
        rows.sort_by(|a, b| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)));
        Ok(rows)
    }

    async fn list_since(&self, days: u32) -> AppResult<Vec<AttendanceEntry>> {
        let cutoff = self.today() - Duration::days(i64::from(days));
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<AttendanceEntry> = tables
            .attendance
            .values()
            .filter(|r| r.date >= cutoff)
            .filter_map(|r| Self::entry(&tables, r))
            .collect();
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)))
        });
        Ok(rows)
    }
}
