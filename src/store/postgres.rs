use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{AttendanceStore, EmployeeStore};
use crate::error::AppResult;
use crate::model::attendance::{AttendanceEntry, AttendanceRecord, PRESENT};
use crate::model::employee::{Employee, EmployeeFields, EmployeeOption, NewEmployee};

// Name and status columns are nullable in existing tables; read them with the
// defaults the rest of the app assumes.
const EMPLOYEE_COLUMNS: &str = "employee_id, \
     COALESCE(first_name, '') AS first_name, COALESCE(last_name, '') AS last_name, \
     email, department, job_title, COALESCE(status, 'active') AS status, hire_date, created_at";

const RECORD_COLUMNS: &str =
    "log_id, employee_id, date, check_in_time, check_out_time, status, notes";

const ENTRY_SELECT: &str = r#"
    SELECT
      al.date,
      e.employee_id,
      COALESCE(e.first_name, '') AS first_name,
      COALESCE(e.last_name, '') AS last_name,
      al.check_in_time,
      al.check_out_time,
      al.status,
      al.notes
    FROM attendance_log al
    JOIN employees e ON e.employee_id = al.employee_id
"#;

/// Both stores backed by one Postgres pool. Table names are unqualified; the
/// pool pins `search_path` to the configured schema.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so the term matches as a literal substring.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn list_employees(&self, search: Option<&str>, limit: i64) -> AppResult<Vec<Employee>> {
        let rows = match search {
            Some(term) => {
                let sql = format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees \
                     WHERE employee_id ILIKE $1 OR first_name ILIKE $1 \
                        OR last_name ILIKE $1 OR email ILIKE $1 \
                     ORDER BY created_at DESC NULLS LAST LIMIT $2"
                );
                debug!(sql = %sql, term, "Searching employees");
                sqlx::query_as::<_, Employee>(&sql)
                    .bind(like_pattern(term))
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees \
                     ORDER BY created_at DESC NULLS LAST LIMIT $1"
                );
                sqlx::query_as::<_, Employee>(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    async fn employee_options(&self) -> AppResult<Vec<EmployeeOption>> {
        let rows = sqlx::query_as::<_, EmployeeOption>(
            r#"
            SELECT employee_id,
                   COALESCE(first_name, '') AS first_name,
                   COALESCE(last_name, '') AS last_name
            FROM employees
            ORDER BY first_name, last_name, employee_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_employee(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = $1");
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> AppResult<Employee> {
        let fields = &employee.fields;
        let sql = format!(
            "INSERT INTO employees \
             (employee_id, first_name, last_name, email, department, job_title, status, hire_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now()) \
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.employee_id)
            .bind(&fields.first_name)
            .bind(&fields.last_name)
            .bind(&fields.email)
            .bind(&fields.department)
            .bind(&fields.job_title)
            .bind(fields.status.as_ref())
            .bind(fields.hire_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_employee(&self, employee_id: &str, fields: &EmployeeFields) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE employees
               SET first_name = $1,
                   last_name = $2,
                   email = $3,
                   department = $4,
                   job_title = $5,
                   status = $6,
                   hire_date = $7
             WHERE employee_id = $8
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.department)
        .bind(&fields.job_title)
        .bind(fields.status.as_ref())
        .bind(fields.hire_date)
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_employee(&self, employee_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AttendanceStore for PgStore {
    async fn upsert_check_in(&self, employee_id: &str) -> AppResult<AttendanceRecord> {
        let sql = format!(
            "INSERT INTO attendance_log (employee_id, date, check_in_time, status) \
             VALUES ($1, CURRENT_DATE, now(), $2) \
             ON CONFLICT (employee_id, date) \
             DO UPDATE SET check_in_time = COALESCE(attendance_log.check_in_time, EXCLUDED.check_in_time) \
             RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(PRESENT)
            .fetch_one(&self.pool)
            .await?;
        Ok(record)
    }

    async fn close_check_in(&self, employee_id: &str) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_log
               SET check_out_time = now()
             WHERE employee_id = $1
               AND date = CURRENT_DATE
               AND check_in_time IS NOT NULL
               AND check_out_time IS NULL
            "#,
        )
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn write_status(
        &self,
        employee_id: &str,
        note: Option<&str>,
    ) -> AppResult<AttendanceRecord> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO attendance_log (employee_id, date)
            VALUES ($1, CURRENT_DATE)
            ON CONFLICT (employee_id, date) DO NOTHING
            "#,
        )
        .bind(employee_id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "UPDATE attendance_log SET status = $1, notes = $1 \
             WHERE employee_id = $2 AND date = CURRENT_DATE \
             RETURNING {RECORD_COLUMNS}"
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(note)
            .bind(employee_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    async fn delete_today(&self, employee_id: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM attendance_log WHERE employee_id = $1 AND date = CURRENT_DATE",
        )
        .bind(employee_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_today(&self, employee_id: &str) -> AppResult<Option<AttendanceRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM attendance_log \
             WHERE employee_id = $1 AND date = CURRENT_DATE"
        );
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_today(&self) -> AppResult<Vec<AttendanceEntry>> {
        let sql = format!(
            "{ENTRY_SELECT} WHERE al.date = CURRENT_DATE ORDER BY e.first_name, e.last_name"
        );
        let rows = sqlx::query_as::<_, AttendanceEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_since(&self, days: u32) -> AppResult<Vec<AttendanceEntry>> {
        let sql = format!(
            "{ENTRY_SELECT} WHERE al.date >= CURRENT_DATE - $1::int \
             ORDER BY al.date DESC, e.first_name, e.last_name"
        );
        let days = i32::try_from(days).unwrap_or(i32::MAX);
        let rows = sqlx::query_as::<_, AttendanceEntry>(&sql)
            .bind(days)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
