use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display,
    EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl TryFrom<String> for EmployeeStatus {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().to_ascii_lowercase().parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "E1003",
        "first_name": "Ana",
        "last_name": "Lee",
        "email": "ana.lee@company.com",
        "department": "Operations",
        "job_title": "Analyst",
        "status": "active",
        "hire_date": "2024-01-01",
        "created_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = "E1003")]
    pub employee_id: String,

    #[schema(example = "Ana")]
    pub first_name: String,

    #[schema(example = "Lee")]
    pub last_name: String,

    #[schema(example = "ana.lee@company.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "Analyst", nullable = true)]
    pub job_title: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: EmployeeStatus,

    #[schema(example = "2024-01-01", value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Entry of the employee picker on the attendance form.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeOption {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Mutable fields of an employee. `create` also takes the id; `update`
/// replaces every field listed here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct EmployeeFields {
    #[schema(example = "Ana")]
    pub first_name: String,
    #[schema(example = "Lee")]
    pub last_name: String,
    #[schema(example = "ana.lee@company.com", nullable = true)]
    pub email: Option<String>,
    #[schema(example = "Operations", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "Analyst", nullable = true)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[schema(example = "2026-01-01", value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "E1003")]
    pub employee_id: String,
    #[serde(flatten)]
    pub fields: EmployeeFields,
}

impl EmployeeFields {
    /// Trims every text field, turns blank optionals into `None`, and rejects
    /// a missing first or last name.
    pub fn normalized(self) -> AppResult<Self> {
        let first_name = required(self.first_name, "first_name", "First name is required")?;
        let last_name = required(self.last_name, "last_name", "Last name is required")?;

        Ok(Self {
            first_name,
            last_name,
            email: blank_to_none(self.email),
            department: blank_to_none(self.department),
            job_title: blank_to_none(self.job_title),
            status: self.status,
            hire_date: self.hire_date,
        })
    }
}

impl NewEmployee {
    pub fn normalized(self) -> AppResult<Self> {
        let employee_id = required(self.employee_id, "employee_id", "Employee ID is required")?;
        Ok(Self {
            employee_id,
            fields: self.fields.normalized()?,
        })
    }
}

fn required(value: String, field: &'static str, message: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, message));
    }
    Ok(trimmed.to_string())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
