use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status written by a check-in that creates the day's record.
pub const PRESENT: &str = "Present";

/// Default look-back window of the recent-attendance view.
pub const RECENT_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub log_id: i64,

    #[schema(example = "E1003")]
    pub employee_id: String,

    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(example = "Present", nullable = true)]
    pub status: Option<String>,

    #[schema(nullable = true)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn phase(&self) -> DayPhase {
        match (self.check_in_time, self.check_out_time) {
            (_, Some(_)) => DayPhase::Closed,
            (Some(_), None) => DayPhase::CheckedIn,
            (None, None) => DayPhase::Open,
        }
    }
}

/// Where a day's record stands in the check-in/check-out cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    /// Record exists (status/note only), nobody checked in.
    Open,
    CheckedIn,
    Closed,
}

/// Attendance row joined with the employee's name, as shown in the day and
/// recent views.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutOutcome {
    CheckedOut,
    NoOpenCheckIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NothingToDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

impl From<u64> for CheckOutOutcome {
    fn from(rows_affected: u64) -> Self {
        if rows_affected == 0 {
            CheckOutOutcome::NoOpenCheckIn
        } else {
            CheckOutOutcome::CheckedOut
        }
    }
}

impl From<u64> for DeleteOutcome {
    fn from(rows_affected: u64) -> Self {
        if rows_affected == 0 {
            DeleteOutcome::NothingToDelete
        } else {
            DeleteOutcome::Deleted
        }
    }
}

impl From<u64> for UpdateOutcome {
    fn from(rows_affected: u64) -> Self {
        if rows_affected == 0 {
            UpdateOutcome::NotFound
        } else {
            UpdateOutcome::Updated
        }
    }
}

/// Empty or whitespace-only notes clear the field.
pub fn normalize_note(note: &str) -> Option<String> {
    let trimmed = note.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
