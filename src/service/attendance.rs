use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::model::attendance::{
    AttendanceEntry, AttendanceRecord, CheckOutOutcome, DeleteOutcome, normalize_note,
};
use crate::store::AttendanceStore;

/// Display-only freshness windows. Writes through this service invalidate both.
const TODAY_TTL: Duration = Duration::from_secs(30);
const RECENT_TTL: Duration = Duration::from_secs(120);

type Rows = Arc<Vec<AttendanceEntry>>;

#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    today_cache: Cache<(), Rows>,
    recent_cache: Cache<u32, Rows>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self {
            store,
            today_cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(TODAY_TTL)
                .build(),
            recent_cache: Cache::builder()
                .max_capacity(64)
                .time_to_live(RECENT_TTL)
                .build(),
        }
    }

    fn invalidate(&self) {
        self.today_cache.invalidate_all();
        self.recent_cache.invalidate_all();
    }

    pub async fn check_in(&self, employee_id: &str) -> AppResult<AttendanceRecord> {
        let employee_id = require_id(employee_id)?;
        let record = self.store.upsert_check_in(employee_id).await?;
        self.invalidate();
        info!(employee_id, log_id = record.log_id, "Checked in");
        Ok(record)
    }

    pub async fn check_out(&self, employee_id: &str) -> AppResult<CheckOutOutcome> {
        let employee_id = require_id(employee_id)?;
        let outcome = CheckOutOutcome::from(self.store.close_check_in(employee_id).await?);
        match outcome {
            CheckOutOutcome::CheckedOut => {
                self.invalidate();
                info!(employee_id, "Checked out");
            }
            CheckOutOutcome::NoOpenCheckIn => warn!(employee_id, "No open check-in for today"),
        }
        Ok(outcome)
    }

    /// Overwrites today's status and notes with `note`; a blank note clears both.
    pub async fn set_status(&self, employee_id: &str, note: &str) -> AppResult<AttendanceRecord> {
        let employee_id = require_id(employee_id)?;
        let note = normalize_note(note);
        let record = self
            .store
            .write_status(employee_id, note.as_deref())
            .await?;
        self.invalidate();
        info!(employee_id, status = ?record.status, "Status/notes updated");
        Ok(record)
    }

    pub async fn delete_today(&self, employee_id: &str) -> AppResult<DeleteOutcome> {
        let employee_id = require_id(employee_id)?;
        let outcome = DeleteOutcome::from(self.store.delete_today(employee_id).await?);
        if outcome == DeleteOutcome::Deleted {
            self.invalidate();
            info!(employee_id, "Deleted today's attendance");
        }
        Ok(outcome)
    }

    /// Always read from the store; never cached.
    pub async fn today_record(&self, employee_id: &str) -> AppResult<Option<AttendanceRecord>> {
        let employee_id = require_id(employee_id)?;
        self.store.find_today(employee_id).await
    }

    pub async fn list_today(&self) -> AppResult<Rows> {
        if let Some(rows) = self.today_cache.get(&()).await {
            debug!("Today's attendance served from cache");
            return Ok(rows);
        }
        let rows = Arc::new(self.store.list_today().await?);
        self.today_cache.insert((), rows.clone()).await;
        Ok(rows)
    }

    pub async fn list_recent(&self, days: u32) -> AppResult<Rows> {
        if let Some(rows) = self.recent_cache.get(&days).await {
            debug!(days, "Recent attendance served from cache");
            return Ok(rows);
        }
        let rows = Arc::new(self.store.list_since(days).await?);
        self.recent_cache.insert(days, rows.clone()).await;
        Ok(rows)
    }
}

fn require_id(employee_id: &str) -> AppResult<&str> {
    let trimmed = employee_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("employee_id", "Employee ID is required"));
    }
    Ok(trimmed)
}
