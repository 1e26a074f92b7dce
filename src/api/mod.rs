pub mod attendance;
pub mod employee;
pub mod health;

use actix_web::HttpResponse;
use serde_json::{Value, json};

use crate::service::Outcome;

/// Renders an action outcome as `{message, level, data}`. "Nothing happened"
/// outcomes come back as warnings, never as errors.
pub fn respond(outcome: Outcome) -> HttpResponse {
    let level = if outcome.is_warning() { "warning" } else { "success" };
    let message = outcome.message();

    let data = match &outcome {
        Outcome::CheckedIn(record) | Outcome::StatusUpdated(record) => {
            serde_json::to_value(record).unwrap_or(Value::Null)
        }
        Outcome::EmployeeCreated(employee) => serde_json::to_value(employee).unwrap_or(Value::Null),
        _ => Value::Null,
    };

    let mut builder = match outcome {
        Outcome::EmployeeCreated(_) => HttpResponse::Created(),
        Outcome::EmployeeNotFound { .. } => HttpResponse::NotFound(),
        _ => HttpResponse::Ok(),
    };

    builder.json(json!({
        "message": message,
        "level": level,
        "data": data,
    }))
}
