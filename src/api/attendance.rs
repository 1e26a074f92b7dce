use crate::api::respond;
use crate::error::AppResult;
use crate::model::attendance::RECENT_DAYS;
use crate::service::{Action, Dispatcher};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Longest look-back the recent view accepts.
const MAX_RECENT_DAYS: u32 = 366;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentQuery {
    /// Days to look back (default 30)
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusReq {
    /// Written to both status and notes; empty clears them.
    #[schema(example = "Sick")]
    #[serde(default)]
    pub note: String,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{employee_id}/check-in",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Checked in (first check-in time is kept)", body = Object, example = json!({
            "message": "E1003 checked in.",
            "level": "success",
            "data": {"log_id": 1, "employee_id": "E1003", "status": "Present"}
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Unknown employee"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_in(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::CheckIn {
            employee_id: path.into_inner(),
        })
        .await?;
    Ok(respond(outcome))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{employee_id}/check-out",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Checked out, or a warning when there is no open check-in", body = Object, example = json!({
            "message": "No open check-in for today.",
            "level": "warning",
            "data": null
        })),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn check_out(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::CheckOut {
            employee_id: path.into_inner(),
        })
        .await?;
    Ok(respond(outcome))
}

/// Set today's status/notes
#[utoipa::path(
    put,
    path = "/api/attendance/{employee_id}/status",
    params(("employee_id", Path, description = "Employee ID")),
    request_body = StatusReq,
    responses(
        (status = 200, description = "Status/notes updated", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Unknown employee")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn set_status(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
    body: web::Json<StatusReq>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::SetStatus {
            employee_id: path.into_inner(),
            note: body.into_inner().note,
        })
        .await?;
    Ok(respond(outcome))
}

/// Delete today's record
#[utoipa::path(
    delete,
    path = "/api/attendance/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Deleted, or a warning when there was nothing to delete", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn delete_today(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = dispatcher
        .dispatch(Action::DeleteToday {
            employee_id: path.into_inner(),
        })
        .await?;
    Ok(respond(outcome))
}

/// Today's record for one employee (`null` when none)
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Today's record or null", body = AttendanceRecord),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today_record(
    dispatcher: web::Data<Dispatcher>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let record = dispatcher.attendance.today_record(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Today's attendance
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's attendance ordered by name", body = Vec<AttendanceEntry>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_today(dispatcher: web::Data<Dispatcher>) -> AppResult<HttpResponse> {
    let rows = dispatcher.attendance.list_today().await?;
    Ok(HttpResponse::Ok().json(rows.as_slice()))
}

/// Recent attendance
#[utoipa::path(
    get,
    path = "/api/attendance/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Attendance for the last N days, newest first", body = Vec<AttendanceEntry>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_recent(
    dispatcher: web::Data<Dispatcher>,
    query: web::Query<RecentQuery>,
) -> AppResult<HttpResponse> {
    let days = query.days.unwrap_or(RECENT_DAYS).min(MAX_RECENT_DAYS);
    let rows = dispatcher.attendance.list_recent(days).await?;
    Ok(HttpResponse::Ok().json(rows.as_slice()))
}

#[cfg(test)]
mod tests {
    use crate::routes::api_routes;
    use crate::service::{AttendanceService, Dispatcher, EmployeeRepository};
    use crate::store::memory::MemoryStore;
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! app {
        () => {{
            let store = Arc::new(MemoryStore::new());
            let dispatcher = Dispatcher::new(
                AttendanceService::new(store.clone()),
                EmployeeRepository::new(store),
            );
            test::init_service(
                App::new()
                    .app_data(web::Data::new(dispatcher))
                    .configure(api_routes),
            )
            .await
        }};
    }

    macro_rules! call {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    #[actix_web::test]
    async fn attendance_day_over_http() {
        let app = app!();
        let (status, _) = call!(
            app,
            test::TestRequest::post().uri("/employees").set_json(json!({
                "employee_id": "E1003", "first_name": "Ana", "last_name": "Lee"
            }))
        );
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call!(app, test::TestRequest::post().uri("/attendance/E1003/check-in"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "Present");
        assert!(body["data"]["check_out_time"].is_null());

        let (_, body) = call!(app, test::TestRequest::post().uri("/attendance/E1003/check-out"));
        assert_eq!(body["level"], "success");
        assert_eq!(body["message"], "E1003 checked out.");

        let (status, body) = call!(app, test::TestRequest::post().uri("/attendance/E1003/check-out"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], "warning");

        let (_, body) = call!(app, test::TestRequest::get().uri("/attendance/today"));
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["first_name"], "Ana");

        let (_, body) = call!(app, test::TestRequest::get().uri("/attendance/recent?days=7"));
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn status_note_round_trip() {
        let app = app!();
        call!(
            app,
            test::TestRequest::post().uri("/employees").set_json(json!({
                "employee_id": "E1", "first_name": "Ana", "last_name": "Lee"
            }))
        );

        let (_, body) = call!(
            app,
            test::TestRequest::put()
                .uri("/attendance/E1/status")
                .set_json(json!({"note": "Sick"}))
        );
        assert_eq!(body["data"]["status"], "Sick");
        assert_eq!(body["data"]["notes"], "Sick");

        let (_, body) = call!(
            app,
            test::TestRequest::put()
                .uri("/attendance/E1/status")
                .set_json(json!({"note": ""}))
        );
        assert!(body["data"]["status"].is_null());
        assert!(body["data"]["notes"].is_null());

        let (_, body) = call!(app, test::TestRequest::get().uri("/attendance/E1"));
        assert!(body["check_in_time"].is_null());

        let (_, body) = call!(app, test::TestRequest::delete().uri("/attendance/E1"));
        assert_eq!(body["level"], "success");
        let (_, body) = call!(app, test::TestRequest::get().uri("/attendance/E1"));
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn check_in_for_unknown_employee_is_a_conflict() {
        let app = app!();
        let (status, body) = call!(app, test::TestRequest::post().uri("/attendance/ghost/check-in"));
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["details"].as_str().unwrap().contains("ghost"));
    }
}
