use crate::{db, error::AppResult};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::PgPool;

/// Liveness plus a database round trip
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = Object, example = json!({
            "status": "ok",
            "server_time": "2026-10-16T09:00:00Z"
        })),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Health"
)]
pub async fn health(pool: web::Data<PgPool>) -> AppResult<HttpResponse> {
    let server_time = db::server_time(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "server_time": server_time,
    })))
}
