use crate::auth::gate::AccessGate;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Cookie set on sign-in for browser clients.
pub const SESSION_COOKIE: &str = "attendance_session";

/// Session token from `Authorization: Bearer ...`, falling back to the cookie.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let gate = req
        .app_data::<Data<AccessGate>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Access gate missing"))?
        .clone();

    let token = match session_token(req.request()) {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized().json(json!({"error": "Sign-in required"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let session = match gate.open_session(&token) {
        Ok(s) => s,
        Err(_) => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"error": "Session is invalid or has ended"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(session);

    next.call(req).await
}
