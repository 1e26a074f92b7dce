use crate::{
    auth::{
        gate::{AccessGate, AuthResult, Credential},
        middleware::{SESSION_COOKIE, session_token},
        session::Session,
    },
    error::{AppError, AppResult},
    models::{LoginReqDto, LoginResponse, TokenQuery},
};
use actix_web::{
    HttpRequest, HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    web,
};
use tracing::{info, instrument};

fn signed_in(result: AuthResult, ttl: u64) -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, result.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(ttl as i64))
        .finish();

    HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        session_token: result.token,
        method: result.method,
        expires_at: result.session.expires_at,
    })
}

/// Password sign-in
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session started", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login_password", skip_all)]
pub async fn login_password(
    body: web::Json<LoginReqDto>,
    gate: web::Data<AccessGate>,
) -> AppResult<HttpResponse> {
    info!("Password sign-in request received");
    let result = gate.authenticate(Credential::Password(body.into_inner().password))?;
    Ok(signed_in(result, gate.session_ttl()))
}

/// Token sign-in via `?token=...`
#[utoipa::path(
    get,
    path = "/auth/login",
    params(TokenQuery),
    responses(
        (status = 200, description = "Session started", body = LoginResponse),
        (status = 400, description = "Token missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login_token", skip_all)]
pub async fn login_token(
    query: web::Query<TokenQuery>,
    gate: web::Data<AccessGate>,
) -> AppResult<HttpResponse> {
    info!("Token sign-in request received");
    let token = query
        .into_inner()
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("token", "token query parameter is required"))?;
    let result = gate.authenticate(Credential::Token(token))?;
    Ok(signed_in(result, gate.session_ttl()))
}

/// Sign out. Idempotent: unknown or already-ended sessions also get 204.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out")),
    tag = "Auth"
)]
pub async fn logout(req: HttpRequest, gate: web::Data<AccessGate>) -> HttpResponse {
    if let Some(session) = session_token(&req).and_then(|t| gate.open_session(&t).ok()) {
        gate.sign_out(&session).await;
    }

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::NoContent().cookie(cookie).finish()
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Active session", body = Session),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn current_session(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(session)
}
