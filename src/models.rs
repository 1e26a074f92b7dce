use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::session::AuthMethod;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Deserialize, IntoParams)]
pub struct TokenQuery {
    /// Pre-shared sign-in token
    pub token: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub session_token: String,
    pub method: AuthMethod,
    #[schema(value_type = String, format = "date-time")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub method: AuthMethod,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
