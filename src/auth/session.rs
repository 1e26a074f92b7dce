use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use chrono::{DateTime, TimeZone, Utc};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::models::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthMethod {
    Password,
    Token,
}

/// An authenticated session. Created by `AccessGate::authenticate`, ended by
/// `AccessGate::sign_out`; handlers receive it through the extractor below.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    pub id: String,
    pub method: AuthMethod,
    #[schema(value_type = String, format = "date-time")]
    pub issued_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub expires_at: DateTime<Utc>,
}

fn timestamp(secs: usize) -> DateTime<Utc> {
    Utc.timestamp_opt(secs as i64, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            id: claims.jti,
            method: claims.method,
            issued_at: timestamp(claims.iat),
            expires_at: timestamp(claims.exp),
        }
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Session>()
                .cloned()
                .ok_or(AppError::AuthFailure),
        )
    }
}
