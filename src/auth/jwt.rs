use std::time::{SystemTime, UNIX_EPOCH};

use crate::{auth::session::AuthMethod, models::Claims};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

const SUBJECT: &str = "attendance-desk";

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn generate_session_token(
    method: AuthMethod,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), Error> {
    let issued_at = now();
    let claims = Claims {
        sub: SUBJECT.to_string(),
        method,
        iat: issued_at,
        exp: issued_at + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::default();
    validation.sub = Some(SUBJECT.to_string());
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
