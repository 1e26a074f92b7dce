//! Single shared-secret gate in front of the whole application.
//!
//! Security limitation: there is no lockout, no per-credential rate limit and
//! no second factor. Anyone holding the password or a token gets full access.
//! Sign-out revocations are held in process memory only: after a restart a
//! signed-out session token is accepted again until its `exp`. Keep
//! `SESSION_TTL` short where that matters.

use std::time::Duration;

use moka::future::Cache;
use subtle::{Choice, ConstantTimeEq};
use tracing::{info, warn};

use super::jwt::{generate_session_token, verify_token};
use super::password::{verify_argon2, verify_plain, verify_sha256};
use super::session::{AuthMethod, Session};
use crate::config::{AuthSecrets, Config};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub enum Credential {
    /// Submitted through the sign-in form.
    Password(String),
    /// Carried in the `?token=` query parameter.
    Token(String),
}

#[derive(Debug, Clone)]
pub struct AuthResult {
    pub method: AuthMethod,
    pub session: Session,
    /// Signed session token handed back to the client.
    pub token: String,
}

#[derive(Clone)]
pub struct AccessGate {
    secrets: AuthSecrets,
    session_secret: String,
    session_ttl: u64,
    /// Session ids ended by sign-out, kept until they would have expired anyway.
    revoked: Cache<String, ()>,
}

impl AccessGate {
    pub fn new(secrets: AuthSecrets, session_secret: String, session_ttl: u64) -> Self {
        if secrets.password.is_none()
            && secrets.password_sha256.is_none()
            && secrets.password_argon2.is_none()
            && secrets.tokens.is_empty()
        {
            warn!("No password or token configured; every sign-in will be refused");
        }

        Self {
            secrets,
            session_secret,
            session_ttl,
            // No capacity bound: entries leave only once the token has expired.
            revoked: Cache::builder()
                .time_to_live(Duration::from_secs(session_ttl.max(1)))
                .build(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.auth.clone(),
            config.session_secret.clone(),
            config.session_ttl,
        )
    }

    pub fn session_ttl(&self) -> u64 {
        self.session_ttl
    }

    pub fn authenticate(&self, credential: Credential) -> AppResult<AuthResult> {
        let method = match &credential {
            Credential::Token(token) if self.token_matches(token) => AuthMethod::Token,
            Credential::Password(password) if self.password_matches(password) => {
                AuthMethod::Password
            }
            _ => {
                info!("Authentication failed");
                return Err(AppError::AuthFailure);
            }
        };

        let (token, claims) =
            generate_session_token(method, &self.session_secret, self.session_ttl as usize)
                .map_err(|e| AppError::Internal(e.to_string()))?;
        let session = Session::from(claims);

        info!(session_id = %session.id, %method, "Session started");
        Ok(AuthResult {
            method,
            session,
            token,
        })
    }

    /// Resolves a presented session token, rejecting forged, expired and
    /// signed-out sessions alike.
    pub fn open_session(&self, token: &str) -> AppResult<Session> {
        let claims = verify_token(token, &self.session_secret).map_err(|_| AppError::AuthFailure)?;
        if self.revoked.contains_key(&claims.jti) {
            return Err(AppError::AuthFailure);
        }
        Ok(Session::from(claims))
    }

    pub async fn sign_out(&self, session: &Session) {
        self.revoked.insert(session.id.clone(), ()).await;
        info!(session_id = %session.id, "Session ended");
    }

    /// Compares against every configured token so timing does not reveal
    /// which entry, if any, matched.
    fn token_matches(&self, presented: &str) -> bool {
        if presented.is_empty() {
            return false;
        }
        let mut matched = Choice::from(0);
        for allowed in &self.secrets.tokens {
            matched |= allowed.as_bytes().ct_eq(presented.as_bytes());
        }
        matched.into()
    }

    fn password_matches(&self, submitted: &str) -> bool {
        if let Some(phc) = &self.secrets.password_argon2 {
            return verify_argon2(submitted, phc);
        }
        if let Some(digest) = &self.secrets.password_sha256 {
            return verify_sha256(submitted, digest);
        }
        if let Some(secret) = &self.secrets.password {
            return verify_plain(submitted, secret);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::sha256_hex;

    fn gate(secrets: AuthSecrets) -> AccessGate {
        AccessGate::new(secrets, "session-secret".into(), 3600)
    }

    fn token_gate() -> AccessGate {
        gate(AuthSecrets {
            tokens: ["tok-a".to_string(), "tok-b".to_string()].into(),
            password_sha256: Some(sha256_hex("hunter2")),
            ..Default::default()
        })
    }

    #[test]
    fn wrong_password_is_an_auth_failure() {
        let err = token_gate()
            .authenticate(Credential::Password("wrong".into()))
            .unwrap_err();
        assert!(matches!(err, AppError::AuthFailure));
    }

    #[test]
    fn allow_listed_token_grants_token_session() {
        let result = token_gate()
            .authenticate(Credential::Token("tok-b".into()))
            .unwrap();
        assert_eq!(result.method, AuthMethod::Token);
        assert_eq!(result.session.method, AuthMethod::Token);
        assert!(result.session.expires_at > result.session.issued_at);
    }

    #[test]
    fn token_must_match_exactly() {
        let gate = token_gate();
        for candidate in ["tok", "tok-a ", "TOK-A", ""] {
            assert!(gate.authenticate(Credential::Token(candidate.into())).is_err());
        }
    }

    #[test]
    fn password_is_not_accepted_as_token() {
        let gate = token_gate();
        assert!(gate.authenticate(Credential::Token("hunter2".into())).is_err());
        assert!(gate.authenticate(Credential::Password("tok-a".into())).is_err());
    }

    #[test]
    fn sha256_password_grants_password_session() {
        let result = token_gate()
            .authenticate(Credential::Password("hunter2".into()))
            .unwrap();
        assert_eq!(result.method, AuthMethod::Password);
    }

    #[test]
    fn plaintext_secret_is_used_when_no_hash_is_configured() {
        let gate = gate(AuthSecrets {
            password: Some("open sesame".into()),
            ..Default::default()
        });
        assert!(gate.authenticate(Credential::Password("open sesame".into())).is_ok());
        assert!(gate.authenticate(Credential::Password("open".into())).is_err());
    }

    #[test]
    fn hash_takes_precedence_over_plaintext() {
        let gate = gate(AuthSecrets {
            password: Some("plain".into()),
            password_sha256: Some(sha256_hex("hashed")),
            ..Default::default()
        });
        assert!(gate.authenticate(Credential::Password("hashed".into())).is_ok());
        assert!(gate.authenticate(Credential::Password("plain".into())).is_err());
    }

    #[test]
    fn unconfigured_gate_stays_closed() {
        let gate = gate(AuthSecrets::default());
        assert!(gate.authenticate(Credential::Password(String::new())).is_err());
        assert!(gate.authenticate(Credential::Token(String::new())).is_err());
    }

    #[actix_web::test]
    async fn session_opens_until_signed_out() {
        let gate = token_gate();
        let result = gate.authenticate(Credential::Token("tok-a".into())).unwrap();

        let session = gate.open_session(&result.token).unwrap();
        assert_eq!(session, result.session);

        gate.sign_out(&session).await;
        assert!(matches!(gate.open_session(&result.token), Err(AppError::AuthFailure)));
    }

    #[actix_web::test]
    async fn every_signed_out_session_stays_revoked() {
        let gate = token_gate();
        let mut tokens = Vec::new();
        for _ in 0..2_000 {
            let result = gate.authenticate(Credential::Token("tok-a".into())).unwrap();
            gate.sign_out(&result.session).await;
            tokens.push(result.token);
        }
        gate.revoked.run_pending_tasks().await;

        assert_eq!(gate.revoked.entry_count(), 2_000);
        for token in &tokens {
            assert!(gate.open_session(token).is_err());
        }
    }

    #[test]
    fn forged_session_token_is_rejected() {
        let other = AccessGate::new(AuthSecrets::default(), "another-secret".into(), 3600);
        let forged = token_gate()
            .authenticate(Credential::Token("tok-a".into()))
            .unwrap()
            .token;
        assert!(other.open_session(&forged).is_err());
        assert!(token_gate().open_session("garbage").is_err());
    }
}
