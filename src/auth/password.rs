use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

fn sha256(input: &str) -> Vec<u8> {
    Sha256::digest(input.as_bytes()).to_vec()
}

/// Lower-case hex SHA-256, the format expected in `AUTH_PASSWORD_SHA256`.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(sha256(input))
}

/// Hashes the submitted password and compares digests in constant time.
pub fn verify_sha256(submitted: &str, expected_hex: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hex) else {
        return false;
    };
    sha256(submitted).ct_eq(expected.as_slice()).into()
}

/// Compares digests of both sides so neither content nor length leaks.
pub fn verify_plain(submitted: &str, secret: &str) -> bool {
    sha256(submitted).ct_eq(sha256(secret).as_slice()).into()
}

pub fn verify_argon2(submitted: &str, phc: &str) -> bool {
    let parsed = match PasswordHash::new(phc) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "Configured Argon2 hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(submitted.as_bytes(), &parsed)
        .is_ok()
}
