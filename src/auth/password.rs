use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Logs an argon2 failure for `step` and turns it into an `anyhow::Error`.
fn argon2_failure(
    step: &'static str,
) -> impl FnOnce(argon2::password_hash::Error) -> anyhow::Error {
    move |e| {
        error!(error = %e, step, "argon2 failure");
        anyhow::anyhow!("argon2 {step}: {e}")
    }
}

/// Salted Argon2id hash in PHC string form.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(argon2_failure("hash"))?;
    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(argon2_failure("parse stored hash"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
