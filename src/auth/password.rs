use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hash/verify capability used by registration and login.
///
/// Stored hashes are PHC strings, so a scheme can recognize hashes produced with
/// older parameters and keep verifying them after a rotation.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, plain: &str) -> anyhow::Result<String>;

    /// Returns `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed.
    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool>;
}

/// Argon2id with a random salt per hash.
#[derive(Clone)]
pub struct Argon2Scheme {
    argon2: Argon2<'static>,
}

impl Argon2Scheme {
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2Scheme {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordScheme for Argon2Scheme {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        // Parameters come from the PHC string, not from `self.argon2`.
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}
