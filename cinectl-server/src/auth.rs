//! Password hashing
//!
//! New passwords are stored as Argon2id PHC strings. Rows written by the
//! earlier bcrypt-based service keep their `$2a$`/`$2b$`/`$2y$` digests and
//! still verify. The hasher sits behind a trait so handlers and the rehash
//! tool share one implementation and tests can swap in a cheaper one.

use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use rand::rngs::OsRng;

/// Password hashing failure
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password is not a valid digest: {0}")]
    MalformedDigest(String),
}

/// Hash and verify secrets.
///
/// Both calls are CPU-bound; async callers should run them on
/// `tokio::task::spawn_blocking`.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash a secret into a self-describing digest.
    fn hash(&self, secret: &str) -> Result<String, HashError>;

    /// Check a secret against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, HashError>;
}

/// Prefixes of the modular-crypt bcrypt variants
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Length of every bcrypt digest: prefix, cost, 22-char salt, 31-char hash
const BCRYPT_LEN: usize = 60;

/// Argon2id with the crate's default parameters; verifies bcrypt too
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| HashError::Hash(e.to_string()))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, HashError> {
        if is_bcrypt(digest) {
            return bcrypt::verify(secret, digest)
                .map_err(|e| HashError::MalformedDigest(e.to_string()));
        }

        let parsed =
            PasswordHash::new(digest).map_err(|e| HashError::MalformedDigest(e.to_string()))?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::MalformedDigest(e.to_string())),
        }
    }
}

/// True when `stored` is already a bcrypt or PHC digest.
///
/// Rows that fail this check hold legacy plain-text passwords.
pub fn is_digest(stored: &str) -> bool {
    is_bcrypt(stored) || PasswordHash::new(stored).is_ok()
}

fn is_bcrypt(stored: &str) -> bool {
    stored.len() == BCRYPT_LEN && BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p))
}
