// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
//!
//! Hashes are PHC strings, so verification reads the algorithm and the
//! work factor from the stored hash itself. A deployment can switch the
//! configured algorithm without invalidating existing accounts.
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params as Argon2Params, Version,
};
use scrypt::{Params as ScryptParams, Scrypt};
use serde::{Deserialize, Serialize};

use crate::config::{HashAlgorithm, HashingSettings};
use crate::error::AuthError;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SCRYPT_OUTPUT_LEN: usize = 32;

/// Password complexity requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

#[derive(Clone)]
enum Hasher {
    Argon2(Argon2<'static>),
    Scrypt(ScryptParams),
}

/// Salted one-way hasher built from [`HashingSettings`]
#[derive(Clone)]
pub struct PasswordHasher {
    hasher: Hasher,
}

impl PasswordHasher {
    /// Build a hasher, rejecting work factors the algorithm does not accept
    pub fn new(settings: &HashingSettings) -> Result<Self, AuthError> {
        let hasher = match settings.algorithm {
            HashAlgorithm::Argon2id => {
                let params = Argon2Params::new(
                    settings.argon2_memory_kib,
                    settings.argon2_iterations,
                    settings.argon2_parallelism,
                    None,
                )
                .map_err(|e| AuthError::Hashing(e.to_string()))?;
                Hasher::Argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
            }
            HashAlgorithm::Scrypt => {
                let params = ScryptParams::new(
                    settings.scrypt_log_n,
                    settings.scrypt_r,
                    settings.scrypt_p,
                    SCRYPT_OUTPUT_LEN,
                )
                .map_err(|e| AuthError::Hashing(e.to_string()))?;
                Hasher::Scrypt(params)
            }
        };
        Ok(Self { hasher })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = match &self.hasher {
            Hasher::Argon2(argon2) => argon2.hash_password(plain.as_bytes(), &salt),
            Hasher::Scrypt(params) => {
                Scrypt.hash_password_customized(plain.as_bytes(), None, None, *params, &salt)
            }
        }
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// Unparseable hashes never match.
    pub fn verify(&self, hash: &str, plain: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        let argon2 = Argon2::default();
        let verifiers: [&dyn PasswordVerifier; 2] = [&argon2, &Scrypt];
        parsed.verify_password(&verifiers, plain.as_bytes()).is_ok()
    }

    /// Hash of a random secret, verified against when a username is unknown
    /// so the miss costs the same as a wrong password.
    pub fn dummy_hash(&self) -> Result<String, AuthError> {
        let secret = SaltString::generate(&mut OsRng);
        self.hash(secret.as_str())
    }
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.chars().count() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}
