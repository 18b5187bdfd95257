//! Password value object - Domain layer password handling.
//!
//! Encapsulates salted Argon2id hashing and verification. The cost
//! parameters are tunable; verification reads them back from the PHC
//! string so hashes made under older settings keep verifying.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
};
use crate::errors::{AppError, AppResult};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

impl HashCost {
    /// Check the parameters against Argon2's limits.
    pub fn validate(&self) -> AppResult<()> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> AppResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AppError::internal(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text with a fresh salt.
    ///
    /// # Errors
    /// Returns an internal error if the cost parameters are rejected.
    pub fn new(plain_text: &str, cost: &HashCost) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = cost
            .argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A hash that does not parse never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest cost Argon2 accepts, keeps tests fast
    const TEST_COST: HashCost = HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain, &TEST_COST).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain, &TEST_COST).unwrap();
        let hash = password.into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let password = Password::new("secret1", &TEST_COST).unwrap();

        assert_ne!(password.hash, "secret1");
        assert!(password.hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain, &TEST_COST).unwrap();
        let pass2 = Password::new(plain, &TEST_COST).unwrap();

        assert_ne!(pass1.hash, pass2.hash);
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_short_password_accepted() {
        // Only presence is checked; no length policy
        let password = Password::new("a", &TEST_COST).unwrap();
        assert!(password.verify("a"));
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let cost = HashCost {
            memory_kib: 64,
            iterations: 3,
            parallelism: 2,
        };
        let password = Password::new("secret1", &cost).unwrap();

        assert!(password.hash.contains("m=64,t=3,p=2"));
        assert!(password.verify("secret1"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("anything"));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };

        assert!(cost.validate().is_err());
        assert!(Password::new("secret1", &cost).is_err());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("secret1", &TEST_COST).unwrap();
        assert!(!format!("{:?}", password).contains("argon2"));
    }
}
