//! Password value object: the credential hasher shared by accounts and
//! doctor requests. Argon2id with default parameters.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password. The plain text never outlives `Password::new`.
#[derive(Clone, PartialEq, Eq)]
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
    /// Hash a plain text password.
    ///
    /// # Errors
    /// Returns a validation error if the password has fewer than
    /// `MIN_PASSWORD_LENGTH` characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wrap a hash loaded from the store.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain text password. A malformed stored hash never matches.
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

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "clinic-secret";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("clinic-secreT"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "L123-cardio";
        let hash = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "same-password";
        let first = Password::new(plain).unwrap();
        let second = Password::new(plain).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify(plain));
        assert!(second.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        let result = Password::new("abc12");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // five characters, ten bytes
        assert!(Password::new("ééééé").is_err());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let stored = Password::from_hash("not-a-phc-string");
        assert!(!stored.verify("anything"));
    }

    #[test]
    fn test_dummy_hash_rejects_everything() {
        let stored = Password::from_hash(crate::config::DUMMY_PASSWORD_HASH);
        assert!(!stored.verify("password"));
        assert!(!stored.verify(""));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("clinic-secret").unwrap();
        let rendered = format!("{:?}", password);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("argon2"));
    }
}
