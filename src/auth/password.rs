//! Password hashing for stored credentials.
//!
//! Uses Argon2id. Plaintext passwords exist only for the duration of a
//! register or login request; only PHC hash strings are persisted.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored password hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

/// Create the Argon2 hasher with recommended parameters.
///
/// Parameters:
/// - Memory cost: 64 MB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 threads
fn create_argon2() -> Argon2<'static> {
    // Memory cost in KiB (64 MB = 65536 KiB)
    let m_cost = 65536;
    // Time cost (iterations)
    let t_cost = 3;
    // Parallelism (threads)
    let p_cost = 4;

    let params = Params::new(m_cost, t_cost, p_cost, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes a freshly generated
/// salt and the hashing parameters. Hashing the same password twice yields
/// different strings.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    // Generate a random salt
    let salt = SaltString::generate(&mut OsRng);

    // Hash the password
    let argon2 = create_argon2();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(())` if the password matches. A mismatch and an unreadable
/// stored hash both come back as errors; callers decide how much of that to
/// reveal.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    // Parse the stored hash
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Verify the password
    // Note: The parameters are taken from the parsed hash, not from create_argon2()
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_success() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        // Should be a valid PHC string
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$")); // Version 0x13 = 19
    }

    #[test]
    fn test_hash_password_different_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "correct_password";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_verify_password_wrong() {
        let password = "correct_password";
        let hash = hash_password(password).unwrap();

        let result = verify_password("wrong_password", &hash);
        assert!(result.is_err());
        assert!(matches!(result, Err(PasswordError::VerificationFailed)));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("any_password", "not_a_valid_hash");
        assert!(result.is_err());
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_short_password_accepted() {
        // No length policy: even very short passwords hash and verify
        let hash = hash_password("pw1").unwrap();
        assert!(verify_password("pw1", &hash).is_ok());
        assert!(verify_password("pw2", &hash).is_err());
    }

    #[test]
    fn test_password_with_unicode() {
        let password = "heslo123パスワード";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_password_with_special_chars() {
        let password = "p@$$w0rd!#$%^&*()";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_argon2_params() {
        // Verify that the hash contains expected parameters
        let hash = hash_password("test_password").unwrap();

        // Should contain memory cost (m=65536)
        assert!(hash.contains("m=65536"));
        // Should contain time cost (t=3)
        assert!(hash.contains("t=3"));
        // Should contain parallelism (p=4)
        assert!(hash.contains("p=4"));
    }
}
