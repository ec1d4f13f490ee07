/// Password hashing and verification using PBKDF2-SHA256
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};

/// Output length of the derived key in bytes.
const OUTPUT_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] password_hash::Error);

/// Hash a password with a fresh random salt.
///
/// Returns a PHC-format string suitable for storage in the database.
/// Any plaintext is accepted, including the empty string; `rounds` is the
/// PBKDF2 iteration count (tunable, expensive on purpose).
pub fn hash_password(password: &str, rounds: u32) -> Result<String, HashError> {
    let salt = SaltString::generate(rand::thread_rng());
    let params = Params {
        rounds,
        output_length: OUTPUT_LENGTH,
    };

    let digest = Pbkdf2
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)?
        .to_string();

    Ok(digest)
}

/// Verify a password against a stored digest.
///
/// Returns `false` for a mismatch, an empty-vs-nonempty plaintext, or a
/// digest that does not parse; it never errors. The comparison itself is
/// the constant-time check of the underlying primitive.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep test rounds low; production uses the configured count.
    const ROUNDS: u32 = 1_000;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("secret1", ROUNDS).unwrap();
        assert!(verify_password("secret1", &digest));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let digest = hash_password("secret1", ROUNDS).unwrap();
        assert!(!verify_password("secret2", &digest));
    }

    #[test]
    fn test_salting_makes_digests_differ() {
        let a = hash_password("secret1", ROUNDS).unwrap();
        let b = hash_password("secret1", ROUNDS).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(verify_password("secret1", &b));
    }

    #[test]
    fn test_empty_password_hashes_like_any_other() {
        let digest = hash_password("", ROUNDS).unwrap();
        assert!(verify_password("", &digest));
        assert!(!verify_password("x", &digest));
    }

    #[test]
    fn test_empty_password_against_real_digest() {
        let digest = hash_password("secret1", ROUNDS).unwrap();
        assert!(!verify_password("", &digest));
    }

    #[test]
    fn test_malformed_digest_is_false_not_panic() {
        assert!(!verify_password("secret1", ""));
        assert!(!verify_password("secret1", "not-a-phc-string"));
        assert!(!verify_password("secret1", "$pbkdf2-sha256$garbage"));
    }

    #[test]
    fn test_digest_records_the_round_count() {
        let digest = hash_password("secret1", ROUNDS).unwrap();
        assert!(digest.contains("i=1000"));
    }
}
