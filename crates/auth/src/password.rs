use crate::error::AuthError;

/// Hashes a password with bcrypt at the given work factor.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks a password against a stored bcrypt hash.
///
/// A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("secret1", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!verify_password("secret1", "not-a-hash"));
        assert!(!verify_password("", ""));
    }
}
