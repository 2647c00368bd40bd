//! Password hashing and verification.
//!
//! Hashes are argon2id PHC strings with a random salt. An absent secret is
//! treated as the empty string on both sides.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand_core::OsRng;

use crate::error::Error;

/// Hash `secret` into a PHC string.
pub fn hash(secret: Option<&str>) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(secret.unwrap_or_default().as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// Check `secret` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify(secret: Option<&str>, stored: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(stored) else {
    return false;
  };
  Argon2::default()
    .verify_password(secret.unwrap_or_default().as_bytes(), &parsed)
    .is_ok()
}

/// Server-wide credential material created at startup.
pub struct Credentials {
  /// Verified against when a login names an unknown email, so that path costs
  /// the same argon2 work as a wrong password.
  dummy_hash: String,
}

impl Credentials {
  pub fn new() -> Result<Self, Error> {
    Ok(Self {
      dummy_hash: hash(Some("not-a-real-password"))?,
    })
  }

  /// Burn one verification; always `false`.
  pub fn verify_dummy(&self, secret: Option<&str>) -> bool {
    let _ = verify(secret, &self.dummy_hash);
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let h = hash(Some("hunter2")).unwrap();
    assert!(h.starts_with("$argon2id$"));
    assert!(verify(Some("hunter2"), &h));
    assert!(!verify(Some("hunter3"), &h));
  }

  #[test]
  fn empty_and_absent_secrets_match() {
    let h = hash(Some("")).unwrap();
    assert!(verify(Some(""), &h));
    assert!(verify(None, &h));
    assert!(!verify(Some(" "), &h));
  }

  #[test]
  fn salts_differ() {
    assert_ne!(hash(Some("same")).unwrap(), hash(Some("same")).unwrap());
  }

  #[test]
  fn malformed_hash_is_rejected() {
    assert!(!verify(Some("x"), "plaintext"));
    assert!(!verify(Some(""), ""));
  }

  #[test]
  fn dummy_never_verifies() {
    let creds = Credentials::new().unwrap();
    assert!(!creds.verify_dummy(Some("not-a-real-password")));
  }
}
