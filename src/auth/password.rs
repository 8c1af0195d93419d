use crate::error::LedgerError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// 비밀번호 해시 생성 (argon2id, PHC 문자열)
pub fn hash_password(password: &str) -> Result<String, LedgerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(LedgerError::from)
}

/// 비밀번호 검증
/// 저장된 해시가 손상된 경우에도 false 로 처리한다.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_only_the_matching_password() {
        let hash = hash_password("turmeric-gold").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("turmeric-gold", &hash));
        assert!(!verify_password("turmeric-gol", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
