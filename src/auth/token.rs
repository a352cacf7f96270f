// src/auth/token.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub const SESSION_TOKEN_BYTES: usize = 32;

/// Generate a secure random session token using the OS RNG.
pub fn generate_session_token() -> String {
    let mut rng = OsRng;
    generate_token(&mut rng, SESSION_TOKEN_BYTES)
}

/// Generate a cookie-safe token from random bytes.
/// Base64 URL-safe, no padding; 32 bytes -> ~43 chars.
pub fn generate_token<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Hash a token with SHA-256. Only the hash is stored; the raw token
/// lives in the operator's cookie and nowhere else.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let out = hasher.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn token_is_cookie_safe() {
        let mut rng = StdRng::seed_from_u64(123);
        let t = generate_token(&mut rng, 32);

        assert!(t
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(t.len() >= 40); // 32 bytes => usually 43 chars
    }

    #[test]
    fn hash_is_deterministic_and_input_sensitive() {
        assert_eq!(hash_token("hello"), hash_token("hello"));
        assert_ne!(hash_token("hello"), hash_token("hello!"));
    }

    #[test]
    fn successive_tokens_differ() {
        let mut rng = StdRng::seed_from_u64(1);
        let t1 = generate_token(&mut rng, 32);
        let t2 = generate_token(&mut rng, 32);
        assert_ne!(t1, t2);
    }
}
