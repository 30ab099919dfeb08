use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Unreserved characters permitted in a PKCE code verifier (RFC 7636 §4.1).
const VERIFIER_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

pub const MIN_VERIFIER_LENGTH: usize = 43;
pub const MAX_VERIFIER_LENGTH: usize = 128;

pub fn generate_code_verifier(length: usize) -> Result<String, String> {
    if !(MIN_VERIFIER_LENGTH..=MAX_VERIFIER_LENGTH).contains(&length) {
        return Err(format!(
            "verifier length must be between {} and {}, got {}",
            MIN_VERIFIER_LENGTH, MAX_VERIFIER_LENGTH, length
        ));
    }

    let mut bytes = vec![0u8; length];
    rand::rng().fill_bytes(&mut bytes);

    Ok(bytes
        .iter()
        .map(|b| VERIFIER_CHARS[*b as usize % VERIFIER_CHARS.len()] as char)
        .collect())
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}
