//! Authentication digest for the identify handshake.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Base64 of the SHA-256 digest of `input`.
fn b64_sha256(input: &str) -> String {
    STANDARD.encode(Sha256::digest(input.as_bytes()))
}

/// Compute the `authentication` string sent in `Identify`.
///
/// The secret is `b64(sha256(password + salt))`; the response is
/// `b64(sha256(secret + challenge))`.
pub fn auth_response(password: &str, salt: &str, challenge: &str) -> String {
    let secret = b64_sha256(&format!("{password}{salt}"));
    b64_sha256(&format!("{secret}{challenge}"))
}
