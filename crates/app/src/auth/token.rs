//! API token generation and hashing.

use std::fmt::Write as _;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "nl";

/// Number of secret bytes encoded in a token.
const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a new raw API token.
pub(crate) fn generate_api_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    let mut token = String::with_capacity(API_TOKEN_PREFIX.len() + 1 + secret.len() * 2);

    token.push_str(API_TOKEN_PREFIX);
    token.push('_');

    for byte in secret {
        let _ = write!(token, "{byte:02x}");
    }

    token
}

/// Hash a raw API token for storage or lookup.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
