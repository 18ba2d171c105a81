//! Password digests.
//!
//! The stored form is the standard Base64 (padded) encoding of SHA-256 over the
//! UTF-8 password bytes. No salt and no iterations: equal passwords give equal
//! hashes across users. A salted scheme can replace it behind [`CredentialHasher`].

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

pub trait CredentialHasher: Send + Sync {
    /// Short scheme name, used in logs.
    fn algorithm(&self) -> &'static str;

    fn hash(&self, raw_password: &str) -> String;

    /// Byte-for-byte comparison of the encoded digests.
    // TODO: switch to a constant-time comparison when the scheme is upgraded to a salted hash.
    fn verify(&self, raw_password: &str, stored_hash: &str) -> bool {
        self.hash(raw_password).as_bytes() == stored_hash.as_bytes()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Base64;

impl CredentialHasher for Sha256Base64 {
    fn algorithm(&self) -> &'static str {
        "sha256-base64"
    }

    fn hash(&self, raw_password: &str) -> String {
        STANDARD.encode(Sha256::digest(raw_password.as_bytes()))
    }
}
