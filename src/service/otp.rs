use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

pub const DEFAULT_OTP_LENGTH: usize = 6;
const MAX_OTP_TTL_SECONDS: u64 = 60 * 60 * 24 * 30;

/// A freshly generated one-time code and the values to persist for it.
#[derive(Debug)]
pub struct IssuedCode {
    pub code: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
}

pub fn generate_otp(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Only the digest is stored.
pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn issue(length: usize, ttl_seconds: u64) -> IssuedCode {
    let code = generate_otp(length);
    let code_hash = hash_otp(&code);
    let ttl = ttl_seconds.min(MAX_OTP_TTL_SECONDS) as i64;
    IssuedCode {
        code,
        code_hash,
        expires_at: Utc::now() + Duration::seconds(ttl),
    }
}
