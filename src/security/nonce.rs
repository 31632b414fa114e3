//! Action-bound request nonces.
//!
//! A nonce is the first hex characters of an HMAC-SHA256 over the time tick,
//! the action name and the user id. Ticks are half the nonce lifetime long, and
//! a nonce verifies during the tick it was made in and the following one.

use chrono::{DateTime, Utc};
use ring::digest::{digest, SHA256};
use ring::hmac;
use ring::rand::SystemRandom;

use crate::config::{NONCE_LENGTH, NONCE_LIFETIME};
use crate::error_handling::{CryptoError, NonceError};

/// Which tick a verified nonce was created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// Created in the current tick.
    Current,
    /// Created in the previous tick; still valid.
    Previous,
}

/// Creates and verifies nonces with one HMAC key.
#[derive(Debug)]
pub struct NonceIssuer {
    key: hmac::Key,
}

impl NonceIssuer {
    /// Issuer keyed directly with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
        }
    }

    /// Issuer with a random key; its nonces die with the process.
    pub fn ephemeral() -> Result<Self, CryptoError> {
        let key = hmac::Key::generate(hmac::HMAC_SHA256, &SystemRandom::new())
            .map_err(|_| CryptoError::RandomFailure)?;
        Ok(Self { key })
    }

    /// Keyed from configured secret material, ephemeral otherwise.
    ///
    /// The HMAC key is a SHA-256 of the material under a nonce-specific label,
    /// so it never equals the encryption key derived from the same material.
    pub fn from_config(material: Option<&str>) -> Result<Self, CryptoError> {
        match material {
            Some(material) => {
                let labelled = format!("seo-nonce:{}", material);
                Ok(Self::new(digest(&SHA256, labelled.as_bytes()).as_ref()))
            }
            None => Self::ephemeral(),
        }
    }

    /// Token for `action` and `user_id`, valid now.
    pub fn create(&self, action: &str, user_id: u64) -> String {
        self.create_at(action, user_id, Utc::now())
    }

    /// Token as [`create`](Self::create) would issue it at `now`.
    pub fn create_at(&self, action: &str, user_id: u64, now: DateTime<Utc>) -> String {
        self.token(tick(now), action, user_id)
    }

    /// Checks a token against the current time.
    pub fn verify(&self, nonce: &str, action: &str, user_id: u64) -> Result<NonceAge, NonceError> {
        self.verify_at(nonce, action, user_id, Utc::now())
    }

    /// Checks a token as of `now`.
    pub fn verify_at(
        &self,
        nonce: &str,
        action: &str,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<NonceAge, NonceError> {
        if nonce.is_empty() {
            return Err(NonceError::Missing);
        }
        let current = tick(now);
        if constant_time_eq(&self.token(current, action, user_id), nonce) {
            return Ok(NonceAge::Current);
        }
        if constant_time_eq(&self.token(current - 1, action, user_id), nonce) {
            return Ok(NonceAge::Previous);
        }
        Err(NonceError::Invalid)
    }

    fn token(&self, tick: i64, action: &str, user_id: u64) -> String {
        let message = format!("{}|{}|{}", tick, action, user_id);
        let tag = hmac::sign(&self.key, message.as_bytes());
        let mut hex = String::with_capacity(NONCE_LENGTH + 1);
        for byte in tag.as_ref() {
            if hex.len() >= NONCE_LENGTH {
                break;
            }
            hex.push_str(&format!("{:02x}", byte));
        }
        hex.truncate(NONCE_LENGTH);
        hex
    }
}

/// Index of the half-lifetime window containing `now`, rounded up.
fn tick(now: DateTime<Utc>) -> i64 {
    let half = (NONCE_LIFETIME.as_secs() / 2) as i64;
    let secs = now.timestamp();
    secs.div_euclid(half) + i64::from(secs.rem_euclid(half) > 0)
}

fn constant_time_eq(expected: &str, given: &str) -> bool {
    let (a, b) = (expected.as_bytes(), given.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
