//! Authenticated symmetric encryption for stored secrets.
//!
//! Values are sealed with ChaCha20-Poly1305 under a fresh random 96-bit nonce
//! and encoded as `base64(nonce || ciphertext || tag)`. There is no plaintext
//! fallback: every failure is a [`CryptoError`].

use std::fmt;

use base64::Engine;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, CHACHA20_POLY1305, NONCE_LEN};
use ring::digest::{digest, SHA256};
use ring::rand::{SecureRandom, SystemRandom};

use crate::config::MIN_ENCRYPTION_KEY_LEN;
use crate::error_handling::CryptoError;

/// Encryption key plus the random source used for nonces.
pub struct SecretBox {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl fmt::Debug for SecretBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBox").finish_non_exhaustive()
    }
}

impl SecretBox {
    /// Derives the key as SHA-256 of `material` (at least 32 bytes).
    pub fn from_key_material(material: &[u8]) -> Result<Self, CryptoError> {
        if material.len() < MIN_ENCRYPTION_KEY_LEN {
            return Err(CryptoError::KeyTooShort {
                len: material.len(),
                min: MIN_ENCRYPTION_KEY_LEN,
            });
        }
        Self::with_key_bytes(digest(&SHA256, material).as_ref())
    }

    /// Random key that lives as long as this value.
    ///
    /// Anything encrypted with it cannot be decrypted by another process.
    pub fn ephemeral() -> Result<Self, CryptoError> {
        let rng = SystemRandom::new();
        let mut key = [0u8; 32];
        rng.fill(&mut key).map_err(|_| CryptoError::RandomFailure)?;
        Self::with_key_bytes(&key)
    }

    /// Configured key when present, ephemeral key otherwise.
    pub fn from_config(key: Option<&str>) -> Result<Self, CryptoError> {
        match key {
            Some(material) => Self::from_key_material(material.as_bytes()),
            None => {
                log::warn!("No encryption key configured, using an ephemeral key");
                Self::ephemeral()
            }
        }
    }

    fn with_key_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let unbound =
            UnboundKey::new(&CHACHA20_POLY1305, bytes).map_err(|_| CryptoError::SealFailed)?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Seals `plaintext` as `base64(nonce || ciphertext || tag)`.
    pub fn encrypt_data(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomFailure)?;

        let mut sealed = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut sealed,
            )
            .map_err(|_| CryptoError::SealFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);
        Ok(base64::engine::general_purpose::STANDARD.encode(out))
    }

    /// Opens a value produced by [`encrypt_data`](Self::encrypt_data).
    pub fn decrypt_data(&self, encoded: &str) -> Result<String, CryptoError> {
        let mut decoded = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        if decoded.len() < NONCE_LEN + CHACHA20_POLY1305.tag_len() {
            return Err(CryptoError::Truncated);
        }

        let (nonce_bytes, ciphertext) = decoded.split_at_mut(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CryptoError::Truncated)?;
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), ciphertext)
            .map_err(|_| CryptoError::Unauthenticated)?;
        Ok(String::from_utf8(plaintext.to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_round_trip() {
        let secret_box = SecretBox::from_key_material(KEY.as_bytes()).unwrap();
        for input in ["", "api-key-123", "unicode 测试 🚀"] {
            let sealed = secret_box.encrypt_data(input).unwrap();
            assert_eq!(secret_box.decrypt_data(&sealed).unwrap(), input);
        }
    }

    #[test]
    fn test_nonce_is_fresh_per_call() {
        let secret_box = SecretBox::ephemeral().unwrap();
        let first = secret_box.encrypt_data("same").unwrap();
        let second = secret_box.encrypt_data("same").unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "same");
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(matches!(
            SecretBox::from_key_material(b"short"),
            Err(CryptoError::KeyTooShort { len: 5, min: 32 })
        ));
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = SecretBox::from_key_material(KEY.as_bytes())
            .unwrap()
            .encrypt_data("secret")
            .unwrap();
        let other = SecretBox::from_key_material(b"another key that is long enough!!").unwrap();
        assert!(matches!(
            other.decrypt_data(&sealed),
            Err(CryptoError::Unauthenticated)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let secret_box = SecretBox::from_key_material(KEY.as_bytes()).unwrap();
        let sealed = secret_box.encrypt_data("secret").unwrap();
        let mut bytes = base64::engine::general_purpose::STANDARD
            .decode(&sealed)
            .unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = base64::engine::general_purpose::STANDARD.encode(bytes);
        assert!(matches!(
            secret_box.decrypt_data(&tampered),
            Err(CryptoError::Unauthenticated)
        ));
    }

    #[test]
    fn test_malformed_input() {
        let secret_box = SecretBox::ephemeral().unwrap();
        assert!(matches!(
            secret_box.decrypt_data("not base64!"),
            Err(CryptoError::Decode(_))
        ));
        assert!(matches!(
            secret_box.decrypt_data("AAAA"),
            Err(CryptoError::Truncated)
        ));
    }
}
