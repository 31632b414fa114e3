//! Request security helpers.
//!
//! This module provides:
//! - Input sanitization for admin request payloads
//! - Authenticated encryption of stored values (`ring` ChaCha20-Poly1305)
//! - Action-bound nonces (`ring` HMAC-SHA256)
//! - The user context carrying capabilities

mod context;
mod crypto;
mod nonce;
mod sanitize;

pub use context::UserContext;
pub use crypto::SecretBox;
pub use nonce::{NonceAge, NonceIssuer};
pub use sanitize::{sanitize_input, sanitize_text_field};
