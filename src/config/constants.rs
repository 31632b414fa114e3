//! Configuration constants.
//!
//! This module defines the metadata keys, heuristic limits and security parameters
//! used throughout the application.

use std::time::Duration;

// Post metadata keys
/// Focus keyword derived from the most frequent content token
pub const META_FOCUS_KEYWORD: &str = "_focus_keyword";
/// Generated meta description (first words of the content)
pub const META_DESCRIPTION: &str = "_meta_description";
/// Serialized JSON-LD schema record
pub const META_SCHEMA_MARKUP: &str = "_schema_markup";
/// Sentinel that disables automatic optimization while present
pub const META_SEO_OVERRIDE: &str = "_seo_override";
/// Alt text stored on image attachments
pub const META_ATTACHMENT_ALT: &str = "_wp_attachment_image_alt";

/// Number of words kept in a generated meta description.
pub const META_DESCRIPTION_WORDS: usize = 25;

/// Number of keywords returned by keyword extraction.
pub const TOP_KEYWORDS: usize = 5;

// Flesch reading-ease coefficients
/// Flesch reading ease: base score.
pub const FLESCH_BASE: f64 = 206.835;
/// Weight of the words-per-sentence ratio.
pub const FLESCH_SENTENCE_WEIGHT: f64 = 1.015;
/// Weight of the syllables-per-word ratio.
pub const FLESCH_SYLLABLE_WEIGHT: f64 = 84.6;

// Image handling
/// Quality passed to the host image editor when recompressing uploads
pub const IMAGE_QUALITY: u8 = 85;
/// Prefix of generated attachment alt text
pub const IMAGE_ALT_PREFIX: &str = "Image: ";
/// Breakpoint for the `medium` source of responsive markup
pub const RESPONSIVE_MEDIUM_MAX_WIDTH: u32 = 480;
/// Breakpoint for the `large` source of responsive markup
pub const RESPONSIVE_LARGE_MAX_WIDTH: u32 = 768;

// Capabilities
/// Capability required for admin actions
pub const CAP_MANAGE_OPTIONS: &str = "manage_options";
/// Capability required for a save to trigger optimization
pub const CAP_EDIT_POST: &str = "edit_post";

// Nonces
/// Action name the dashboard nonce is bound to
pub const DASHBOARD_NONCE_ACTION: &str = "seo_dashboard_nonce";
/// Total nonce validity; a nonce is checked against the current and previous half
pub const NONCE_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);
/// Number of hex characters kept from the nonce HMAC
pub const NONCE_LENGTH: usize = 10;

// Encryption
/// Minimum length of a configured encryption key, in bytes
pub const MIN_ENCRYPTION_KEY_LEN: usize = 32;
/// Environment variable holding the encryption key
pub const ENCRYPTION_KEY_ENV: &str = "SEO_ENCRYPTION_KEY";

/// Priority used when registering the built-in event handlers.
pub const DEFAULT_HOOK_PRIORITY: i32 = 10;

/// Default directory for generated reports.
pub const DEFAULT_REPORTS_DIR: &str = "./reports";
