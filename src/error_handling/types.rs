//! Error type definitions.
//!
//! This module defines the error types returned by the library and the step and
//! warning categories tracked in [`ProcessingStats`](super::ProcessingStats).

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::models::PostId;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error opening the audit log file.
    #[error("Audit log initialization error: {0}")]
    AuditLogError(#[from] std::io::Error),

    /// Error setting up encryption or nonce keys.
    #[error("Crypto initialization error: {0}")]
    CryptoError(#[from] CryptoError),

    /// The configured site URL does not parse.
    #[error("Invalid site URL: {0}")]
    SiteUrlError(#[from] url::ParseError),
}

/// Errors raised by a host implementation.
#[derive(Error, Debug)]
pub enum HostError {
    /// The requested post does not exist.
    #[error("Post {0} not found")]
    PostNotFound(PostId),

    /// The host cannot provide an image editor for the file.
    #[error("No image editor available for {}", .0.display())]
    EditorUnavailable(PathBuf),

    /// The image editor failed to process the file.
    #[error("Image editor failed: {0}")]
    EditorFailed(String),

    /// Filesystem error while reading or writing host data.
    #[error("Host I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Host data could not be (de)serialized.
    #[error("Host data format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a pipeline run.
///
/// Nothing is retried; the caller sees the first failing step.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A host read or write failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The schema record could not be serialized.
    #[error("Schema serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The audit line could not be written.
    #[error("Audit log write error: {0}")]
    AuditLog(#[source] std::io::Error),
}

/// Errors from the authenticated encryption helper.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Configured key material is shorter than required.
    #[error("Encryption key too short: {len} bytes, need at least {min}")]
    KeyTooShort {
        /// Length of the configured key
        len: usize,
        /// Required minimum
        min: usize,
    },

    /// The system random generator failed.
    #[error("Random generator failure")]
    RandomFailure,

    /// The cipher rejected the key or failed to seal.
    #[error("Encryption failed")]
    SealFailed,

    /// The ciphertext is not valid base64.
    #[error("Ciphertext is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The ciphertext is shorter than nonce and tag.
    #[error("Ciphertext truncated")]
    Truncated,

    /// Authentication failed (wrong key or tampered data).
    #[error("Ciphertext failed authentication")]
    Unauthenticated,

    /// The decrypted bytes are not UTF-8.
    #[error("Decrypted data is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Nonce verification failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NonceError {
    /// No nonce was supplied.
    #[error("Nonce missing")]
    Missing,

    /// The nonce does not match the action and user, or has expired.
    #[error("Nonce invalid or expired")]
    Invalid,
}

/// Steps executed by the save and attachment pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum StepType {
    // Content pipeline
    /// Prior content saved to the version cache
    VersionBackup,
    /// `_seo_override` present, generation skipped
    OverrideRespected,
    /// Description and focus keyword written
    MetaGenerated,
    /// Content body rewritten
    StructureOptimized,
    /// `_schema_markup` written
    SchemaInjected,
    /// Autosave or missing edit capability
    PostIgnored,
    // Attachment pipeline
    /// Attachment alt text generated
    ImageAltGenerated,
    /// Image recompressed in place
    ImageCompressed,
    /// `<picture>` markup written
    ImageResponsive,
}

/// Soft issues that do not abort processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// No words or no sentence terminators
    UnscorableReadability,
    /// Content without words
    NoKeywords,
    /// Attachment has no file on disk
    ImageFileMissing,
    /// The host image editor failed
    ImageEditorFailed,
    /// A size URL is missing
    ResponsiveUrlMissing,
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StepType {
    /// Name used in audit lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::VersionBackup => "version_backup",
            StepType::OverrideRespected => "override_respected",
            StepType::MetaGenerated => "meta_generated",
            StepType::StructureOptimized => "structure_optimized",
            StepType::SchemaInjected => "schema_injected",
            StepType::PostIgnored => "post_ignored",
            StepType::ImageAltGenerated => "image_alt_generated",
            StepType::ImageCompressed => "image_compressed",
            StepType::ImageResponsive => "image_responsive",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::UnscorableReadability => "Readability not scorable",
            WarningType::NoKeywords => "No keywords in content",
            WarningType::ImageFileMissing => "Image file missing",
            WarningType::ImageEditorFailed => "Image editor failed",
            WarningType::ResponsiveUrlMissing => "Responsive image URL missing",
        }
    }
}
