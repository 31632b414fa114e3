//! Audit trail of pipeline runs.
//!
//! Every successful run produces one [`AuditEntry`]. Entries always go to the
//! process log under the [`AUDIT_TARGET`] target and, when configured, are
//! appended to a file. There is no rotation or retention.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error_handling::{PipelineError, StepType};
use crate::models::PostId;

/// Log target of audit lines.
pub const AUDIT_TARGET: &str = "seo_audit";

/// Action recorded in an audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// The save pipeline ran
    ContentOptimized,
    /// The image pipeline ran
    ImageOptimized,
}

impl AuditAction {
    /// Name written into the audit line.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ContentOptimized => "content_optimized",
            AuditAction::ImageOptimized => "image_optimized",
        }
    }
}

/// One pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Which pipeline ran
    pub action: AuditAction,
    /// Post the entry is about
    pub post_id: PostId,
    /// Steps that executed, in order
    pub steps: Vec<StepType>,
}

impl AuditEntry {
    /// Entry for one pipeline run.
    pub fn new(action: AuditAction, post_id: PostId, steps: Vec<StepType>) -> Self {
        Self {
            action,
            post_id,
            steps,
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(StepType::as_str).collect();
        write!(
            f,
            "SEO Audit: {} post_id={} steps=[{}]",
            self.action.as_str(),
            self.post_id,
            steps.join(",")
        )
    }
}

/// Sink for audit entries.
#[derive(Debug, Default)]
pub struct AuditTrail {
    file: Option<File>,
}

impl AuditTrail {
    /// Log-only trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trail that also appends to `path`, creating the file if needed.
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Some(file) })
    }

    /// Writes one entry. File lines are prefixed with a UTC timestamp.
    pub fn record(&mut self, entry: &AuditEntry) -> Result<(), PipelineError> {
        log::info!(target: AUDIT_TARGET, "{}", entry);
        if let Some(file) = self.file.as_mut() {
            writeln!(
                file,
                "[{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
                entry
            )
            .map_err(PipelineError::AuditLog)?;
        }
        Ok(())
    }
}
