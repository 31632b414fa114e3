//! Attachment image optimization.
//!
//! Runs when the host generates metadata for an upload. Non-image attachments
//! pass through untouched. For images three best-effort steps run in order:
//! alt text from the file name, recompression through the host image editor,
//! and a responsive `<picture>` body for the attachment post.

use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::audit::{AuditAction, AuditEntry, AuditTrail};
use crate::config::{
    IMAGE_ALT_PREFIX, IMAGE_QUALITY, META_ATTACHMENT_ALT, RESPONSIVE_LARGE_MAX_WIDTH,
    RESPONSIVE_MEDIUM_MAX_WIDTH,
};
use crate::dispatch::{Event, EventHandler, Outcome};
use crate::error_handling::{HostError, PipelineError, ProcessingStats, StepType, WarningType};
use crate::host::Host;
use crate::markup::escape_attribute;
use crate::models::{AttachmentMetadata, ImageSize, PostId};
use crate::utils::compile_regex_unsafe;

/// File extension of three or four characters, no dots or whitespace.
static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\.[^.\s]{3,4}$", "EXTENSION_RE"));

/// What the image pipeline did for one attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    /// Attachment processed
    pub attachment_id: PostId,
    /// Steps run, in order
    pub steps: Vec<StepType>,
    /// Alt text written by this run, `None` when one already existed
    pub generated_alt: Option<String>,
    /// File size after recompression
    pub filesize: Option<u64>,
}

/// `"Image: "` followed by the file name without its extension.
///
/// Only 3-4 character extensions are removed, so `photo.jpeg` becomes
/// `Image: photo` while `archive.gz` keeps its suffix.
pub fn alt_text_from_file_name(file_name: &str) -> String {
    format!("{}{}", IMAGE_ALT_PREFIX, EXTENSION_RE.replace(file_name, ""))
}

/// `<picture>` element with medium and large sources around `img_markup`.
///
/// Sources whose URL is unknown are left out.
pub fn responsive_markup(img_markup: &str, medium: Option<&str>, large: Option<&str>) -> String {
    let mut html = String::from("<picture>\n");
    for (max_width, url) in [
        (RESPONSIVE_MEDIUM_MAX_WIDTH, medium),
        (RESPONSIVE_LARGE_MAX_WIDTH, large),
    ] {
        if let Some(url) = url {
            html.push_str(&format!(
                "<source media=\"(max-width: {}px)\" srcset=\"{}\">\n",
                max_width,
                escape_attribute(url)
            ));
        }
    }
    html.push_str(img_markup);
    html.push_str("\n</picture>");
    html
}

/// Full-size `<img>` tag for an attachment.
pub fn image_markup(url: &str, alt: &str, metadata: &AttachmentMetadata) -> String {
    let mut html = String::from("<img");
    if metadata.width > 0 && metadata.height > 0 {
        html.push_str(&format!(
            " width=\"{}\" height=\"{}\"",
            metadata.width, metadata.height
        ));
    }
    html.push_str(&format!(
        " src=\"{}\" class=\"attachment-full size-full\" alt=\"{}\">",
        escape_attribute(url),
        escape_attribute(alt)
    ));
    html
}

/// Image pipeline registered on the attachment metadata hook.
pub struct ImageOptimizer {
    audit: AuditTrail,
    stats: Arc<ProcessingStats>,
}

impl ImageOptimizer {
    /// Creates an empty instance.
    pub fn new(audit: AuditTrail, stats: Arc<ProcessingStats>) -> Self {
        Self { audit, stats }
    }

    /// Processes one attachment, updating `metadata` in place.
    ///
    /// Returns `None` for attachments that are not images.
    pub fn optimize_image<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        attachment_id: PostId,
        metadata: &mut AttachmentMetadata,
    ) -> Result<Option<ImageReport>, PipelineError> {
        if !host.get_post(attachment_id)?.is_image() {
            log::debug!("Attachment {} is not an image, skipping", attachment_id);
            return Ok(None);
        }

        let mut report = ImageReport {
            attachment_id,
            steps: Vec::new(),
            generated_alt: None,
            filesize: None,
        };

        report.generated_alt = self.generate_alt_text(host, attachment_id, metadata)?;
        if report.generated_alt.is_some() {
            self.step(&mut report, StepType::ImageAltGenerated);
        }
        if self.compress_image(host, attachment_id, metadata)? {
            report.filesize = metadata.filesize;
            self.step(&mut report, StepType::ImageCompressed);
        }
        if self.make_responsive(host, attachment_id, metadata)? {
            self.step(&mut report, StepType::ImageResponsive);
        }

        self.audit.record(&AuditEntry::new(
            AuditAction::ImageOptimized,
            attachment_id,
            report.steps.clone(),
        ))?;
        Ok(Some(report))
    }

    fn generate_alt_text<H: Host + ?Sized>(
        &self,
        host: &mut H,
        attachment_id: PostId,
        metadata: &AttachmentMetadata,
    ) -> Result<Option<String>, PipelineError> {
        let existing = host.get_meta(attachment_id, META_ATTACHMENT_ALT)?;
        if existing.is_some_and(|alt| !alt.is_empty()) {
            return Ok(None);
        }

        let path = host
            .attached_file(attachment_id)?
            .unwrap_or_else(|| metadata.file.clone().into());
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let alt = alt_text_from_file_name(&file_name);
        host.set_meta(attachment_id, META_ATTACHMENT_ALT, &alt)?;
        log::debug!("Generated alt text {:?} for attachment {}", alt, attachment_id);
        Ok(Some(alt))
    }

    /// Recompresses the file in place. Editor failures are logged, not returned.
    fn compress_image<H: Host + ?Sized>(
        &self,
        host: &mut H,
        attachment_id: PostId,
        metadata: &mut AttachmentMetadata,
    ) -> Result<bool, PipelineError> {
        let Some(path) = host.attached_file(attachment_id)?.filter(|p| p.is_file()) else {
            log::debug!("No file for attachment {}, skipping compression", attachment_id);
            self.stats.increment_warning(WarningType::ImageFileMissing);
            return Ok(false);
        };

        if let Err(e) = recompress(host, &path) {
            log::warn!("Could not recompress {}: {}", path.display(), e);
            self.stats.increment_warning(WarningType::ImageEditorFailed);
            return Ok(false);
        }

        match fs::metadata(&path) {
            Ok(file) => metadata.filesize = Some(file.len()),
            Err(e) => log::warn!("Could not read size of {}: {}", path.display(), e),
        }
        Ok(true)
    }

    fn make_responsive<H: Host + ?Sized>(
        &self,
        host: &mut H,
        attachment_id: PostId,
        metadata: &AttachmentMetadata,
    ) -> Result<bool, PipelineError> {
        let Some(full) = host.attachment_url(attachment_id, ImageSize::Full)? else {
            log::warn!("Attachment {} has no full-size URL", attachment_id);
            self.stats.increment_warning(WarningType::ResponsiveUrlMissing);
            return Ok(false);
        };
        let medium = host.attachment_url(attachment_id, ImageSize::Medium)?;
        let large = host.attachment_url(attachment_id, ImageSize::Large)?;
        if medium.is_none() || large.is_none() {
            self.stats.increment_warning(WarningType::ResponsiveUrlMissing);
        }

        let alt = host
            .get_meta(attachment_id, META_ATTACHMENT_ALT)?
            .unwrap_or_default();
        let html = responsive_markup(
            &image_markup(&full, &alt, metadata),
            medium.as_deref(),
            large.as_deref(),
        );
        host.update_content(attachment_id, &html)?;
        Ok(true)
    }

    fn step(&self, report: &mut ImageReport, step: StepType) {
        report.steps.push(step);
        self.stats.increment_step(step);
    }
}

fn recompress<H: Host + ?Sized>(host: &H, path: &Path) -> Result<(), HostError> {
    let mut editor = host.image_editor(path)?;
    editor.set_quality(IMAGE_QUALITY);
    editor.save(path)
}

impl EventHandler for ImageOptimizer {
    fn name(&self) -> &str {
        "image_optimizer"
    }

    fn handle(&mut self, host: &mut dyn Host, event: &mut Event) -> Result<Outcome, PipelineError> {
        match event {
            Event::AttachmentMetadataGenerated {
                attachment_id,
                metadata,
            } => Ok(self
                .optimize_image(host, *attachment_id, metadata)?
                .map_or(Outcome::Ignored, Outcome::Image)),
            Event::PostSaved { .. } => Ok(Outcome::Ignored),
        }
    }
}
