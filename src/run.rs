//! Site-file runs of the save pipeline.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::config::Config;
use crate::dispatch::Outcome;
use crate::host::{InMemoryHost, PostRepository};
use crate::models::{PostId, PostType};
use crate::plugin::SeoPlugin;
use crate::security::UserContext;

/// Id of the user the command line acts as.
pub const CLI_USER_ID: u64 = 0;

/// Summary of [`run_optimize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizeReport {
    /// Posts that went through the content pipeline
    pub posts_optimized: usize,
    /// Posts whose body was rewritten
    pub posts_changed: usize,
    /// Posts left alone because of `_seo_override`
    pub posts_overridden: usize,
    /// Image attachments processed
    pub images_processed: usize,
    /// Whether the site file was written back
    pub saved: bool,
    /// Wall time of the run
    pub elapsed_seconds: f64,
}

/// Loads a site file.
pub fn load_site(path: &Path) -> Result<InMemoryHost> {
    InMemoryHost::load(path).with_context(|| format!("Failed to load site file {}", path.display()))
}

/// Writes a site file back.
pub fn save_site(host: &InMemoryHost, path: &Path) -> Result<()> {
    host.save(path)
        .with_context(|| format!("Failed to write site file {}", path.display()))
}

/// Fires the save hook for every post (or one post) of a site file, and the
/// attachment hook for every attachment, then saves the file unless `dry_run`.
///
/// # Errors
///
/// Fails when the site file cannot be read or written, the plugin cannot be
/// built from `config`, the requested post does not exist, or a pipeline step
/// fails. Nothing is written back after a failure.
pub fn run_optimize(
    config: &Config,
    site: &Path,
    post: Option<PostId>,
    dry_run: bool,
) -> Result<OptimizeReport> {
    let start = Instant::now();
    let mut host = load_site(site)?;
    let mut plugin = SeoPlugin::new(config).context("Failed to initialize optimizer")?;
    let user = UserContext::administrator(CLI_USER_ID);

    let targets: Vec<(PostId, PostType)> = match post {
        Some(id) => {
            let post = host
                .get_post(id)
                .with_context(|| format!("Post {} not found in {}", id, site.display()))?;
            vec![(post.id, post.post_type)]
        }
        None => host
            .data()
            .posts
            .iter()
            .map(|p| (p.id, p.post_type))
            .collect(),
    };
    info!("Optimizing {} item(s) from {}", targets.len(), site.display());

    let mut report = OptimizeReport::default();
    for (id, post_type) in targets {
        if post_type == PostType::Attachment {
            let stored = host.attachment_metadata(id).cloned().unwrap_or_default();
            let (metadata, outcomes) = plugin
                .attachment_metadata(&mut host, id, stored)
                .with_context(|| format!("Failed to optimize attachment {}", id))?;
            if outcomes.iter().any(|o| matches!(o, Outcome::Image(_))) {
                report.images_processed += 1;
                host.set_attachment_metadata(id, metadata);
            }
            continue;
        }

        let outcomes = plugin
            .save_post(&mut host, id, false, &user)
            .with_context(|| format!("Failed to optimize post {}", id))?;
        for outcome in outcomes {
            if let Outcome::Content(content) = outcome {
                report.posts_optimized += 1;
                report.posts_changed += usize::from(content.content_changed());
                report.posts_overridden += usize::from(content.overridden);
            }
        }
    }

    if !dry_run {
        save_site(&host, site)?;
        report.saved = true;
    }
    plugin.stats().log_summary();
    report.elapsed_seconds = start.elapsed().as_secs_f64();
    Ok(report)
}
