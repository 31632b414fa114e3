//! Save-time content pipeline.

use std::sync::Arc;

use crate::analysis::{generate_meta, Keyword};
use crate::audit::{AuditAction, AuditEntry, AuditTrail};
use crate::config::{CAP_EDIT_POST, META_DESCRIPTION, META_FOCUS_KEYWORD, META_SEO_OVERRIDE};
use crate::dispatch::{Event, EventHandler, Outcome};
use crate::error_handling::{PipelineError, ProcessingStats, StepType, WarningType};
use crate::host::{Host, MetaStore, PostRepository};
use crate::models::PostId;
use crate::security::UserContext;

use super::schema::inject_schema_markup;
use super::structure::normalize_structure;
use super::versions::VersionCache;

/// Result of one content pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationReport {
    /// Post the entry is about
    pub post_id: PostId,
    /// Steps that executed, in order
    pub steps: Vec<StepType>,
    /// True when `_seo_override` short-circuited generation
    pub overridden: bool,
    /// Flesch reading ease; `None` when overridden or not scorable
    pub readability: Option<f64>,
    /// Top keywords, most frequent first
    pub keywords: Vec<Keyword>,
    /// `<h1>` tags renamed to `<h2>`
    pub headings_demoted: usize,
    /// `alt=""` attributes inserted
    pub alt_attributes_added: usize,
}

impl OptimizationReport {
    fn new(post_id: PostId) -> Self {
        Self {
            post_id,
            steps: Vec::new(),
            overridden: false,
            readability: None,
            keywords: Vec::new(),
            headings_demoted: 0,
            alt_attributes_added: 0,
        }
    }

    /// True when the post body was rewritten.
    pub fn content_changed(&self) -> bool {
        self.steps.contains(&StepType::StructureOptimized)
    }
}

/// Runs Backup → (Override? skip : Generate + Normalize) → Schema → Log.
pub struct ContentOptimizer {
    versions: VersionCache,
    audit: AuditTrail,
    stats: Arc<ProcessingStats>,
}

impl ContentOptimizer {
    /// Creates an empty instance.
    pub fn new(audit: AuditTrail, stats: Arc<ProcessingStats>) -> Self {
        Self {
            versions: VersionCache::new(),
            audit,
            stats,
        }
    }

    /// Snapshots taken so far.
    pub fn versions(&self) -> &VersionCache {
        &self.versions
    }

    /// Save-event entry point: ignores autosaves and users who cannot edit posts.
    pub fn on_save<H>(
        &mut self,
        host: &mut H,
        post_id: PostId,
        autosave: bool,
        user: &UserContext,
    ) -> Result<Option<OptimizationReport>, PipelineError>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        if autosave || !user.can(CAP_EDIT_POST) {
            log::debug!(
                "Ignoring save of post {} (autosave={}, user={})",
                post_id,
                autosave,
                user.user_id
            );
            self.stats.increment_step(StepType::PostIgnored);
            return Ok(None);
        }
        self.optimize_post(host, post_id).map(Some)
    }

    /// Runs the pipeline for one post. Errors abort the run before the audit line.
    pub fn optimize_post<H>(
        &mut self,
        host: &mut H,
        post_id: PostId,
    ) -> Result<OptimizationReport, PipelineError>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        let post = host.get_post(post_id)?;
        let mut report = OptimizationReport::new(post_id);

        self.versions.backup(post_id, post.content.clone());
        self.step(&mut report, StepType::VersionBackup);

        if host.meta_exists(post_id, META_SEO_OVERRIDE)? {
            log::info!("Post {} has an SEO override, skipping generation", post_id);
            report.overridden = true;
            self.step(&mut report, StepType::OverrideRespected);
        } else {
            let meta = generate_meta(&post.content);
            host.set_meta(post_id, META_DESCRIPTION, &meta.description)?;
            match meta.focus_keyword() {
                Some(keyword) => host.set_meta(post_id, META_FOCUS_KEYWORD, keyword)?,
                None => {
                    log::warn!("Post {} has no words, focus keyword not set", post_id);
                    self.stats.increment_warning(WarningType::NoKeywords);
                }
            }
            match meta.readability {
                Some(score) => log::debug!("Post {} reading ease {:.1}", post_id, score),
                None => self.stats.increment_warning(WarningType::UnscorableReadability),
            }
            report.readability = meta.readability;
            report.keywords = meta.keywords;
            self.step(&mut report, StepType::MetaGenerated);

            let normalized = normalize_structure(&post.content);
            report.headings_demoted = normalized.headings_demoted;
            report.alt_attributes_added = normalized.alt_attributes_added;
            if normalized.changed() {
                host.update_content(post_id, &normalized.content)?;
                self.step(&mut report, StepType::StructureOptimized);
            }
        }

        inject_schema_markup(host, &post)?;
        self.step(&mut report, StepType::SchemaInjected);

        self.audit.record(&AuditEntry::new(
            AuditAction::ContentOptimized,
            post_id,
            report.steps.clone(),
        ))?;
        Ok(report)
    }

    /// Writes the snapshot for `post_id` back to the host and drops it.
    ///
    /// Returns false when there is nothing to restore.
    pub fn restore_previous<H>(&mut self, host: &mut H, post_id: PostId) -> Result<bool, PipelineError>
    where
        H: PostRepository + ?Sized,
    {
        match self.versions.take(post_id) {
            Some(previous) => {
                host.update_content(post_id, &previous)?;
                log::info!("Restored previous content of post {}", post_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn step(&self, report: &mut OptimizationReport, step: StepType) {
        report.steps.push(step);
        self.stats.increment_step(step);
    }
}

impl EventHandler for ContentOptimizer {
    fn name(&self) -> &str {
        "content_optimizer"
    }

    fn handle(&mut self, host: &mut dyn Host, event: &mut Event) -> Result<Outcome, PipelineError> {
        match event {
            Event::PostSaved {
                post_id,
                autosave,
                user,
            } => Ok(self
                .on_save(host, *post_id, *autosave, user)?
                .map_or(Outcome::Ignored, Outcome::Content)),
            Event::AttachmentMetadataGenerated { .. } => Ok(Outcome::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::META_SCHEMA_MARKUP;
    use crate::error_handling::HostError;
    use crate::host::InMemoryHost;
    use crate::models::{AuthorId, Post, PostType};

    fn optimizer() -> (ContentOptimizer, Arc<ProcessingStats>) {
        let stats = Arc::new(ProcessingStats::new());
        (ContentOptimizer::new(AuditTrail::new(), Arc::clone(&stats)), stats)
    }

    fn host_with(content: &str) -> InMemoryHost {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "Cats", content));
        host
    }

    #[test]
    fn test_full_run_writes_meta_content_and_schema() {
        let (mut optimizer, stats) = optimizer();
        let mut host = host_with("<h1>Cats</h1><h1>More cats</h1><p>The cat sat. <img src=\"a.png\"></p>");

        let report = optimizer.optimize_post(&mut host, 1).unwrap();
        assert_eq!(
            report.steps,
            vec![
                StepType::VersionBackup,
                StepType::MetaGenerated,
                StepType::StructureOptimized,
                StepType::SchemaInjected
            ]
        );
        assert_eq!(report.headings_demoted, 1);
        assert_eq!(report.alt_attributes_added, 1);

        let content = host.get_post(1).unwrap().content;
        assert_eq!(
            content,
            "<h1>Cats</h1><h2>More cats</h2><p>The cat sat. <img alt=\"\" src=\"a.png\"></p>"
        );
        assert_eq!(
            host.get_meta(1, META_DESCRIPTION).unwrap().as_deref(),
            Some("Cats More cats The cat sat.")
        );
        assert!(host.get_meta(1, META_FOCUS_KEYWORD).unwrap().is_some());
        assert!(host.get_meta(1, META_SCHEMA_MARKUP).unwrap().is_some());
        assert_eq!(stats.get_step_count(StepType::MetaGenerated), 1);
    }

    #[test]
    fn test_override_skips_generation_but_not_schema() {
        let (mut optimizer, _) = optimizer();
        let original = "<h1>A</h1><h1>B</h1><img src=x>";
        let mut host = host_with(original);
        host.set_meta(1, META_SEO_OVERRIDE, "").unwrap();

        let report = optimizer.optimize_post(&mut host, 1).unwrap();
        assert!(report.overridden);
        assert_eq!(
            report.steps,
            vec![
                StepType::VersionBackup,
                StepType::OverrideRespected,
                StepType::SchemaInjected
            ]
        );
        assert_eq!(host.get_post(1).unwrap().content, original);
        assert_eq!(host.get_meta(1, META_DESCRIPTION).unwrap(), None);
        assert_eq!(host.get_meta(1, META_FOCUS_KEYWORD).unwrap(), None);
        assert!(host.get_meta(1, META_SCHEMA_MARKUP).unwrap().is_some());
    }

    #[test]
    fn test_clean_content_is_not_rewritten() {
        let (mut optimizer, _) = optimizer();
        let mut host = host_with("<h1>One</h1><p>Fine. <img alt=\"x\" src=y></p>");
        let report = optimizer.optimize_post(&mut host, 1).unwrap();
        assert!(!report.content_changed());
    }

    #[test]
    fn test_empty_content_skips_focus_keyword() {
        let (mut optimizer, stats) = optimizer();
        let mut host = host_with("<p></p>");
        let report = optimizer.optimize_post(&mut host, 1).unwrap();
        assert_eq!(report.readability, None);
        assert_eq!(host.get_meta(1, META_DESCRIPTION).unwrap().as_deref(), Some(""));
        assert_eq!(host.get_meta(1, META_FOCUS_KEYWORD).unwrap(), None);
        assert_eq!(stats.get_warning_count(WarningType::NoKeywords), 1);
        assert_eq!(stats.get_warning_count(WarningType::UnscorableReadability), 1);
    }

    fn optimizer_with_audit_file(path: &std::path::Path) -> ContentOptimizer {
        let trail = AuditTrail::with_file(path).unwrap();
        ContentOptimizer::new(trail, Arc::new(ProcessingStats::new()))
    }

    /// Host whose content updates always fail.
    struct ReadOnlyContent(InMemoryHost);

    impl PostRepository for ReadOnlyContent {
        fn get_post(&self, id: PostId) -> Result<Post, HostError> {
            self.0.get_post(id)
        }

        fn published_posts(&self, post_type: PostType) -> Result<Vec<Post>, HostError> {
            self.0.published_posts(post_type)
        }

        fn update_content(&mut self, _id: PostId, _content: &str) -> Result<(), HostError> {
            Err(HostError::Io(std::io::Error::other("read-only")))
        }

        fn author_display_name(&self, author: AuthorId) -> Result<Option<String>, HostError> {
            self.0.author_display_name(author)
        }
    }

    impl MetaStore for ReadOnlyContent {
        fn get_meta(&self, id: PostId, key: &str) -> Result<Option<String>, HostError> {
            self.0.get_meta(id, key)
        }

        fn set_meta(&mut self, id: PostId, key: &str, value: &str) -> Result<(), HostError> {
            self.0.set_meta(id, key, value)
        }

        fn delete_meta(&mut self, id: PostId, key: &str) -> Result<bool, HostError> {
            self.0.delete_meta(id, key)
        }
    }

    #[test]
    fn test_missing_post_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("audit.log");
        let mut optimizer = optimizer_with_audit_file(&log);
        let mut host = InMemoryHost::default();
        assert!(matches!(
            optimizer.optimize_post(&mut host, 9),
            Err(PipelineError::Host(HostError::PostNotFound(9)))
        ));
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "");
    }

    #[test]
    fn test_failed_step_writes_no_audit_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("audit.log");
        let mut optimizer = optimizer_with_audit_file(&log);
        let mut host = ReadOnlyContent(host_with("<h1>A</h1><h1>B</h1>"));

        let err = optimizer.optimize_post(&mut host, 1).unwrap_err();
        assert!(matches!(err, PipelineError::Host(HostError::Io(_))));
        // Steps before the failure still ran
        assert!(host.0.get_meta(1, META_DESCRIPTION).unwrap().is_some());
        assert!(host.0.get_meta(1, META_SCHEMA_MARKUP).unwrap().is_none());
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "");

        let mut host = host_with("<p>Fine.</p>");
        optimizer.optimize_post(&mut host, 1).unwrap();
        assert_eq!(std::fs::read_to_string(&log).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_guard_ignores_autosave_and_unprivileged_users() {
        let (mut optimizer, stats) = optimizer();
        let mut host = host_with("<h1>A</h1><h1>B</h1>");

        let admin = UserContext::administrator(1);
        assert!(optimizer.on_save(&mut host, 1, true, &admin).unwrap().is_none());
        let reader = UserContext::new(2);
        assert!(optimizer.on_save(&mut host, 1, false, &reader).unwrap().is_none());

        assert_eq!(stats.get_step_count(StepType::PostIgnored), 2);
        assert!(optimizer.versions().is_empty());
        assert_eq!(host.get_post(1).unwrap().content, "<h1>A</h1><h1>B</h1>");
    }

    #[test]
    fn test_restore_previous_content() {
        let (mut optimizer, _) = optimizer();
        let original = "<h1>A</h1><h1>B</h1>";
        let mut host = host_with(original);
        optimizer.optimize_post(&mut host, 1).unwrap();
        assert_ne!(host.get_post(1).unwrap().content, original);

        assert!(optimizer.restore_previous(&mut host, 1).unwrap());
        assert_eq!(host.get_post(1).unwrap().content, original);
        assert!(!optimizer.restore_previous(&mut host, 1).unwrap());
    }

    #[test]
    fn test_backup_keeps_latest_prior_version() {
        let (mut optimizer, _) = optimizer();
        let mut host = host_with("<h1>A</h1><h1>B</h1>");
        optimizer.optimize_post(&mut host, 1).unwrap();
        optimizer.optimize_post(&mut host, 1).unwrap();
        assert_eq!(optimizer.versions().get(1), Some("<h1>A</h1><h2>B</h2>"));
        assert_eq!(optimizer.versions().len(), 1);
    }
}
