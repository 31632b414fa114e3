//! Composition root.
//!
//! [`SeoPlugin`] builds every component from a [`Config`] and registers the
//! event handlers with its [`EventDispatcher`]. Components never register
//! themselves.

use std::sync::Arc;

use url::Url;

use crate::audit::AuditTrail;
use crate::bulk::BulkTools;
use crate::config::{Config, DEFAULT_HOOK_PRIORITY};
use crate::dashboard::PerformanceDashboard;
use crate::dispatch::{
    ActionRouter, AjaxRequest, AjaxResponse, Event, EventDispatcher, Hook, Outcome,
};
use crate::error_handling::{CryptoError, InitializationError, PipelineError, ProcessingStats};
use crate::host::Host;
use crate::media::ImageOptimizer;
use crate::models::{AttachmentMetadata, PostId};
use crate::optimizer::ContentOptimizer;
use crate::security::{NonceIssuer, SecretBox, UserContext};

/// The wired-up set of optimizers, tools and security helpers.
pub struct SeoPlugin {
    dispatcher: EventDispatcher,
    router: ActionRouter,
    bulk: BulkTools,
    dashboard: PerformanceDashboard,
    secret_box: SecretBox,
    stats: Arc<ProcessingStats>,
}

impl SeoPlugin {
    /// Builds all components.
    ///
    /// # Errors
    ///
    /// Fails when the audit log cannot be opened, the site URL does not parse,
    /// or the encryption key is too short.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let stats = Arc::new(ProcessingStats::new());
        let site_url = config.site_url.as_deref().map(Url::parse).transpose()?;
        let key = config.encryption_key.as_deref();

        let bulk = BulkTools::new(site_url);
        let dashboard = PerformanceDashboard::new(bulk.clone(), config.reports_dir.clone());
        let router = ActionRouter::new(
            NonceIssuer::from_config(key)?,
            bulk.clone(),
            dashboard.clone(),
        );

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(
            Hook::SavePost,
            DEFAULT_HOOK_PRIORITY,
            Box::new(ContentOptimizer::new(
                audit_trail(config)?,
                Arc::clone(&stats),
            )),
        );
        dispatcher.register(
            Hook::AttachmentMetadata,
            DEFAULT_HOOK_PRIORITY,
            Box::new(ImageOptimizer::new(audit_trail(config)?, Arc::clone(&stats))),
        );

        Ok(Self {
            dispatcher,
            router,
            bulk,
            dashboard,
            secret_box: SecretBox::from_config(key)?,
            stats,
        })
    }

    /// Fires the save hook for a post.
    pub fn save_post(
        &mut self,
        host: &mut dyn Host,
        post_id: PostId,
        autosave: bool,
        user: &UserContext,
    ) -> Result<Vec<Outcome>, PipelineError> {
        let mut event = Event::PostSaved {
            post_id,
            autosave,
            user: user.clone(),
        };
        self.dispatcher.dispatch(host, &mut event)
    }

    /// Fires the attachment metadata hook and returns the metadata the host
    /// should store.
    pub fn attachment_metadata(
        &mut self,
        host: &mut dyn Host,
        attachment_id: PostId,
        metadata: AttachmentMetadata,
    ) -> Result<(AttachmentMetadata, Vec<Outcome>), PipelineError> {
        let mut event = Event::AttachmentMetadataGenerated {
            attachment_id,
            metadata,
        };
        let outcomes = self.dispatcher.dispatch(host, &mut event)?;
        let metadata = event.attachment_metadata().cloned().unwrap_or_default();
        Ok((metadata, outcomes))
    }

    /// Routes an admin action; never fails, errors become `success: false`.
    pub fn handle_action(&self, host: &mut dyn Host, request: &AjaxRequest) -> AjaxResponse {
        self.router.handle(host, request)
    }

    /// Nonce for admin requests made by `user`.
    pub fn create_nonce(&self, user: &UserContext) -> String {
        self.router.create_nonce(user)
    }

    /// Encrypts with the configured key; see [`SecretBox`].
    pub fn encrypt_data(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.secret_box.encrypt_data(plaintext)
    }

    /// Reverses [`encrypt_data`](Self::encrypt_data).
    pub fn decrypt_data(&self, encoded: &str) -> Result<String, CryptoError> {
        self.secret_box.decrypt_data(encoded)
    }

    /// Bulk tools bound to the configured site URL.
    pub fn bulk_tools(&self) -> &BulkTools {
        &self.bulk
    }

    /// Dashboard writing into the configured reports directory.
    pub fn dashboard(&self) -> &PerformanceDashboard {
        &self.dashboard
    }

    /// Registered handlers, for inspection.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Counters shared by every handler.
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

fn audit_trail(config: &Config) -> Result<AuditTrail, InitializationError> {
    Ok(match &config.audit_log {
        Some(path) => AuditTrail::with_file(path)?,
        None => AuditTrail::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::StepType;
    use crate::host::{InMemoryHost, PostRepository};
    use crate::models::Post;

    #[test]
    fn test_components_are_registered() {
        let plugin = SeoPlugin::new(&Config::default()).unwrap();
        assert_eq!(
            plugin.dispatcher().handler_names(Hook::SavePost),
            vec!["content_optimizer"]
        );
        assert_eq!(
            plugin.dispatcher().handler_names(Hook::AttachmentMetadata),
            vec!["image_optimizer"]
        );
    }

    #[test]
    fn test_invalid_configuration() {
        let config = Config {
            site_url: Some("::not a url".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SeoPlugin::new(&config),
            Err(InitializationError::SiteUrlError(_))
        ));

        let config = Config {
            encryption_key: Some("short".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SeoPlugin::new(&config),
            Err(InitializationError::CryptoError(CryptoError::KeyTooShort { .. }))
        ));
    }

    #[test]
    fn test_save_post_runs_pipeline() {
        let mut plugin = SeoPlugin::new(&Config::default()).unwrap();
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "T", "<h1>a</h1><h1>b</h1>"));

        let outcomes = plugin
            .save_post(&mut host, 1, false, &UserContext::administrator(1))
            .unwrap();
        assert!(matches!(&outcomes[..], [Outcome::Content(report)] if report.content_changed()));
        assert_eq!(host.get_post(1).unwrap().content, "<h1>a</h1><h2>b</h2>");
        assert_eq!(plugin.stats().get_step_count(StepType::SchemaInjected), 1);
    }

    #[test]
    fn test_configured_key_decrypts_across_instances() {
        let config = Config {
            encryption_key: Some("k".repeat(32)),
            ..Default::default()
        };
        let sealed = SeoPlugin::new(&config).unwrap().encrypt_data("token").unwrap();
        let reopened = SeoPlugin::new(&config).unwrap();
        assert_eq!(reopened.decrypt_data(&sealed).unwrap(), "token");
    }
}
