//! Host event dispatch.
//!
//! Components are registered explicitly by the composition root
//! ([`SeoPlugin`](crate::SeoPlugin)) under a [`Hook`] and a priority. Handlers for
//! one hook run in ascending priority; equal priorities keep registration order.

mod ajax;

use crate::error_handling::PipelineError;
use crate::host::Host;
use crate::media::ImageReport;
use crate::models::{AttachmentMetadata, PostId};
use crate::optimizer::OptimizationReport;
use crate::security::UserContext;

pub use ajax::{
    ActionRouter, AdminAction, AjaxRequest, AjaxResponse, MSG_INSUFFICIENT_PERMISSIONS,
    MSG_SECURITY_CHECK_FAILED, MSG_UNKNOWN_ACTION,
};

/// Host extension points a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// A post was saved.
    SavePost,
    /// Metadata was generated for an uploaded attachment.
    AttachmentMetadata,
}

/// Event delivered to handlers.
#[derive(Debug, Clone)]
pub enum Event {
    /// A post was created or updated.
    PostSaved {
        /// Saved post
        post_id: PostId,
        /// Autosaves are never optimized
        autosave: bool,
        /// User who saved the post
        user: UserContext,
    },
    /// Handlers may rewrite `metadata`; the final value is what the host stores.
    AttachmentMetadataGenerated {
        /// Uploaded attachment
        attachment_id: PostId,
        /// Metadata the host generated
        metadata: AttachmentMetadata,
    },
}

impl Event {
    /// Hook the event is delivered on.
    pub fn hook(&self) -> Hook {
        match self {
            Event::PostSaved { .. } => Hook::SavePost,
            Event::AttachmentMetadataGenerated { .. } => Hook::AttachmentMetadata,
        }
    }

    /// Metadata carried by an attachment event.
    pub fn attachment_metadata(&self) -> Option<&AttachmentMetadata> {
        match self {
            Event::AttachmentMetadataGenerated { metadata, .. } => Some(metadata),
            Event::PostSaved { .. } => None,
        }
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The event did not apply (autosave, missing capability, non-image, ...).
    Ignored,
    /// The save pipeline ran
    Content(OptimizationReport),
    /// The image pipeline ran
    Image(ImageReport),
}

/// A component reacting to host events.
pub trait EventHandler {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Reacts to `event`; errors stop the dispatch.
    fn handle(&mut self, host: &mut dyn Host, event: &mut Event) -> Result<Outcome, PipelineError>;
}

struct Registration {
    hook: Hook,
    priority: i32,
    handler: Box<dyn EventHandler>,
}

/// Ordered handler registry.
#[derive(Default)]
pub struct EventDispatcher {
    registrations: Vec<Registration>,
}

impl EventDispatcher {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `hook`. Lower priorities run first.
    pub fn register(&mut self, hook: Hook, priority: i32, handler: Box<dyn EventHandler>) {
        log::debug!(
            "Registering {} for {:?} at priority {}",
            handler.name(),
            hook,
            priority
        );
        // Insert after every registration with a priority <= ours
        let position = self
            .registrations
            .iter()
            .position(|r| r.priority > priority)
            .unwrap_or(self.registrations.len());
        self.registrations.insert(
            position,
            Registration {
                hook,
                priority,
                handler,
            },
        );
    }

    /// Number of handlers registered for `hook`.
    pub fn handler_count(&self, hook: Hook) -> usize {
        self.registrations.iter().filter(|r| r.hook == hook).count()
    }

    /// Names of the handlers for `hook`, in execution order.
    pub fn handler_names(&self, hook: Hook) -> Vec<&str> {
        self.registrations
            .iter()
            .filter(|r| r.hook == hook)
            .map(|r| r.handler.name())
            .collect()
    }

    /// Runs every handler for the event's hook, stopping at the first error.
    pub fn dispatch(
        &mut self,
        host: &mut dyn Host,
        event: &mut Event,
    ) -> Result<Vec<Outcome>, PipelineError> {
        let hook = event.hook();
        let mut outcomes = Vec::new();
        for registration in self.registrations.iter_mut().filter(|r| r.hook == hook) {
            let outcome = registration.handler.handle(host, event)?;
            log::trace!("{} handled {:?}", registration.handler.name(), hook);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
