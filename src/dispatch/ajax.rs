//! Admin actions.
//!
//! Every action is guarded by a dashboard nonce and the `manage_options`
//! capability. Responses always have the shape `{ "success": bool, "data": ... }`;
//! failures carry `{ "message": "..." }` as data.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::bulk::BulkTools;
use crate::config::{CAP_MANAGE_OPTIONS, DASHBOARD_NONCE_ACTION};
use crate::dashboard::PerformanceDashboard;
use crate::host::Host;
use crate::security::{sanitize_text_field, NonceIssuer, UserContext};

/// Message for a missing or invalid nonce.
pub const MSG_SECURITY_CHECK_FAILED: &str = "Security check failed";
/// Message for a user without `manage_options`.
pub const MSG_INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";
/// Message for an action name that is not recognised.
pub const MSG_UNKNOWN_ACTION: &str = "Unknown action";

/// Actions reachable through [`ActionRouter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AdminAction {
    /// Bulk audit of published posts
    RunSeoAudit,
    /// Regenerate meta descriptions
    UpdateMetaDescriptions,
    /// Rewrite internal `.html` links
    FixInternalLinks,
    /// Write a dashboard report
    GenerateSeoReport,
}

/// An incoming admin request.
#[derive(Debug, Clone)]
pub struct AjaxRequest {
    /// Action name as received, sanitized before lookup
    pub action: String,
    /// Nonce for the dashboard action
    pub nonce: Option<String>,
    /// Who is asking
    pub user: UserContext,
}

impl AjaxRequest {
    /// Creates an empty instance.
    pub fn new(action: impl Into<String>, nonce: Option<String>, user: UserContext) -> Self {
        Self {
            action: action.into(),
            nonce,
            user,
        }
    }
}

/// JSON envelope returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AjaxResponse {
    /// False when a guard rejected the request or the action failed
    pub success: bool,
    /// Action result, or `{ "message": ... }` on failure
    pub data: Value,
}

impl AjaxResponse {
    /// Successful response carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Failure carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: json!({ "message": message.into() }),
        }
    }

    /// Failure message, if this is an error response.
    pub fn message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.data.get("message").and_then(Value::as_str)
    }
}

/// Maps action names to the bulk tools and the dashboard.
pub struct ActionRouter {
    nonces: NonceIssuer,
    bulk: BulkTools,
    dashboard: PerformanceDashboard,
}

impl ActionRouter {
    /// Creates an empty instance.
    pub fn new(nonces: NonceIssuer, bulk: BulkTools, dashboard: PerformanceDashboard) -> Self {
        Self {
            nonces,
            bulk,
            dashboard,
        }
    }

    /// Nonce a client must send with its requests.
    pub fn create_nonce(&self, user: &UserContext) -> String {
        self.nonces.create(DASHBOARD_NONCE_ACTION, user.user_id)
    }

    /// Checks the request and runs the action. Never fails; errors become
    /// `success: false` responses.
    pub fn handle<H: Host + ?Sized>(&self, host: &mut H, request: &AjaxRequest) -> AjaxResponse {
        let name = sanitize_text_field(&request.action);
        let Ok(action) = AdminAction::from_str(&name) else {
            log::warn!("Rejected unknown admin action {:?}", name);
            return AjaxResponse::error(MSG_UNKNOWN_ACTION);
        };

        let nonce = request.nonce.as_deref().map(sanitize_text_field).unwrap_or_default();
        if let Err(e) = self
            .nonces
            .verify(&nonce, DASHBOARD_NONCE_ACTION, request.user.user_id)
        {
            log::warn!(
                "Rejected {} for user {}: {}",
                action.as_ref(),
                request.user.user_id,
                e
            );
            return AjaxResponse::error(MSG_SECURITY_CHECK_FAILED);
        }
        if !request.user.can(CAP_MANAGE_OPTIONS) {
            log::warn!(
                "User {} lacks {} for {}",
                request.user.user_id,
                CAP_MANAGE_OPTIONS,
                action.as_ref()
            );
            return AjaxResponse::error(MSG_INSUFFICIENT_PERMISSIONS);
        }

        match self.run(host, action) {
            Ok(data) => AjaxResponse::success(data),
            Err(e) => {
                log::error!("Admin action {} failed: {:#}", action.as_ref(), e);
                AjaxResponse::error(format!("{:#}", e))
            }
        }
    }

    fn run<H: Host + ?Sized>(&self, host: &mut H, action: AdminAction) -> anyhow::Result<Value> {
        let data = match action {
            AdminAction::RunSeoAudit => serde_json::to_value(self.bulk.run_seo_audit(host)?)?,
            AdminAction::UpdateMetaDescriptions => {
                serde_json::to_value(self.bulk.update_meta_descriptions(host)?)?
            }
            AdminAction::FixInternalLinks => {
                serde_json::to_value(self.bulk.fix_internal_links(host)?)?
            }
            AdminAction::GenerateSeoReport => {
                let path = self.dashboard.generate_seo_report(host)?;
                json!({ "path": path.display().to_string() })
            }
        };
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{InMemoryHost, MetaStore};
    use crate::models::Post;
    use strum::IntoEnumIterator;

    fn router(reports: &std::path::Path) -> ActionRouter {
        ActionRouter::new(
            NonceIssuer::new(b"router-test"),
            BulkTools::default(),
            PerformanceDashboard::new(BulkTools::default(), reports),
        )
    }

    fn site() -> InMemoryHost {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "A", "<p>Some words here</p>"));
        host
    }

    #[test]
    fn test_action_names() {
        let names: Vec<String> = AdminAction::iter().map(|a| a.as_ref().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "run_seo_audit",
                "update_meta_descriptions",
                "fix_internal_links",
                "generate_seo_report"
            ]
        );
        assert_eq!(
            AdminAction::from_str("fix_internal_links").unwrap(),
            AdminAction::FixInternalLinks
        );
    }

    #[test]
    fn test_unknown_action() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let admin = UserContext::administrator(1);
        let request = AjaxRequest::new("drop_tables", Some(router.create_nonce(&admin)), admin);
        let response = router.handle(&mut site(), &request);
        assert_eq!(response.message(), Some(MSG_UNKNOWN_ACTION));
    }

    #[test]
    fn test_bad_or_missing_nonce() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let admin = UserContext::administrator(1);
        for nonce in [None, Some("0000000000".to_string())] {
            let request = AjaxRequest::new("run_seo_audit", nonce, admin.clone());
            let response = router.handle(&mut site(), &request);
            assert!(!response.success);
            assert_eq!(response.message(), Some(MSG_SECURITY_CHECK_FAILED));
        }
    }

    #[test]
    fn test_nonce_of_other_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let nonce = router.create_nonce(&UserContext::administrator(2));
        let request = AjaxRequest::new("run_seo_audit", Some(nonce), UserContext::administrator(1));
        assert_eq!(
            router.handle(&mut site(), &request).message(),
            Some(MSG_SECURITY_CHECK_FAILED)
        );
    }

    #[test]
    fn test_missing_capability() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let editor = UserContext::new(3).with_capability("edit_post");
        let request = AjaxRequest::new("run_seo_audit", Some(router.create_nonce(&editor)), editor);
        assert_eq!(
            router.handle(&mut site(), &request).message(),
            Some(MSG_INSUFFICIENT_PERMISSIONS)
        );
    }

    #[test]
    fn test_run_audit_and_update_meta() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let admin = UserContext::administrator(1);
        let mut host = site();

        let nonce = Some(router.create_nonce(&admin));
        let audit = router.handle(&mut host, &AjaxRequest::new("run_seo_audit", nonce.clone(), admin.clone()));
        assert!(audit.success);
        assert_eq!(audit.data["total_posts"], 1);
        assert_eq!(audit.data["needs_attention"], 1);

        let update = router.handle(
            &mut host,
            &AjaxRequest::new("update_meta_descriptions", nonce, admin),
        );
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "success": true, "data": { "total_posts": 1, "updated": 1 } })
        );
        assert_eq!(
            host.get_meta(1, "_meta_description").unwrap().as_deref(),
            Some("Some words here")
        );
    }

    #[test]
    fn test_generate_report_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let router = router(dir.path());
        let admin = UserContext::administrator(1);
        let request = AjaxRequest::new(
            "generate_seo_report",
            Some(router.create_nonce(&admin)),
            admin,
        );
        let response = router.handle(&mut site(), &request);
        assert!(response.success);
        let path = response.data["path"].as_str().unwrap();
        assert!(std::path::Path::new(path).is_file());
    }
}
