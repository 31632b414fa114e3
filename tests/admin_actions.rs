//! Admin actions routed through the plugin.

mod helpers;

use helpers::{draft, host_with, post};
use seo_optimizer::dispatch::{
    AjaxRequest, MSG_INSUFFICIENT_PERMISSIONS, MSG_SECURITY_CHECK_FAILED, MSG_UNKNOWN_ACTION,
};
use seo_optimizer::host::PostRepository;
use seo_optimizer::security::UserContext;
use seo_optimizer::{Config, SeoPlugin};
use serde_json::json;

fn plugin(reports: &std::path::Path) -> SeoPlugin {
    let config = Config {
        site_url: Some("https://example.com".to_string()),
        reports_dir: reports.to_path_buf(),
        ..Default::default()
    };
    SeoPlugin::new(&config).expect("plugin should build")
}

#[test]
fn test_guards_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = plugin(dir.path());
    let mut host = host_with(vec![post(1, "A", "<p>a</p>")]);
    let admin = UserContext::administrator(1);
    let nonce = plugin.create_nonce(&admin);

    let unknown = AjaxRequest::new("delete_everything", Some(nonce.clone()), admin.clone());
    assert_eq!(plugin.handle_action(&mut host, &unknown).message(), Some(MSG_UNKNOWN_ACTION));

    let forged = AjaxRequest::new("run_seo_audit", Some("abcdef0123".into()), admin.clone());
    assert_eq!(
        plugin.handle_action(&mut host, &forged).message(),
        Some(MSG_SECURITY_CHECK_FAILED)
    );

    let subscriber = UserContext::new(9);
    let weak = AjaxRequest::new(
        "run_seo_audit",
        Some(plugin.create_nonce(&subscriber)),
        subscriber,
    );
    assert_eq!(
        plugin.handle_action(&mut host, &weak).message(),
        Some(MSG_INSUFFICIENT_PERMISSIONS)
    );
}

#[test]
fn test_error_response_shape() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = plugin(dir.path());
    let mut host = host_with(vec![]);
    let request = AjaxRequest::new("run_seo_audit", None, UserContext::administrator(1));
    let response = plugin.handle_action(&mut host, &request);
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "success": false, "data": { "message": "Security check failed" } })
    );
}

#[test]
fn test_fix_internal_links_action() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = plugin(dir.path());
    let mut host = host_with(vec![
        post(1, "A", r#"<a href="https://example.com/about.html">About</a>"#),
        post(2, "B", r#"<a href="https://elsewhere.net/x.html">X</a>"#),
        draft(3, "C", r#"<a href="/draft.html">D</a>"#),
    ]);
    let admin = UserContext::administrator(1);
    let request = AjaxRequest::new(
        "fix_internal_links",
        Some(plugin.create_nonce(&admin)),
        admin,
    );

    let response = plugin.handle_action(&mut host, &request);
    assert!(response.success);
    assert_eq!(response.data, json!({ "total_posts": 2, "fixed": 1 }));
    assert_eq!(
        host.get_post(1).unwrap().content,
        r#"<a href="https://example.com/about/">About</a>"#
    );
    assert_eq!(host.get_post(3).unwrap().content, r#"<a href="/draft.html">D</a>"#);
}

#[test]
fn test_generate_report_action_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let reports = dir.path().join("out");
    let plugin = plugin(&reports);
    let mut host = host_with(vec![post(1, "A", "<h1>A</h1>")]);
    let admin = UserContext::administrator(1);
    let request = AjaxRequest::new(
        "generate_seo_report",
        Some(plugin.create_nonce(&admin)),
        admin,
    );

    let response = plugin.handle_action(&mut host, &request);
    assert!(response.success, "unexpected response {:?}", response);
    let path = std::path::PathBuf::from(response.data["path"].as_str().unwrap());
    assert!(path.starts_with(&reports));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("seo-report-") && name.ends_with(".json"));
    assert_eq!(name.len(), "seo-report-YYYYMMDD.json".len());
}

#[test]
fn test_action_name_is_sanitized() {
    let dir = tempfile::tempdir().unwrap();
    let plugin = plugin(dir.path());
    let mut host = host_with(vec![post(1, "A", "<p>a</p>")]);
    let admin = UserContext::administrator(1);
    let request = AjaxRequest::new(
        "  <b>run_seo_audit</b>\n",
        Some(plugin.create_nonce(&admin)),
        admin,
    );
    assert!(plugin.handle_action(&mut host, &request).success);
}
