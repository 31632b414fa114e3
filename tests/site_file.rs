//! Whole-site runs over a JSON site file.

mod helpers;

use helpers::{read_site_file, write_site_file};
use seo_optimizer::config::{
    META_ATTACHMENT_ALT, META_DESCRIPTION, META_FOCUS_KEYWORD, META_SCHEMA_MARKUP,
};
use seo_optimizer::{load_site, run_optimize, Config};

const SITE: &str = r#"{
  "site_url": "https://example.com",
  "posts": [
    { "id": 1, "title": "Cats", "author": 3, "date": "2024-01-02T03:04:05+00:00",
      "status": "publish", "content": "<h1>Cats</h1><h1>Dogs</h1><p>Cats are great. <img src=\"c.jpg\"></p>" },
    { "id": 2, "title": "Manual", "status": "publish", "content": "<h1>A</h1><h1>B</h1>" },
    { "id": 7, "title": "sunset", "status": "inherit", "post_type": "attachment",
      "mime_type": "image/jpeg", "content": "" }
  ],
  "meta": { "2": { "_seo_override": "yes" } },
  "authors": { "3": "Jane Doe" },
  "media": {
    "7": {
      "file": "uploads/sunset-beach.jpg",
      "urls": { "full": "https://example.com/sunset-beach.jpg", "medium": "https://example.com/sunset-beach-300.jpg" },
      "metadata": { "width": 1200, "height": 800, "file": "sunset-beach.jpg" }
    }
  }
}"#;

#[test]
fn test_optimize_whole_site() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_site_file(dir.path(), SITE);

    let report = run_optimize(&Config::default(), &path, None, false).unwrap();
    assert_eq!(report.posts_optimized, 2);
    assert_eq!(report.posts_changed, 1);
    assert_eq!(report.posts_overridden, 1);
    assert_eq!(report.images_processed, 1);
    assert!(report.saved);

    let site = read_site_file(&path);
    let cats = site.posts.iter().find(|p| p.id == 1).unwrap();
    assert_eq!(
        cats.content,
        "<h1>Cats</h1><h2>Dogs</h2><p>Cats are great. <img alt=\"\" src=\"c.jpg\"></p>"
    );
    let manual = site.posts.iter().find(|p| p.id == 2).unwrap();
    assert_eq!(manual.content, "<h1>A</h1><h1>B</h1>");

    let meta = &site.meta[&1];
    assert_eq!(meta[META_FOCUS_KEYWORD], "Cats");
    assert_eq!(meta[META_DESCRIPTION], "Cats Dogs Cats are great.");
    let schema: serde_json::Value = serde_json::from_str(&meta[META_SCHEMA_MARKUP]).unwrap();
    assert_eq!(schema["author"]["name"], "Jane Doe");
    assert_eq!(schema["datePublished"], "2024-01-02T03:04:05+00:00");

    assert_eq!(site.meta[&7][META_ATTACHMENT_ALT], "Image: sunset-beach");
    let attachment = site.posts.iter().find(|p| p.id == 7).unwrap();
    assert!(attachment.content.starts_with("<picture>"));
    assert!(attachment.content.contains("(max-width: 480px)"));
    assert!(!attachment.content.contains("(max-width: 768px)"));
}

#[test]
fn test_dry_run_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_site_file(dir.path(), SITE);

    let report = run_optimize(&Config::default(), &path, Some(1), true).unwrap();
    assert_eq!(report.posts_optimized, 1);
    assert!(!report.saved);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), SITE);
}

#[test]
fn test_unknown_post_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_site_file(dir.path(), SITE);
    let err = run_optimize(&Config::default(), &path, Some(99), true).unwrap_err();
    assert!(format!("{:#}", err).contains("Post 99 not found"));
}

#[test]
fn test_malformed_site_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_site_file(dir.path(), "{ not json");
    let err = load_site(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load site file"));
}
