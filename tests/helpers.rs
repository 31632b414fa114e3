// Shared test helpers for building sites and site files.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};

use seo_optimizer::host::{InMemoryHost, SiteData};
use seo_optimizer::models::{Post, PostStatus};

/// A published post.
#[allow(dead_code)] // Used by other test files
pub fn post(id: u64, title: &str, content: &str) -> Post {
    Post::new(id, title, content)
}

/// A draft post (ignored by the bulk tools).
#[allow(dead_code)] // Used by other test files
pub fn draft(id: u64, title: &str, content: &str) -> Post {
    let mut post = Post::new(id, title, content);
    post.status = PostStatus::Draft;
    post
}

/// Host holding the given posts.
#[allow(dead_code)] // Used by other test files
pub fn host_with(posts: Vec<Post>) -> InMemoryHost {
    let mut host = InMemoryHost::default();
    for post in posts {
        host.insert_post(post);
    }
    host
}

/// Writes `json` as `site.json` in `dir` and returns its path.
#[allow(dead_code)] // Used by other test files
pub fn write_site_file(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("site.json");
    std::fs::write(&path, json).expect("Failed to write site file");
    path
}

/// Reads a site file back.
#[allow(dead_code)] // Used by other test files
pub fn read_site_file(path: &Path) -> SiteData {
    let content = std::fs::read_to_string(path).expect("Failed to read site file");
    serde_json::from_str(&content).expect("Site file should be valid JSON")
}
