//! Site-wide maintenance tools.
//!
//! Each tool walks every published post of type `post` and returns a
//! serializable summary, so results can be printed by the CLI or returned from
//! an admin action as JSON.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde::Serialize;
use url::Url;

use crate::analysis::meta_description;
use crate::config::{META_DESCRIPTION, META_FOCUS_KEYWORD, META_SEO_OVERRIDE};
use crate::host::{MetaStore, PostRepository};
use crate::markup::ContentFindings;
use crate::models::{PostId, PostType};
use crate::utils::compile_regex_unsafe;

/// Issue for posts without a non-empty `_focus_keyword`.
pub const ISSUE_MISSING_FOCUS_KEYWORD: &str = "Missing focus keyword";
/// Issue for posts with more than one `<h1>`.
pub const ISSUE_MULTIPLE_H1: &str = "Multiple H1 headings";
/// Issue for posts with `<img>` tags lacking `alt`.
pub const ISSUE_IMAGES_MISSING_ALT: &str = "Images missing alt text";

/// `href="<url>.html"`, capturing the prefix, the URL without `.html` and the
/// closing quote.
static HTML_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r#"(?i)(href\s*=\s*")([^"]+?)\.html(")"#, "HTML_LINK_RE")
});

/// One problem found on one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    /// Post the entry is about
    pub post_id: PostId,
    /// Post title at audit time
    pub title: String,
    /// One of the `ISSUE_*` texts
    pub issue: String,
}

/// Result of [`BulkTools::run_seo_audit`].
///
/// `optimized + needs_attention == total_posts`; a post with several issues is
/// counted once but listed once per issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditResults {
    /// Published posts examined
    pub total_posts: usize,
    /// Posts without issues
    pub optimized: usize,
    /// Posts with at least one issue
    pub needs_attention: usize,
    /// One entry per post and issue
    pub issues: Vec<AuditIssue>,
}

/// Result of [`BulkTools::update_meta_descriptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaUpdateResults {
    /// Published posts examined
    pub total_posts: usize,
    /// Descriptions rewritten
    pub updated: usize,
}

/// Result of [`BulkTools::fix_internal_links`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkFixResults {
    /// Published posts examined
    pub total_posts: usize,
    /// Posts whose content changed
    pub fixed: usize,
}

/// Bulk audit and repair over published posts.
#[derive(Debug, Clone, Default)]
pub struct BulkTools {
    site_url: Option<Url>,
}

impl BulkTools {
    /// `site_url` decides which absolute links count as internal.
    pub fn new(site_url: Option<Url>) -> Self {
        Self { site_url }
    }

    /// Parses the site URL, failing on malformed input.
    pub fn for_site(site_url: Option<&str>) -> Result<Self> {
        let site_url = site_url
            .map(|raw| Url::parse(raw).with_context(|| format!("Invalid site URL: {}", raw)))
            .transpose()?;
        Ok(Self::new(site_url))
    }

    /// Lists posts missing a focus keyword, with several `<h1>`, or with images
    /// lacking `alt`.
    pub fn run_seo_audit<H>(&self, host: &H) -> Result<AuditResults>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        let posts = host
            .published_posts(PostType::Post)
            .context("Failed to list published posts")?;
        let mut results = AuditResults::default();

        for post in &posts {
            results.total_posts += 1;
            let mut issues = Vec::new();

            let has_keyword = host
                .get_meta(post.id, META_FOCUS_KEYWORD)?
                .is_some_and(|keyword| !keyword.is_empty());
            if !has_keyword {
                issues.push(ISSUE_MISSING_FOCUS_KEYWORD);
            }
            let findings = ContentFindings::from_content(&post.content);
            if findings.has_multiple_h1() {
                issues.push(ISSUE_MULTIPLE_H1);
            }
            if findings.images_missing_alt > 0 {
                issues.push(ISSUE_IMAGES_MISSING_ALT);
            }

            if issues.is_empty() {
                results.optimized += 1;
                continue;
            }
            results.needs_attention += 1;
            results
                .issues
                .extend(issues.into_iter().map(|issue| AuditIssue {
                    post_id: post.id,
                    title: post.title.clone(),
                    issue: issue.to_string(),
                }));
        }

        log::info!(
            "SEO audit: {} posts, {} need attention",
            results.total_posts,
            results.needs_attention
        );
        Ok(results)
    }

    /// Regenerates `_meta_description` for every post without a non-empty
    /// `_seo_override`.
    pub fn update_meta_descriptions<H>(&self, host: &mut H) -> Result<MetaUpdateResults>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        let posts = host
            .published_posts(PostType::Post)
            .context("Failed to list published posts")?;
        let mut updated = 0;

        for post in &posts {
            let overridden = host
                .get_meta(post.id, META_SEO_OVERRIDE)?
                .is_some_and(|value| !value.is_empty());
            if overridden {
                log::debug!("Post {} has an SEO override, not updating", post.id);
                continue;
            }
            host.set_meta(post.id, META_DESCRIPTION, &meta_description(&post.content))
                .with_context(|| format!("Failed to update meta description of post {}", post.id))?;
            updated += 1;
        }

        Ok(MetaUpdateResults {
            total_posts: posts.len(),
            updated,
        })
    }

    /// Rewrites internal `.html` links to directory form and saves changed posts.
    pub fn fix_internal_links<H>(&self, host: &mut H) -> Result<LinkFixResults>
    where
        H: PostRepository + ?Sized,
    {
        let posts = host
            .published_posts(PostType::Post)
            .context("Failed to list published posts")?;
        let mut fixed = 0;

        for post in &posts {
            let rewritten = self.rewrite_links(&post.content);
            if rewritten != post.content {
                host.update_content(post.id, &rewritten)
                    .with_context(|| format!("Failed to update post {}", post.id))?;
                fixed += 1;
            }
        }

        Ok(LinkFixResults {
            total_posts: posts.len(),
            fixed,
        })
    }

    /// `href="/page.html"` becomes `href="/page/"` for internal links.
    pub fn rewrite_links(&self, content: &str) -> String {
        HTML_LINK_RE
            .replace_all(content, |caps: &Captures<'_>| {
                let target = format!("{}.html", &caps[2]);
                if self.is_internal(&target) {
                    format!("{}{}/{}", &caps[1], &caps[2], &caps[3])
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// Relative URLs are internal; absolute and protocol-relative (`//host/...`)
    /// ones only on the site's host.
    pub fn is_internal(&self, link: &str) -> bool {
        if link.starts_with("//") {
            return Url::parse(&format!("https:{}", link)).is_ok_and(|url| self.on_site(&url));
        }
        match Url::parse(link) {
            Ok(url) => self.on_site(&url),
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }

    fn on_site(&self, url: &Url) -> bool {
        match &self.site_url {
            Some(site) => url.host_str().is_some() && url.host_str() == site.host_str(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use crate::models::{Post, PostStatus};

    fn tools() -> BulkTools {
        BulkTools::for_site(Some("https://example.com")).unwrap()
    }

    #[test]
    fn test_rewrite_internal_links_only() {
        let content = concat!(
            r#"<a href="/about.html">a</a> "#,
            r#"<a HREF = "https://example.com/team/jane.HTML">b</a> "#,
            r#"<a href="https://other.org/page.html">c</a> "#,
            r#"<a href="/docs/">d</a>"#
        );
        assert_eq!(
            tools().rewrite_links(content),
            concat!(
                r#"<a href="/about/">a</a> "#,
                r#"<a HREF = "https://example.com/team/jane/">b</a> "#,
                r#"<a href="https://other.org/page.html">c</a> "#,
                r#"<a href="/docs/">d</a>"#
            )
        );
    }

    #[test]
    fn test_without_site_url_only_relative_links_are_internal() {
        let tools = BulkTools::default();
        assert!(tools.is_internal("page.html"));
        assert!(!tools.is_internal("https://example.com/page.html"));
    }

    #[test]
    fn test_protocol_relative_links_need_the_site_host() {
        let tools = tools();
        assert!(!tools.is_internal("//other.org/page.html"));
        assert!(tools.is_internal("//example.com/page.html"));
        assert!(!BulkTools::default().is_internal("//example.com/page.html"));

        let content = r#"<a href="//other.org/page.html">x</a><a href="//example.com/a.html">y</a>"#;
        assert_eq!(
            tools.rewrite_links(content),
            r#"<a href="//other.org/page.html">x</a><a href="//example.com/a/">y</a>"#
        );
    }

    #[test]
    fn test_invalid_site_url() {
        assert!(BulkTools::for_site(Some("not a url")).is_err());
    }

    #[test]
    fn test_audit_counts_posts_once() {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "Good", "<h1>One</h1>"));
        host.set_meta(1, META_FOCUS_KEYWORD, "One").unwrap();
        host.insert_post(Post::new(2, "Bad", "<h1>A</h1><h1>B</h1><img src=x>"));
        let mut draft = Post::new(3, "Draft", "");
        draft.status = PostStatus::Draft;
        host.insert_post(draft);

        let results = tools().run_seo_audit(&host).unwrap();
        assert_eq!(results.total_posts, 2);
        assert_eq!(results.optimized, 1);
        assert_eq!(results.needs_attention, 1);
        let issues: Vec<&str> = results.issues.iter().map(|i| i.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec![ISSUE_MISSING_FOCUS_KEYWORD, ISSUE_MULTIPLE_H1, ISSUE_IMAGES_MISSING_ALT]
        );
        assert!(results.issues.iter().all(|i| i.post_id == 2 && i.title == "Bad"));
    }

    #[test]
    fn test_empty_focus_keyword_is_an_issue() {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "Empty", "<p>x</p>"));
        host.set_meta(1, META_FOCUS_KEYWORD, "").unwrap();
        let results = tools().run_seo_audit(&host).unwrap();
        assert_eq!(results.needs_attention, 1);
    }

    #[test]
    fn test_update_meta_skips_non_empty_override() {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "A", "<p>First post body</p>"));
        host.insert_post(Post::new(2, "B", "<p>Second</p>"));
        host.set_meta(2, META_SEO_OVERRIDE, "1").unwrap();
        host.insert_post(Post::new(3, "C", "<p>Third</p>"));
        host.set_meta(3, META_SEO_OVERRIDE, "").unwrap();

        let results = tools().update_meta_descriptions(&mut host).unwrap();
        assert_eq!(results, MetaUpdateResults { total_posts: 3, updated: 2 });
        assert_eq!(
            host.get_meta(1, META_DESCRIPTION).unwrap().as_deref(),
            Some("First post body")
        );
        assert_eq!(host.get_meta(2, META_DESCRIPTION).unwrap(), None);
        assert_eq!(host.get_meta(3, META_DESCRIPTION).unwrap().as_deref(), Some("Third"));
    }

    #[test]
    fn test_fix_internal_links_updates_changed_posts() {
        let mut host = InMemoryHost::default();
        host.insert_post(Post::new(1, "A", r#"<a href="/x.html">x</a>"#));
        host.insert_post(Post::new(2, "B", r#"<a href="/y/">y</a>"#));

        let results = tools().fix_internal_links(&mut host).unwrap();
        assert_eq!(results, LinkFixResults { total_posts: 2, fixed: 1 });
        assert_eq!(host.get_post(1).unwrap().content, r#"<a href="/x/">x</a>"#);
    }
}
