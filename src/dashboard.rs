//! SEO scores, prioritized fixes and JSON reports.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::bulk::{AuditResults, BulkTools};
use crate::config::{META_DESCRIPTION, META_FOCUS_KEYWORD, META_SCHEMA_MARKUP};
use crate::host::{MetaStore, PostRepository};
use crate::markup::ContentFindings;
use crate::models::PostType;

/// Percentages (0-100) per area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeoScore {
    /// Rounded mean of the three areas
    pub overall: u8,
    /// Posts with a focus keyword and meta description
    pub content: u8,
    /// Posts with schema markup and at most one `<h1>`
    pub technical: u8,
    /// Images in post content that carry `alt`
    pub performance: u8,
}

/// Urgency of a [`FixItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Fix first
    High,
    /// Fix soon
    Medium,
    /// Nice to have
    Low,
}

impl Priority {
    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// One recommended fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixItem {
    /// What to fix
    pub title: String,
    /// How urgent the fix is
    pub priority: Priority,
}

/// Counts over the published posts of a site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    /// Published posts
    pub posts: usize,
    /// Posts with a non-empty `_focus_keyword`
    pub with_focus_keyword: usize,
    /// Posts with a non-empty `_meta_description`
    pub with_meta_description: usize,
    /// Both of the above
    pub content_complete: usize,
    /// Posts with `_schema_markup`
    pub with_schema: usize,
    /// Posts with more than one `<h1>`
    pub with_multiple_h1: usize,
    /// Schema present and at most one `<h1>`
    pub technical_complete: usize,
    /// `<img>` tags in post content
    pub images: usize,
    /// Images carrying `alt`
    pub images_with_alt: usize,
}

impl SiteSummary {
    /// Counts over the published posts of `host`.
    pub fn collect<H>(host: &H) -> Result<Self>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        let posts = host
            .published_posts(PostType::Post)
            .context("Failed to list published posts")?;
        let mut summary = SiteSummary {
            posts: posts.len(),
            ..Default::default()
        };

        for post in &posts {
            let present = |key: &str| -> Result<bool> {
                Ok(host.get_meta(post.id, key)?.is_some_and(|v| !v.is_empty()))
            };
            let keyword = present(META_FOCUS_KEYWORD)?;
            let description = present(META_DESCRIPTION)?;
            let schema = present(META_SCHEMA_MARKUP)?;
            let findings = ContentFindings::from_content(&post.content);

            summary.with_focus_keyword += usize::from(keyword);
            summary.with_meta_description += usize::from(description);
            summary.content_complete += usize::from(keyword && description);
            summary.with_schema += usize::from(schema);
            summary.with_multiple_h1 += usize::from(findings.has_multiple_h1());
            summary.technical_complete += usize::from(schema && !findings.has_multiple_h1());
            summary.images += findings.images;
            summary.images_with_alt += findings.images - findings.images_missing_alt;
        }
        Ok(summary)
    }

    /// Scores from the counts; an empty site scores 100 everywhere.
    pub fn score(&self) -> SeoScore {
        let content = percentage(self.content_complete, self.posts);
        let technical = percentage(self.technical_complete, self.posts);
        let performance = percentage(self.images_with_alt, self.images);
        let mean = (f64::from(content) + f64::from(technical) + f64::from(performance)) / 3.0;
        SeoScore {
            overall: mean.round() as u8,
            content,
            technical,
            performance,
        }
    }

    /// Fixes for the issue categories present, highest priority first.
    pub fn fix_matrix(&self) -> Vec<FixItem> {
        let mut fixes = Vec::new();
        let mut add = |present: bool, title: &str, priority: Priority| {
            if present {
                fixes.push(FixItem {
                    title: title.to_string(),
                    priority,
                });
            }
        };
        add(
            self.images_with_alt < self.images,
            "Add missing alt attributes to images",
            Priority::High,
        );
        add(
            self.with_multiple_h1 > 0,
            "Use a single H1 heading per post",
            Priority::High,
        );
        add(
            self.with_focus_keyword < self.posts,
            "Set focus keywords",
            Priority::Medium,
        );
        add(
            self.with_schema < self.posts,
            "Add structured data markup",
            Priority::Medium,
        );
        add(
            self.with_meta_description < self.posts,
            "Update meta descriptions",
            Priority::Low,
        );
        // Stable: keeps the order above within a priority
        fixes.sort_by_key(|fix| fix.priority);
        fixes
    }
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (part as f64 * 100.0 / total as f64).round() as u8
}

/// Report written by [`PerformanceDashboard::generate_seo_report`].
#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    /// RFC 3339 time of generation
    pub generated_at: String,
    /// Scores at generation time
    pub score: SeoScore,
    /// Counts behind the scores
    pub summary: SiteSummary,
    /// Highest priority first
    pub fixes: Vec<FixItem>,
    /// Full bulk audit
    pub audit: AuditResults,
}

/// Dashboard computations over a host.
#[derive(Debug, Clone)]
pub struct PerformanceDashboard {
    bulk: BulkTools,
    reports_dir: PathBuf,
}

impl PerformanceDashboard {
    /// Creates an empty instance.
    pub fn new(bulk: BulkTools, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            bulk,
            reports_dir: reports_dir.into(),
        }
    }

    /// Where reports are written.
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Scores for the published posts of `host`.
    pub fn calculate_seo_score<H>(&self, host: &H) -> Result<SeoScore>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        Ok(SiteSummary::collect(host)?.score())
    }

    /// Fixes for the issues present on `host`.
    pub fn generate_fix_matrix<H>(&self, host: &H) -> Result<Vec<FixItem>>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        Ok(SiteSummary::collect(host)?.fix_matrix())
    }

    /// Writes `seo-report-YYYYMMDD.json` (today, UTC) and returns its path.
    pub fn generate_seo_report<H>(&self, host: &H) -> Result<PathBuf>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        self.generate_seo_report_on(host, Utc::now().date_naive())
    }

    /// Same as [`generate_seo_report`](Self::generate_seo_report) for a given date.
    pub fn generate_seo_report_on<H>(&self, host: &H, date: NaiveDate) -> Result<PathBuf>
    where
        H: PostRepository + MetaStore + ?Sized,
    {
        let summary = SiteSummary::collect(host)?;
        let report = SeoReport {
            generated_at: Utc::now().to_rfc3339(),
            score: summary.score(),
            fixes: summary.fix_matrix(),
            audit: self.bulk.run_seo_audit(host)?,
            summary,
        };

        fs::create_dir_all(&self.reports_dir).with_context(|| {
            format!(
                "Failed to create reports directory {}",
                self.reports_dir.display()
            )
        })?;
        let path = self
            .reports_dir
            .join(format!("seo-report-{}.json", date.format("%Y%m%d")));
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;

        log::info!("SEO report written to {}", path.display());
        Ok(path)
    }
}
