//! Command-line options.
//!
//! Parsed by `clap` from the field attributes. The binary converts these into a
//! [`Config`](super::Config) plus a command to run.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::DEFAULT_REPORTS_DIR;
use crate::config::types::{LogFormat, LogLevel};

/// Command-line options and configuration.
///
/// # Examples
///
/// ```bash
/// # Optimize every post of a site file (as if each had just been saved)
/// seo_optimizer optimize site.json
///
/// # Only one post, writing audit lines to a file
/// seo_optimizer optimize site.json --post 42 --audit-log seo-audit.log
///
/// # Bulk audit with JSON logs
/// seo_optimizer --log-format json audit site.json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "seo_optimizer",
    about = "Applies SEO heuristics to the posts of a site file."
)]
/// Top-level command line.
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command operating on a site file.
#[derive(Debug, Args)]
pub struct SiteArgs {
    /// Site file (JSON) holding posts, metadata, authors and media
    #[arg(value_parser)]
    pub site: PathBuf,

    /// Public site URL (links on this host count as internal)
    #[arg(long)]
    pub site_url: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the save pipeline for one post or all posts and attachments
    Optimize {
        #[command(flatten)]
        site: SiteArgs,

        /// Only this post id
        #[arg(long)]
        post: Option<u64>,

        /// Append audit lines to this file
        #[arg(long)]
        audit_log: Option<PathBuf>,

        /// Do not write the site file back
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Report published posts that need attention
    Audit {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Regenerate meta descriptions for published posts
    UpdateMeta {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Rewrite internal `.html` links to directory-style permalinks
    FixLinks {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Print SEO scores and the priority fix list
    Dashboard {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Write a JSON report into the reports directory
    Report {
        #[command(flatten)]
        site: SiteArgs,

        /// Reports directory
        #[arg(long, value_parser, default_value = DEFAULT_REPORTS_DIR)]
        reports_dir: PathBuf,
    },

    /// Print the readability score and keywords of a content file
    Readability {
        /// File holding post content (markup allowed)
        #[arg(value_parser)]
        file: PathBuf,
    },

    /// Encrypt a value with the configured key
    Encrypt {
        /// Plaintext
        value: String,
    },

    /// Decrypt a value produced by `encrypt`
    Decrypt {
        /// Base64 ciphertext
        value: String,
    },
}
