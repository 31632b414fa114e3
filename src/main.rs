//! `seo_optimizer` command-line binary.
//!
//! Loads `.env`, parses arguments, sets up logging and prints results. Every
//! command is a thin call into the library.

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use seo_optimizer::analysis::{extract_keywords, TextStats};
use seo_optimizer::config::{Cli, Command, SiteArgs, TOP_KEYWORDS};
use seo_optimizer::host::InMemoryHost;
use seo_optimizer::initialization::init_logger_with;
use seo_optimizer::markup::strip_tags;
use seo_optimizer::{load_site, run_optimize, save_site, Config, SeoPlugin};

fn main() {
    // .env next to the working directory, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    if let Err(e) = init_logger_with(cli.log_level.into(), cli.log_format) {
        eprintln!("seo_optimizer error: Failed to initialize logger: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("seo_optimizer error: {:#}", e);
        process::exit(1);
    }
}

/// `--site-url` wins over the `site_url` stored in the site file.
fn config_for(cli: &Cli, site: Option<&SiteArgs>, host: Option<&InMemoryHost>) -> Config {
    Config {
        site_url: site
            .and_then(|s| s.site_url.clone())
            .or_else(|| host.and_then(|h| h.data().site_url.clone())),
        log_level: cli.log_level,
        log_format: cli.log_format,
        ..Default::default()
    }
    .with_env()
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Optimize {
            site,
            post,
            audit_log,
            dry_run,
        } => {
            let config = Config {
                audit_log: audit_log.clone(),
                ..config_for(&cli, Some(site), None)
            };
            let report = run_optimize(&config, &site.site, *post, *dry_run)?;
            println!(
                "{} Optimized {} post{} ({} changed, {} overridden) and {} image{} in {:.1}s",
                "✔".green(),
                report.posts_optimized,
                if report.posts_optimized == 1 { "" } else { "s" },
                report.posts_changed,
                report.posts_overridden,
                report.images_processed,
                if report.images_processed == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            if report.saved {
                println!("Site saved to {}", site.site.display());
            } else {
                println!("{}", "Dry run: site file not modified".yellow());
            }
        }
        Command::Audit { site } => {
            let host = load_site(&site.site)?;
            let plugin = SeoPlugin::new(&config_for(&cli, Some(site), Some(&host)))?;
            let results = plugin.bulk_tools().run_seo_audit(&host)?;
            println!(
                "{} posts: {} optimized, {} need attention",
                results.total_posts,
                results.optimized.to_string().green(),
                results.needs_attention.to_string().yellow()
            );
            for issue in &results.issues {
                println!(
                    "  #{} {}: {}",
                    issue.post_id,
                    issue.title.bold(),
                    issue.issue.red()
                );
            }
        }
        Command::UpdateMeta { site } => {
            let mut host = load_site(&site.site)?;
            let plugin = SeoPlugin::new(&config_for(&cli, Some(site), Some(&host)))?;
            let results = plugin.bulk_tools().update_meta_descriptions(&mut host)?;
            save_site(&host, &site.site)?;
            println!(
                "Updated {} of {} meta descriptions",
                results.updated.to_string().green(),
                results.total_posts
            );
        }
        Command::FixLinks { site } => {
            let mut host = load_site(&site.site)?;
            let plugin = SeoPlugin::new(&config_for(&cli, Some(site), Some(&host)))?;
            let results = plugin.bulk_tools().fix_internal_links(&mut host)?;
            save_site(&host, &site.site)?;
            println!(
                "Fixed internal links in {} of {} posts",
                results.fixed.to_string().green(),
                results.total_posts
            );
        }
        Command::Dashboard { site } => {
            let host = load_site(&site.site)?;
            let plugin = SeoPlugin::new(&config_for(&cli, Some(site), Some(&host)))?;
            let score = plugin.dashboard().calculate_seo_score(&host)?;
            println!("Overall SEO score: {}%", score.overall.to_string().bold());
            println!(
                "  content {}%  technical {}%  performance {}%",
                score.content, score.technical, score.performance
            );
            let fixes = plugin.dashboard().generate_fix_matrix(&host)?;
            if !fixes.is_empty() {
                println!("Priority fixes:");
            }
            for fix in fixes {
                println!("  [ ] {} ({} priority)", fix.title, fix.priority.as_str());
            }
        }
        Command::Report { site, reports_dir } => {
            let host = load_site(&site.site)?;
            let config = Config {
                reports_dir: reports_dir.clone(),
                ..config_for(&cli, Some(site), Some(&host))
            };
            let plugin = SeoPlugin::new(&config)?;
            let path = plugin.dashboard().generate_seo_report(&host)?;
            println!("Report written to {}", path.display());
        }
        Command::Readability { file } => print_readability(file)?,
        Command::Encrypt { value } => {
            let plugin = SeoPlugin::new(&config_for(&cli, None, None))?;
            println!("{}", plugin.encrypt_data(value)?);
        }
        Command::Decrypt { value } => {
            let plugin = SeoPlugin::new(&config_for(&cli, None, None))?;
            println!("{}", plugin.decrypt_data(value)?);
        }
    }
    Ok(())
}

fn print_readability(file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let stats = TextStats::from_text(&strip_tags(&content));
    println!(
        "{} words, {} sentences, {} syllables",
        stats.words, stats.sentences, stats.syllables
    );
    match stats.reading_ease() {
        Some(score) => println!("Flesch reading ease: {:.1}", score),
        None => println!("{}", "Flesch reading ease: not scorable".yellow()),
    }
    let keywords: Vec<String> = extract_keywords(&content, TOP_KEYWORDS)
        .into_iter()
        .map(|k| format!("{} ({})", k.term, k.count))
        .collect();
    println!("Keywords: {}", keywords.join(", "));
    Ok(())
}
