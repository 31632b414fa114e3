//! seo_optimizer library: content SEO heuristics for posts owned by a host CMS
//!
//! The host (posts, metadata, media, image editor) is abstracted behind the
//! traits in [`host`]. [`SeoPlugin`] wires the components together and exposes
//! the host hooks: saving a post runs the content pipeline (version backup,
//! override check, meta generation, structure normalization, schema markup,
//! audit line) and uploading an image runs the image pipeline.
//!
//! # Example
//!
//! ```no_run
//! use seo_optimizer::host::{InMemoryHost, MetaStore};
//! use seo_optimizer::models::Post;
//! use seo_optimizer::security::UserContext;
//! use seo_optimizer::{Config, SeoPlugin};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut host = InMemoryHost::default();
//! host.insert_post(Post::new(1, "Cats", "<h1>Cats</h1><h1>More</h1><p>The cat sat.</p>"));
//!
//! let mut plugin = SeoPlugin::new(&Config::default())?;
//! plugin.save_post(&mut host, 1, false, &UserContext::administrator(1))?;
//!
//! println!("{:?}", host.get_meta(1, "_meta_description")?);
//! # Ok(())
//! # }
//! ```
//!
//! Binaries work on a JSON site file instead; see [`run_optimize`].

#![warn(missing_docs)]

pub mod analysis;
pub mod audit;
pub mod bulk;
pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod error_handling;
pub mod host;
pub mod initialization;
pub mod markup;
pub mod media;
pub mod models;
pub mod optimizer;
mod plugin;
mod run;
pub mod security;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use plugin::SeoPlugin;
pub use run::{load_site, run_optimize, save_site, OptimizeReport, CLI_USER_ID};
