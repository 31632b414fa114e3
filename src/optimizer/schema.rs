//! JSON-LD article markup.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::config::META_SCHEMA_MARKUP;
use crate::error_handling::PipelineError;
use crate::host::{MetaStore, PostRepository};
use crate::models::Post;

const SCHEMA_CONTEXT: &str = "https://schema.org";
const SCHEMA_ARTICLE: &str = "Article";
const SCHEMA_PERSON: &str = "Person";

/// Fixed-shape schema.org `Article` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Always `https://schema.org`
    #[serde(rename = "@context")]
    pub context: String,
    /// Always `Article`
    #[serde(rename = "@type")]
    pub schema_type: String,
    /// Post title
    pub headline: String,
    /// RFC 3339, empty when the post has no date
    #[serde(rename = "datePublished")]
    pub date_published: String,
    /// Author display name, empty when unknown
    pub author: SchemaAuthor,
}

/// Author of a [`SchemaRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAuthor {
    /// Always `Person`
    #[serde(rename = "@type")]
    pub author_type: String,
    /// Empty when the author is missing or unknown
    pub name: String,
}

impl SchemaRecord {
    /// Builds the record for a post; no check that the author exists.
    pub fn article(post: &Post, author_name: Option<String>) -> Self {
        Self {
            context: SCHEMA_CONTEXT.to_string(),
            schema_type: SCHEMA_ARTICLE.to_string(),
            headline: post.title.clone(),
            date_published: post
                .date
                .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, false))
                .unwrap_or_default(),
            author: SchemaAuthor {
                author_type: SCHEMA_PERSON.to_string(),
                name: author_name.unwrap_or_default(),
            },
        }
    }

    /// Compact JSON with the fields in declaration order.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds the schema record for `post` and stores it under `_schema_markup`.
pub fn inject_schema_markup<H>(host: &mut H, post: &Post) -> Result<SchemaRecord, PipelineError>
where
    H: PostRepository + MetaStore + ?Sized,
{
    let author_name = match post.author {
        Some(author) => host.author_display_name(author)?,
        None => None,
    };
    let record = SchemaRecord::article(post, author_name);
    host.set_meta(post.id, META_SCHEMA_MARKUP, &record.to_json()?)?;
    log::debug!("Stored schema markup for post {}", post.id);
    Ok(record)
}
