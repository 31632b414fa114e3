//! Host-owned records consumed by the optimizers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Identifier of a post (attachments are posts too).
pub type PostId = u64;

/// Identifier of a post author.
pub type AuthorId = u64;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Publicly visible
    Publish,
    /// Not yet published
    #[default]
    Draft,
    /// Awaiting review
    Pending,
    /// Visible to editors only
    Private,
    /// Status of attachments
    Inherit,
    /// Deleted
    Trash,
}

/// Kind of content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    /// Blog post
    #[default]
    Post,
    /// Static page
    Page,
    /// Uploaded media
    Attachment,
}

/// A content item as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Host identifier
    pub id: PostId,
    /// What to fix
    #[serde(default)]
    pub title: String,
    /// Resolved to a display name through the host
    #[serde(default)]
    pub author: Option<AuthorId>,
    /// Publish date; serialized as RFC 3339
    #[serde(default)]
    pub date: Option<DateTime<FixedOffset>>,
    /// Raw content body (markup)
    #[serde(default)]
    pub content: String,
    /// Publication status
    #[serde(default)]
    pub status: PostStatus,
    /// Kind of content item
    #[serde(default)]
    pub post_type: PostType,
    /// MIME type, only meaningful for attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Post {
    /// Creates a published post with the given content.
    pub fn new(id: PostId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            date: None,
            content: content.into(),
            status: PostStatus::Publish,
            post_type: PostType::Post,
            mime_type: None,
        }
    }

    /// True for attachments whose MIME type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.post_type == PostType::Attachment
            && self
                .mime_type
                .as_deref()
                .is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// Metadata generated for an uploaded attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Pixels
    #[serde(default)]
    pub width: u32,
    /// Pixels
    #[serde(default)]
    pub height: u32,
    /// Path of the file relative to the uploads directory
    #[serde(default)]
    pub file: String,
    /// Bytes on disk after recompression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
}

/// Registered image sizes an attachment URL can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// Smallest registered size
    Thumbnail,
    /// Used for narrow screens
    Medium,
    /// Used for tablet-sized screens
    Large,
    /// Original upload
    Full,
}

impl ImageSize {
    /// Name of the size as used in host data.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "thumbnail",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Full => "full",
        }
    }
}
