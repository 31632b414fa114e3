//! Host CMS boundary.
//!
//! Posts, metadata and media are owned by the host. The optimizers only see these
//! traits; [`InMemoryHost`] implements them over a JSON site file.

mod memory;

use std::path::{Path, PathBuf};

use crate::error_handling::HostError;
use crate::models::{AuthorId, ImageSize, Post, PostId, PostType};

pub use memory::{InMemoryHost, MediaFile, SiteData};

/// Read and update access to posts.
pub trait PostRepository {
    /// Fetches a post, failing with [`HostError::PostNotFound`] when absent.
    fn get_post(&self, id: PostId) -> Result<Post, HostError>;

    /// All published posts of one type, in host order.
    fn published_posts(&self, post_type: PostType) -> Result<Vec<Post>, HostError>;

    /// Replaces the content body of a post.
    fn update_content(&mut self, id: PostId, content: &str) -> Result<(), HostError>;

    /// Display name of an author, `None` when the author is unknown.
    fn author_display_name(&self, author: AuthorId) -> Result<Option<String>, HostError>;
}

/// Per-post string key/value metadata.
pub trait MetaStore {
    /// Value stored under `key`, `None` when absent.
    fn get_meta(&self, id: PostId, key: &str) -> Result<Option<String>, HostError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_meta(&mut self, id: PostId, key: &str, value: &str) -> Result<(), HostError>;

    /// Removes a key, returning whether it was present.
    fn delete_meta(&mut self, id: PostId, key: &str) -> Result<bool, HostError>;

    /// True when the key is present, even with an empty value.
    fn meta_exists(&self, id: PostId, key: &str) -> Result<bool, HostError> {
        Ok(self.get_meta(id, key)?.is_some())
    }
}

/// Attachment files and the host's image editor.
pub trait MediaLibrary {
    /// Absolute path of the file behind an attachment.
    fn attached_file(&self, id: PostId) -> Result<Option<PathBuf>, HostError>;

    /// Public URL of an attachment at a registered size.
    fn attachment_url(&self, id: PostId, size: ImageSize) -> Result<Option<String>, HostError>;

    /// Opens the file in the host's bundled image editor.
    fn image_editor(&self, path: &Path) -> Result<Box<dyn ImageEditor>, HostError>;
}

/// An image opened by the host's editor.
pub trait ImageEditor {
    /// Sets the output quality (0-100) used by `save`.
    fn set_quality(&mut self, quality: u8);

    /// Writes the edited image to `path`.
    fn save(&mut self, path: &Path) -> Result<(), HostError>;
}

/// Everything a registered event handler may touch.
pub trait Host: PostRepository + MetaStore + MediaLibrary {}

impl<T: PostRepository + MetaStore + MediaLibrary + ?Sized> Host for T {}
