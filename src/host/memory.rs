//! In-memory host backed by a JSON site file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ImageEditor, MediaLibrary, MetaStore, PostRepository};
use crate::error_handling::HostError;
use crate::models::{AttachmentMetadata, AuthorId, ImageSize, Post, PostId, PostStatus, PostType};

/// File and URLs behind an attachment post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    /// File path; relative paths resolve against the site file's directory
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// URL per registered size name (`thumbnail`, `medium`, `large`, `full`)
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
    /// Generated metadata (dimensions, file, size)
    #[serde(default)]
    pub metadata: AttachmentMetadata,
}

/// Serialized form of a site.
///
/// ```json
/// {
///   "site_url": "https://example.com",
///   "posts": [{ "id": 1, "title": "Hello", "content": "<h1>Hi</h1>", "status": "publish" }],
///   "meta": { "1": { "_seo_override": "1" } },
///   "authors": { "3": "Jane Doe" },
///   "media": { "7": { "file": "uploads/cat.jpg", "urls": { "full": "https://example.com/cat.jpg" } } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    /// Public URL of the site
    #[serde(default)]
    pub site_url: Option<String>,
    /// Posts and attachments, in host order
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Metadata per post id
    #[serde(default)]
    pub meta: BTreeMap<PostId, BTreeMap<String, String>>,
    /// Display name per author id
    #[serde(default)]
    pub authors: BTreeMap<AuthorId, String>,
    /// Files and URLs per attachment id
    #[serde(default)]
    pub media: BTreeMap<PostId, MediaFile>,
}

/// Host implementation holding a whole site in memory.
///
/// Writes go through `&mut self`; there is no locking and the last write wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    data: SiteData,
    base_dir: Option<PathBuf>,
}

impl InMemoryHost {
    /// Host over already loaded data.
    pub fn new(data: SiteData) -> Self {
        Self {
            data,
            base_dir: None,
        }
    }

    /// Loads a site file; relative media paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let content = fs::read_to_string(path)?;
        let data: SiteData = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded {} posts from {}",
            data.posts.len(),
            path.display()
        );
        Ok(Self {
            data,
            base_dir: path.parent().map(Path::to_path_buf),
        })
    }

    /// Writes the site back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), HostError> {
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Site data as loaded or modified.
    pub fn data(&self) -> &SiteData {
        &self.data
    }

    /// Consumes the host, returning its data.
    pub fn into_data(self) -> SiteData {
        self.data
    }

    /// Inserts or replaces a post.
    pub fn insert_post(&mut self, post: Post) {
        match self.data.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => self.data.posts.push(post),
        }
    }

    /// Registers an author display name.
    pub fn insert_author(&mut self, id: AuthorId, display_name: impl Into<String>) {
        self.data.authors.insert(id, display_name.into());
    }

    /// Registers the file and URLs of an attachment.
    pub fn insert_media(&mut self, id: PostId, media: MediaFile) {
        self.data.media.insert(id, media);
    }

    /// Ids of every post, in host order.
    pub fn post_ids(&self) -> Vec<PostId> {
        self.data.posts.iter().map(|p| p.id).collect()
    }

    /// Stored metadata of an attachment.
    pub fn attachment_metadata(&self, id: PostId) -> Option<&AttachmentMetadata> {
        self.data.media.get(&id).map(|m| &m.metadata)
    }

    /// Replaces the stored metadata of an attachment.
    pub fn set_attachment_metadata(&mut self, id: PostId, metadata: AttachmentMetadata) {
        self.data.media.entry(id).or_default().metadata = metadata;
    }

    fn post_mut(&mut self, id: PostId) -> Result<&mut Post, HostError> {
        self.data
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(HostError::PostNotFound(id))
    }
}

impl PostRepository for InMemoryHost {
    fn get_post(&self, id: PostId) -> Result<Post, HostError> {
        self.data
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(HostError::PostNotFound(id))
    }

    fn published_posts(&self, post_type: PostType) -> Result<Vec<Post>, HostError> {
        Ok(self
            .data
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Publish && p.post_type == post_type)
            .cloned()
            .collect())
    }

    fn update_content(&mut self, id: PostId, content: &str) -> Result<(), HostError> {
        self.post_mut(id)?.content = content.to_string();
        Ok(())
    }

    fn author_display_name(&self, author: AuthorId) -> Result<Option<String>, HostError> {
        Ok(self.data.authors.get(&author).cloned())
    }
}

impl MetaStore for InMemoryHost {
    fn get_meta(&self, id: PostId, key: &str) -> Result<Option<String>, HostError> {
        Ok(self
            .data
            .meta
            .get(&id)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set_meta(&mut self, id: PostId, key: &str, value: &str) -> Result<(), HostError> {
        self.data
            .meta
            .entry(id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_meta(&mut self, id: PostId, key: &str) -> Result<bool, HostError> {
        Ok(self
            .data
            .meta
            .get_mut(&id)
            .is_some_and(|entries| entries.remove(key).is_some()))
    }
}

impl MediaLibrary for InMemoryHost {
    fn attached_file(&self, id: PostId) -> Result<Option<PathBuf>, HostError> {
        let file = self.data.media.get(&id).and_then(|m| m.file.as_ref());
        Ok(file.map(|path| match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.clone(),
        }))
    }

    fn attachment_url(&self, id: PostId, size: ImageSize) -> Result<Option<String>, HostError> {
        Ok(self
            .data
            .media
            .get(&id)
            .and_then(|m| m.urls.get(size.as_str()))
            .cloned())
    }

    fn image_editor(&self, path: &Path) -> Result<Box<dyn ImageEditor>, HostError> {
        // Image codecs stay on the host side
        Err(HostError::EditorUnavailable(path.to_path_buf()))
    }
}
