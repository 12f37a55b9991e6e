//! Content Store persistence layer.
//!
//! The [`ContentStore`] struct wraps the `articles.json` document: load the
//! whole file into memory at run start, write it back in full at run end.
//!
//! **Access rules:**
//! - Single writer, single run — no locking, no incremental persistence.
//! - Reads/writes are UTF-8 JSON with 2-space indentation, matching what the
//!   website renderer consumes.
//! - Writes go through a temp-file + rename so an interrupted save never
//!   leaves a truncated store behind.

use std::path::{Path, PathBuf};

use thumbfill_shared::{ArticleRecord, ContentStoreData, Result, ThumbfillError};

/// Handle on the articles JSON document.
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    /// Create a handle for the store at `path`. Does not touch the file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full document into memory.
    ///
    /// A missing or malformed file is a [`ThumbfillError::StoreRead`], which
    /// is run-fatal by policy.
    pub fn load(&self) -> Result<ContentStoreData> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ThumbfillError::store_read(&self.path, e.to_string()))?;

        let data: ContentStoreData = serde_json::from_str(&content)
            .map_err(|e| ThumbfillError::store_read(&self.path, e.to_string()))?;

        tracing::debug!(
            path = %self.path.display(),
            seo = data.seo_articles.len(),
            blog = data.blog_articles.len(),
            "content store loaded"
        );

        Ok(data)
    }

    /// Persist the full document, overwriting the previous contents.
    ///
    /// Serializes with 2-space indentation and writes atomically: the JSON
    /// goes to a `.tmp` sibling first and is renamed into place.
    pub fn save(&self, data: &ContentStoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| ThumbfillError::store_write(&self.path, e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ThumbfillError::store_write(&self.path, e.to_string()))?;
        }

        let tmp = temp_sibling(&self.path);
        std::fs::write(&tmp, json.as_bytes())
            .map_err(|e| ThumbfillError::store_write(&tmp, e.to_string()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ThumbfillError::store_write(&self.path, e.to_string()))?;

        tracing::debug!(path = %self.path.display(), articles = data.len(), "content store saved");
        Ok(())
    }
}

/// Temp-file path next to `path` (same directory, so the rename stays on one
/// filesystem).
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Article lookup
// ---------------------------------------------------------------------------

/// Find an article by exact URL match. SEO collection first, then blog.
pub fn find_article<'a>(data: &'a ContentStoreData, url: &str) -> Option<&'a ArticleRecord> {
    data.seo_articles
        .iter()
        .find(|a| a.url == url)
        .or_else(|| data.blog_articles.iter().find(|a| a.url == url))
}

/// Mutable variant of [`find_article`], same search order.
pub fn find_article_mut<'a>(
    data: &'a mut ContentStoreData,
    url: &str,
) -> Option<&'a mut ArticleRecord> {
    if data.seo_articles.iter().any(|a| a.url == url) {
        return data.seo_articles.iter_mut().find(|a| a.url == url);
    }
    data.blog_articles.iter_mut().find(|a| a.url == url)
}
