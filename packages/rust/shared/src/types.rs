//! Core domain types for the thumbfill content store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArticleRecord
// ---------------------------------------------------------------------------

/// One blog/SEO post's metadata as stored in `articles.json`.
///
/// `url` is the unique lookup key within and across both collections.
/// Fields this tool does not know about (the website renderer owns the
/// schema) are captured in `extra` so a load→save round trip never drops
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Display title.
    pub title: String,
    /// Canonical article URL — unique identifier.
    pub url: String,
    /// Short description shown on the card.
    #[serde(default)]
    pub description: String,
    /// Publication date as `YYYY-MM-DD` text.
    pub date: String,
    /// Ordered tag labels, used first for image search keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Client name for portfolio pieces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// Thumbnail path: absent/null, an external URL, or a local relative
    /// path under the image directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Unknown fields, preserved verbatim across rewrites.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ArticleRecord {
    /// Whether a usable thumbnail is already set (non-null, non-empty).
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.as_deref().is_some_and(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// ContentStoreData
// ---------------------------------------------------------------------------

/// In-memory form of the `articles.json` document.
///
/// Either collection may be absent in the file and is then treated as empty;
/// absence is preserved on save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentStoreData {
    /// Search-engine–oriented articles. Processed first.
    #[serde(rename = "seoArticles", default, skip_serializing_if = "Vec::is_empty")]
    pub seo_articles: Vec<ArticleRecord>,
    /// Blog articles. Processed second.
    #[serde(rename = "blogArticles", default, skip_serializing_if = "Vec::is_empty")]
    pub blog_articles: Vec<ArticleRecord>,
}

impl ContentStoreData {
    /// All articles in processing order: SEO collection, then blog.
    pub fn articles(&self) -> impl Iterator<Item = &ArticleRecord> {
        self.seo_articles.iter().chain(self.blog_articles.iter())
    }

    /// Total article count across both collections.
    pub fn len(&self) -> usize {
        self.seo_articles.len() + self.blog_articles.len()
    }

    /// Whether both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.seo_articles.is_empty() && self.blog_articles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ImageCandidate
// ---------------------------------------------------------------------------

/// A selected image-search result. Transient — consumed to build a download
/// URL, never persisted.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    /// Service-side photo identifier.
    pub id: String,
    /// Popularity score ("likes") used for ranking.
    pub likes: u64,
    /// Base URL template for retrieving sized variants.
    pub url_template: String,
    /// Alt text, when the service provides one.
    pub alt: Option<String>,
}

// ---------------------------------------------------------------------------
// ImageStats
// ---------------------------------------------------------------------------

/// Thumbnail coverage counts over a content store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    /// Total article count.
    pub total: usize,
    /// Articles with any thumbnail set.
    pub with_images: usize,
    /// Articles whose thumbnail lives under the local image directory.
    pub with_local_images: usize,
    /// `with_images - with_local_images`.
    pub with_external_images: usize,
    /// Articles with no thumbnail.
    pub with_null_images: usize,
}
