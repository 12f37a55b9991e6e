//! End-to-end thumbnail pipeline: keywords → search → download → store.
//!
//! Per-article failures are contained: a failed search or download becomes a
//! fallback thumbnail and the batch continues. Only a content-store read
//! failure aborts a run.

use std::time::{Duration, Instant};

use tracing::{error, info, instrument, warn};

use thumbfill_keywords::extract_keywords;
use thumbfill_shared::{ArticleRecord, ImageStats, PipelineConfig, Result, ThumbfillError};
use thumbfill_store::{ContentStore, find_article};
use thumbfill_unsplash::{UnsplashClient, build_image_url, download_image, generate_image_file_name};

use crate::stats::compute_image_stats;

// ---------------------------------------------------------------------------
// Outcomes and reports
// ---------------------------------------------------------------------------

/// What happened to one article's thumbnail.
///
/// Modeled explicitly instead of catch-and-default so "succeeded", "used
/// fallback", and "already set" stay distinguishable to callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// The article already had a thumbnail; returned unchanged.
    Reused(String),
    /// A fresh image was downloaded to this local relative path.
    Fetched(String),
    /// Search or download failed; the default thumbnail applies.
    Fallback { reason: String },
}

impl ThumbnailOutcome {
    /// Resolve the path to record into the article, substituting
    /// `default_thumbnail` for fallbacks.
    pub fn path(&self, default_thumbnail: &str) -> String {
        match self {
            Self::Reused(path) | Self::Fetched(path) => path.clone(),
            Self::Fallback { .. } => default_thumbnail.to_string(),
        }
    }

    /// Whether this outcome used the fallback thumbnail.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Articles that went through the fetch pipeline.
    pub processed: usize,
    /// Articles skipped because a thumbnail was already set.
    pub skipped: usize,
    /// Of the processed articles, how many ended on the fallback path.
    pub fallbacks: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before an article is processed.
    fn article_started(&self, title: &str, current: usize, total: usize);
    /// Called when the batch completes.
    fn done(&self, report: &BatchReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn article_started(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &BatchReport) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The image-backfill pipeline. Construct once per run with a resolved
/// [`PipelineConfig`].
pub struct Pipeline {
    config: PipelineConfig,
    store: ContentStore,
    client: UnsplashClient,
}

impl Pipeline {
    /// Build the pipeline: create the image directory (idempotent) and the
    /// HTTP client. Does not touch the content store yet.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.image_directory)
            .map_err(|e| ThumbfillError::io(&config.image_directory, e))?;

        let client = UnsplashClient::new(&config)?;
        let store = ContentStore::new(&config.content_store_path);

        Ok(Self {
            config,
            store,
            client,
        })
    }

    /// The resolved configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one article's thumbnail, batch semantics: an existing
    /// non-empty thumbnail is returned unchanged. Never returns an error —
    /// failures become [`ThumbnailOutcome::Fallback`].
    pub async fn process_article_image(&self, article: &ArticleRecord) -> ThumbnailOutcome {
        if let Some(existing) = article.thumbnail.as_deref() {
            if !existing.is_empty() {
                info!(title = %article.title, "thumbnail already set, skipping");
                return ThumbnailOutcome::Reused(existing.to_string());
            }
        }
        self.refresh_article_image(article).await
    }

    /// Run the fetch pipeline for an article regardless of any existing
    /// thumbnail (the `process-article` command path).
    pub async fn refresh_article_image(&self, article: &ArticleRecord) -> ThumbnailOutcome {
        match self.fetch_thumbnail(article).await {
            Ok(path) => {
                info!(title = %article.title, path = %path, "thumbnail set");
                ThumbnailOutcome::Fetched(path)
            }
            Err(e) => {
                warn!(title = %article.title, error = %e, "thumbnail fetch failed, using fallback");
                ThumbnailOutcome::Fallback {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Keywords → search → sized URL → download → local relative path.
    #[instrument(skip_all, fields(url = %article.url))]
    async fn fetch_thumbnail(&self, article: &ArticleRecord) -> Result<String> {
        let keywords = extract_keywords(article, &self.config.keyword_mapping);
        info!(keywords = ?keywords, "extracted search keywords");

        let candidate = self.client.search_image(&keywords).await?;

        let image_url = build_image_url(
            &candidate.url_template,
            self.config.image_width,
            self.config.image_height,
            self.config.image_quality,
        )?;

        let file_name = generate_image_file_name(article);
        let dest = self.config.image_directory.join(&file_name);
        download_image(self.client.http(), &image_url, &dest).await?;

        Ok(format!("{}{file_name}", self.config.thumbnail_prefix))
    }

    /// Batch operation: load the store once, backfill every article missing
    /// a thumbnail (SEO collection first, then blog), persist once.
    #[instrument(skip_all)]
    pub async fn process_all_articles(
        &self,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        let start = Instant::now();

        progress.phase("Loading content store");
        let mut data = self.store.load()?;
        let total = data.len();

        info!(total, "starting batch thumbnail backfill");
        progress.phase("Backfilling thumbnails");

        let mut processed = 0usize;
        let mut skipped = 0usize;
        let mut fallbacks = 0usize;
        let mut current = 0usize;

        for collection in [&mut data.seo_articles, &mut data.blog_articles] {
            for article in collection.iter_mut() {
                current += 1;
                progress.article_started(&article.title, current, total);

                if article.has_thumbnail() {
                    skipped += 1;
                    continue;
                }

                let outcome = self.refresh_article_image(article).await;
                if outcome.is_fallback() {
                    fallbacks += 1;
                }
                article.thumbnail = Some(outcome.path(&self.config.default_thumbnail));
                processed += 1;
            }
        }

        progress.phase("Saving content store");
        // Write failures are logged, not retried; this run's in-memory
        // changes are lost in that case.
        if let Err(e) = self.store.save(&data) {
            error!(error = %e, "content store save failed");
        }

        let report = BatchReport {
            processed,
            skipped,
            fallbacks,
            elapsed: start.elapsed(),
        };
        progress.done(&report);

        info!(
            processed = report.processed,
            skipped = report.skipped,
            fallbacks = report.fallbacks,
            elapsed_ms = report.elapsed.as_millis(),
            "batch backfill complete"
        );

        Ok(report)
    }

    /// Process exactly one article by URL, reprocessing even if a thumbnail
    /// is already set. An unknown URL is an error and writes nothing.
    #[instrument(skip(self))]
    pub async fn process_specific_article(&self, url: &str) -> Result<String> {
        let mut data = self.store.load()?;

        let article = find_article(&data, url)
            .cloned()
            .ok_or_else(|| ThumbfillError::ArticleNotFound { url: url.into() })?;

        let outcome = self.refresh_article_image(&article).await;
        let path = outcome.path(&self.config.default_thumbnail);

        // Lookup cannot fail here; the article was just found.
        if let Some(target) = thumbfill_store::find_article_mut(&mut data, url) {
            target.thumbnail = Some(path.clone());
        }

        if let Err(e) = self.store.save(&data) {
            error!(error = %e, "content store save failed");
        }

        Ok(path)
    }

    /// Read-only thumbnail coverage counts. No persistence.
    pub fn image_stats(&self) -> Result<ImageStats> {
        let data = self.store.load()?;
        Ok(compute_image_stats(&data, &self.config.thumbnail_prefix))
    }
}
