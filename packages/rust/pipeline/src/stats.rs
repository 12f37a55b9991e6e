//! Thumbnail coverage statistics over a content store.

use thumbfill_shared::{ContentStoreData, ImageStats};

/// Count thumbnail coverage. A thumbnail is "local" when it starts with
/// `local_prefix` (the configured image-directory prefix); everything else
/// with a value is external.
pub fn compute_image_stats(data: &ContentStoreData, local_prefix: &str) -> ImageStats {
    let mut stats = ImageStats {
        total: data.len(),
        ..ImageStats::default()
    };

    for article in data.articles() {
        match article.thumbnail.as_deref() {
            Some(thumbnail) if !thumbnail.is_empty() => {
                stats.with_images += 1;
                if thumbnail.starts_with(local_prefix) {
                    stats.with_local_images += 1;
                }
            }
            _ => stats.with_null_images += 1,
        }
    }

    stats.with_external_images = stats.with_images - stats.with_local_images;
    stats
}
