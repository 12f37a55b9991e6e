//! Image download: sized-crop URL construction, deterministic file naming,
//! and chunked streaming to disk with partial-file cleanup.

use std::path::Path;

use reqwest::Client;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use thumbfill_shared::{ArticleRecord, Result, ThumbfillError};

/// Build the download URL for a photo template, requesting a smart crop at
/// the given dimensions and quality with format normalization.
///
/// Query parameters already on the template (Unsplash's `regular` URL
/// carries tracking params) are preserved.
pub fn build_image_url(template: &str, width: u32, height: u32, quality: u8) -> Result<String> {
    let mut url = Url::parse(template)
        .map_err(|e| ThumbfillError::Download(format!("invalid image URL '{template}': {e}")))?;

    url.query_pairs_mut()
        .append_pair("w", &width.to_string())
        .append_pair("h", &height.to_string())
        .append_pair("fit", "crop")
        .append_pair("crop", "smart")
        .append_pair("auto", "format")
        .append_pair("q", &quality.to_string());

    Ok(url.into())
}

/// Deterministic thumbnail file name for an article:
/// date with separators stripped + first 8 hex chars of a SHA-256 of the
/// article URL + `.jpg`. Stable across runs for the same article, distinct
/// across articles sharing a date.
pub fn generate_image_file_name(article: &ArticleRecord) -> String {
    let date = article.date.replace('-', "");
    let hash = {
        let mut hasher = Sha256::new();
        hasher.update(article.url.as_bytes());
        format!("{:x}", hasher.finalize())
    };
    format!("{date}_{}.jpg", &hash[..8])
}

/// Stream the image at `url` into `dest`.
///
/// On any failure mid-transfer the partially written file is removed before
/// the error propagates — no partial files are left behind.
pub async fn download_image(client: &Client, url: &str, dest: &Path) -> Result<()> {
    match stream_to_file(client, url, dest).await {
        Ok(bytes) => {
            debug!(path = %dest.display(), bytes, "image downloaded");
            Ok(())
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(dest).await;
            Err(e)
        }
    }
}

async fn stream_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ThumbfillError::Download(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ThumbfillError::Download(format!("{url}: HTTP {status}")));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| ThumbfillError::Download(format!("{}: {e}", dest.display())))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ThumbfillError::Download(format!("{url}: transfer failed: {e}")))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| ThumbfillError::Download(format!("{}: {e}", dest.display())))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| ThumbfillError::Download(format!("{}: {e}", dest.display())))?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article(url: &str, date: &str) -> ArticleRecord {
        ArticleRecord {
            title: "T".into(),
            url: url.into(),
            description: String::new(),
            date: date.into(),
            tags: vec![],
            client: None,
            thumbnail: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn file_name_is_deterministic() {
        let a = article("https://example.com/post-1", "2024-01-15");
        let first = generate_image_file_name(&a);
        let second = generate_image_file_name(&a);
        assert_eq!(first, second);
        assert!(first.starts_with("20240115_"));
        assert!(first.ends_with(".jpg"));
        // 8 date digits + '_' + 8 hex chars + ".jpg"
        assert_eq!(first.len(), 8 + 1 + 8 + 4);
    }

    #[test]
    fn file_name_differs_per_url_on_same_date() {
        let a = article("https://example.com/post-1", "2024-01-15");
        let b = article("https://example.com/post-2", "2024-01-15");
        assert_ne!(generate_image_file_name(&a), generate_image_file_name(&b));
    }

    #[test]
    fn build_url_appends_crop_params() {
        let url = build_image_url("https://images.example.com/photo-1", 400, 250, 80).unwrap();
        assert!(url.contains("w=400"));
        assert!(url.contains("h=250"));
        assert!(url.contains("fit=crop"));
        assert!(url.contains("crop=smart"));
        assert!(url.contains("auto=format"));
        assert!(url.contains("q=80"));
    }

    #[test]
    fn build_url_preserves_existing_params() {
        let url =
            build_image_url("https://images.example.com/photo-1?ixid=abc123", 400, 250, 80)
                .unwrap();
        assert!(url.contains("ixid=abc123"));
        assert!(url.contains("w=400"));
    }

    #[test]
    fn build_url_rejects_garbage() {
        let err = build_image_url("not a url", 400, 250, 80).unwrap_err();
        assert!(matches!(err, ThumbfillError::Download(_)));
    }

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("tf-dl-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn download_writes_body_to_dest() {
        let server = MockServer::start().await;
        let body = vec![0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10];

        Mock::given(method("GET"))
            .and(path("/photo.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = temp_dir();
        let dest = dir.join("20240115_abcd1234.jpg");
        let client = Client::new();

        download_image(&client, &format!("{}/photo.jpg", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), body);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failed_download_leaves_no_file() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photo.jpg"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = temp_dir();
        let dest = dir.join("20240115_abcd1234.jpg");
        let client = Client::new();

        let err = download_image(&client, &format!("{}/photo.jpg", server.uri()), &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, ThumbfillError::Download(_)));
        assert!(!dest.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
