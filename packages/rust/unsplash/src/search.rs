//! Authenticated photo search against the Unsplash API.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use thumbfill_shared::{ImageCandidate, PipelineConfig, Result, ThumbfillError};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("thumbfill/", env!("CARGO_PKG_VERSION"));

/// How many keywords make it into the search query.
const MAX_QUERY_KEYWORDS: usize = 3;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `/search/photos` response body. Only the fields we consume.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: String,
    #[serde(default)]
    likes: u64,
    urls: PhotoUrls,
    #[serde(default)]
    alt_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Unsplash API client with a shared HTTP stack for search and download.
pub struct UnsplashClient {
    client: Client,
    api_url: String,
    access_key: String,
    per_page: u8,
    orientation: String,
}

impl UnsplashClient {
    /// Build a client from the resolved pipeline config.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ThumbfillError::Search(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
            per_page: config.per_page,
            orientation: config.orientation.clone(),
        })
    }

    /// The underlying HTTP client, reused for image downloads.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Search for the best-matching landscape photo for `keywords`.
    ///
    /// The query is the first 3 keywords joined by spaces. Among results the
    /// candidate with the highest likes count wins; ties go to the earliest
    /// response position. Empty result sets, network failures, and
    /// non-parseable bodies all surface as [`ThumbfillError::Search`].
    #[instrument(skip_all, fields(query))]
    pub async fn search_image(&self, keywords: &[String]) -> Result<ImageCandidate> {
        let query = keywords
            .iter()
            .take(MAX_QUERY_KEYWORDS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        tracing::Span::current().record("query", query.as_str());

        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(format!("{}/search/photos", self.api_url))
            .query(&[
                ("query", query.as_str()),
                ("per_page", per_page.as_str()),
                ("orientation", self.orientation.as_str()),
            ])
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .send()
            .await
            .map_err(|e| ThumbfillError::Search(format!("'{query}': {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbfillError::Search(format!("'{query}': HTTP {status}")));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ThumbfillError::Search(format!("'{query}': malformed response: {e}")))?;

        let best = select_best(body.results)
            .ok_or_else(|| ThumbfillError::Search(format!("no images found for '{query}'")))?;

        debug!(photo_id = %best.id, likes = best.likes, "selected image candidate");

        Ok(ImageCandidate {
            id: best.id,
            likes: best.likes,
            url_template: best.urls.regular,
            alt: best.alt_description,
        })
    }
}

/// Pick the candidate with the strictly highest likes count; the first
/// occurrence wins ties (equivalent to a stable descending sort).
fn select_best(results: Vec<Photo>) -> Option<Photo> {
    results.into_iter().fold(None, |best, photo| match best {
        Some(b) if photo.likes <= b.likes => Some(b),
        _ => Some(photo),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbfill_shared::AppConfig;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn photo(id: &str, likes: u64) -> Photo {
        Photo {
            id: id.into(),
            likes,
            urls: PhotoUrls {
                regular: format!("https://images.example.com/{id}"),
            },
            alt_description: None,
        }
    }

    fn test_config(api_url: &str) -> PipelineConfig {
        let config = AppConfig::default();
        let mut pipeline = PipelineConfig::resolve(&config);
        pipeline.api_url = api_url.to_string();
        pipeline.access_key = "test-key".to_string();
        pipeline
    }

    fn results_body(photos: &[(&str, u64)]) -> serde_json::Value {
        serde_json::json!({
            "total": photos.len(),
            "results": photos.iter().map(|(id, likes)| serde_json::json!({
                "id": id,
                "likes": likes,
                "urls": { "regular": format!("https://images.example.com/{id}") },
                "alt_description": null,
            })).collect::<Vec<_>>(),
        })
    }

    #[test]
    fn select_best_prefers_highest_likes() {
        let best = select_best(vec![photo("a", 10), photo("b", 50), photo("c", 30)]).unwrap();
        assert_eq!(best.id, "b");
        assert_eq!(best.likes, 50);
    }

    #[test]
    fn select_best_breaks_ties_by_response_order() {
        let best = select_best(vec![photo("first", 40), photo("second", 40)]).unwrap();
        assert_eq!(best.id, "first");
    }

    #[test]
    fn select_best_empty_is_none() {
        assert!(select_best(vec![]).is_none());
    }

    #[tokio::test]
    async fn search_sends_auth_and_query_params() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "sleep health book"))
            .and(query_param("per_page", "5"))
            .and(query_param("orientation", "landscape"))
            .and(header("Authorization", "Client-ID test-key"))
            .and(header("Accept-Version", "v1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(results_body(&[("abc", 12)])),
            )
            .mount(&server)
            .await;

        let client = UnsplashClient::new(&test_config(&server.uri())).unwrap();
        let keywords: Vec<String> = ["sleep", "health", "book", "ignored"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let candidate = client.search_image(&keywords).await.unwrap();
        assert_eq!(candidate.id, "abc");
        assert_eq!(candidate.url_template, "https://images.example.com/abc");
    }

    #[tokio::test]
    async fn empty_results_is_search_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(results_body(&[])))
            .mount(&server)
            .await;

        let client = UnsplashClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .search_image(&["rust".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ThumbfillError::Search(_)));
        assert!(err.to_string().contains("no images found"));
    }

    #[tokio::test]
    async fn auth_failure_is_search_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(401).set_body_string("OAuth error"))
            .mount(&server)
            .await;

        let client = UnsplashClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .search_image(&["rust".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[tokio::test]
    async fn malformed_body_is_search_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = UnsplashClient::new(&test_config(&server.uri())).unwrap();
        let err = client
            .search_image(&["rust".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("malformed response"));
    }
}
