//! Application configuration for thumbfill.
//!
//! User config lives at `~/.thumbfill/thumbfill.toml`. Every section is
//! optional; a missing file means pure defaults. The Unsplash access key is
//! never stored in the file — only the name of the env var that holds it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThumbfillError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "thumbfill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".thumbfill";

/// Placeholder used when the access-key env var is unset. API calls will
/// fail authentication; this is not validated upfront so offline commands
/// (`stats`, `config show`) keep working.
pub const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_ACCESS_KEY_HERE";

// ---------------------------------------------------------------------------
// Config structs (matching thumbfill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content store and image directory locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Downloaded image sizing.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Unsplash API settings.
    #[serde(default)]
    pub unsplash: UnsplashConfig,

    /// Domain-term → English search-keyword mapping. Data, not code: extend
    /// it here without touching the extractor.
    #[serde(default = "default_keyword_mapping")]
    pub keyword_mapping: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            images: ImagesConfig::default(),
            unsplash: UnsplashConfig::default(),
            keyword_mapping: default_keyword_mapping(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to the articles JSON document.
    #[serde(default = "default_content_store")]
    pub content_store: String,

    /// Directory downloaded thumbnails are written to.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Site-relative prefix recorded into article records (and used to
    /// classify a thumbnail as "local" in stats).
    #[serde(default = "default_thumbnail_prefix")]
    pub thumbnail_prefix: String,

    /// Fallback path assigned when search or download fails.
    #[serde(default = "default_thumbnail")]
    pub default_thumbnail: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_store: default_content_store(),
            image_dir: default_image_dir(),
            thumbnail_prefix: default_thumbnail_prefix(),
            default_thumbnail: default_thumbnail(),
        }
    }
}

fn default_content_store() -> String {
    "public/content/articles/articles.json".into()
}
fn default_image_dir() -> String {
    "public/assets/images/blog-thumbnails".into()
}
fn default_thumbnail_prefix() -> String {
    "/assets/images/blog-thumbnails/".into()
}
fn default_thumbnail() -> String {
    "/assets/images/default-blog-thumbnail.jpg".into()
}

/// `[images]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Requested crop width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Requested crop height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// JPEG quality (1–100).
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            quality: default_quality(),
        }
    }
}

fn default_width() -> u32 {
    400
}
fn default_height() -> u32 {
    250
}
fn default_quality() -> u8 {
    80
}

/// `[unsplash]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// Name of the env var holding the access key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API base URL. Overridable for tests.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Search page size.
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Requested result orientation.
    #[serde(default = "default_orientation")]
    pub orientation: String,

    /// Network timeout for search and download requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_url: default_api_url(),
            per_page: default_per_page(),
            orientation: default_orientation(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "UNSPLASH_ACCESS_KEY".into()
}
fn default_api_url() -> String {
    "https://api.unsplash.com".into()
}
fn default_per_page() -> u8 {
    5
}
fn default_orientation() -> String {
    "landscape".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// The built-in domain-term mapping shipped as the `[keyword_mapping]`
/// default. Originals are retained; mapped values are appended alongside.
pub fn default_keyword_mapping() -> BTreeMap<String, String> {
    [
        ("Audible", "audiobook"),
        ("読書", "book"),
        ("学習", "study"),
        ("時間管理", "time management"),
        ("睡眠", "sleep"),
        ("ブログ", "blog"),
        ("投資", "investment"),
        ("健康", "health"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

// ---------------------------------------------------------------------------
// Pipeline config (runtime, merged from config + environment)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration — everything the pipeline needs, resolved
/// once and passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Unsplash access key, read from the configured env var.
    pub access_key: String,
    /// Path to the articles JSON document.
    pub content_store_path: PathBuf,
    /// Directory downloaded thumbnails are written to.
    pub image_directory: PathBuf,
    /// Site-relative prefix for local thumbnail paths.
    pub thumbnail_prefix: String,
    /// Fallback path for failed articles.
    pub default_thumbnail: String,
    /// Requested crop width in pixels.
    pub image_width: u32,
    /// Requested crop height in pixels.
    pub image_height: u32,
    /// JPEG quality (1–100).
    pub image_quality: u8,
    /// API base URL.
    pub api_url: String,
    /// Search page size.
    pub per_page: u8,
    /// Requested result orientation.
    pub orientation: String,
    /// Network timeout for search and download requests.
    pub timeout_secs: u64,
    /// Domain-term → English keyword mapping.
    pub keyword_mapping: BTreeMap<String, String>,
}

impl PipelineConfig {
    /// Resolve a runtime config from an [`AppConfig`] plus the environment.
    ///
    /// A missing access key is substituted with a placeholder and logged —
    /// search calls will fail authentication, which surfaces per article as
    /// a fallback, not as an upfront abort.
    pub fn resolve(config: &AppConfig) -> Self {
        let access_key = match std::env::var(&config.unsplash.api_key_env) {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!(
                    env_var = %config.unsplash.api_key_env,
                    "access key env var not set, using placeholder (API calls will fail auth)"
                );
                PLACEHOLDER_ACCESS_KEY.to_string()
            }
        };

        Self {
            access_key,
            content_store_path: PathBuf::from(&config.paths.content_store),
            image_directory: PathBuf::from(&config.paths.image_dir),
            thumbnail_prefix: config.paths.thumbnail_prefix.clone(),
            default_thumbnail: config.paths.default_thumbnail.clone(),
            image_width: config.images.width,
            image_height: config.images.height,
            image_quality: config.images.quality,
            api_url: config.unsplash.api_url.clone(),
            per_page: config.unsplash.per_page,
            orientation: config.unsplash.orientation.clone(),
            timeout_secs: config.unsplash.timeout_secs,
            keyword_mapping: config.keyword_mapping.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.thumbfill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ThumbfillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.thumbfill/thumbfill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ThumbfillError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ThumbfillError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ThumbfillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ThumbfillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ThumbfillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("content_store"));
        assert!(toml_str.contains("UNSPLASH_ACCESS_KEY"));
        assert!(toml_str.contains("keyword_mapping"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.images.width, 400);
        assert_eq!(parsed.images.height, 250);
        assert_eq!(parsed.images.quality, 80);
        assert_eq!(parsed.unsplash.per_page, 5);
        assert_eq!(parsed.keyword_mapping["読書"], "book");
    }

    #[test]
    fn keyword_mapping_is_extensible() {
        let toml_str = r#"
[keyword_mapping]
"読書" = "book"
"料理" = "cooking"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.keyword_mapping["料理"], "cooking");
        // An explicit table replaces the default wholesale.
        assert!(!config.keyword_mapping.contains_key("投資"));
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let toml_str = r#"
[images]
width = 800
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.images.width, 800);
        assert_eq!(config.images.height, 250);
        assert_eq!(
            config.paths.default_thumbnail,
            "/assets/images/default-blog-thumbnail.jpg"
        );
    }

    #[test]
    fn resolve_without_key_uses_placeholder() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.unsplash.api_key_env = "TF_TEST_NONEXISTENT_KEY_12345".into();
        let pipeline = PipelineConfig::resolve(&config);
        assert_eq!(pipeline.access_key, PLACEHOLDER_ACCESS_KEY);
        assert_eq!(pipeline.image_width, 400);
        assert!(pipeline.thumbnail_prefix.ends_with('/'));
    }
}
