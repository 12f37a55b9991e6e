//! Shared types, error model, and configuration for thumbfill.
//!
//! This crate is the foundation depended on by all other thumbfill crates.
//! It provides:
//! - [`ThumbfillError`] — the unified error type
//! - Domain types ([`ArticleRecord`], [`ContentStoreData`], [`ImageStats`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ImagesConfig, PathsConfig, PipelineConfig, UnsplashConfig, config_dir,
    config_file_path, default_keyword_mapping, init_config, load_config, load_config_from,
};
pub use error::{Result, ThumbfillError};
pub use types::{ArticleRecord, ContentStoreData, ImageCandidate, ImageStats};
