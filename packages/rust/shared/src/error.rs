//! Error types for thumbfill.
//!
//! Library crates use [`ThumbfillError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Containment policy: `Search` and `Download` are caught at the article
//! boundary and mapped to the fallback thumbnail; only `StoreRead` aborts a
//! run.

use std::path::PathBuf;

/// Top-level error type for all thumbfill operations.
#[derive(Debug, thiserror::Error)]
pub enum ThumbfillError {
    /// Content Store could not be read or parsed. Run-fatal.
    #[error("content store read error at {path:?}: {message}")]
    StoreRead { path: PathBuf, message: String },

    /// Content Store could not be persisted.
    #[error("content store write error at {path:?}: {message}")]
    StoreWrite { path: PathBuf, message: String },

    /// Image search failed: network error, malformed response, or empty
    /// result set. Contained per article.
    #[error("search error: {0}")]
    Search(String),

    /// Image download failed mid-transfer. Contained per article; the
    /// partial file has already been removed when this propagates.
    #[error("download error: {0}")]
    Download(String),

    /// No article with the given URL exists in either collection.
    #[error("article not found: {url}")]
    ArticleNotFound { url: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ThumbfillError>;

impl ThumbfillError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a store-read error with the offending path.
    pub fn store_read(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::StoreRead {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a store-write error with the offending path.
    pub fn store_write(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::StoreWrite {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error aborts the whole run rather than one article.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::StoreRead { .. } | Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ThumbfillError::Search("no images found for 'rust'".into());
        assert_eq!(err.to_string(), "search error: no images found for 'rust'");

        let err = ThumbfillError::ArticleNotFound {
            url: "https://example.com/missing".into(),
        };
        assert!(err.to_string().contains("https://example.com/missing"));
    }

    #[test]
    fn fatality_split() {
        assert!(ThumbfillError::store_read("a.json", "bad").is_run_fatal());
        assert!(ThumbfillError::config("no home dir").is_run_fatal());
        assert!(!ThumbfillError::Search("timeout".into()).is_run_fatal());
        assert!(!ThumbfillError::Download("reset".into()).is_run_fatal());
    }
}
