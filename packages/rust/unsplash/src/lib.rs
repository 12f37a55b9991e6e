//! Unsplash search client and thumbnail downloader.
//!
//! [`UnsplashClient`] issues authenticated photo searches and streams the
//! selected image to disk. The HTTP stack (user agent, rustls, explicit
//! timeout) is shared between search and download.

mod download;
mod search;

pub use download::{build_image_url, download_image, generate_image_file_name};
pub use search::UnsplashClient;
