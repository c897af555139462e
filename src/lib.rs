//! Resumable, concurrent downloader for animevost playlists.
//!
//! [`downloader::download`] resolves a playlist page url to its episodes and
//! saves them as `<path>/<title slug>/0001.<ext>`, resuming partial files
//! and falling back from the standard to the high definition stream.

pub mod api;
pub mod config;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{DownloadOptions, ExecutionMode};
pub use error::{Error, Result};
