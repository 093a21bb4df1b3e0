//! YouTube Audio Bot - a Telegram bot that fetches the audio track of a
//! YouTube video and sends it back as a document.
//!
//! Extraction and transcoding are delegated to yt-dlp; this crate owns the
//! orchestration around it: link validation, duration/size policy, failure
//! classification and temp-storage cleanup.

pub mod bot;
pub mod config;
pub mod extractor;
pub mod failure;
pub mod links;
pub mod orchestrator;
pub mod policy;
pub mod utils;

pub use config::Config;
pub use extractor::{AudioFetcher, ExtractionResult, YtDlpFetcher};
pub use policy::PolicyLimits;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
