use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::policy::PolicyLimits;

/// Audio file extensions yt-dlp may leave in the destination directory.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "webm", "wav"];

/// Default placeholder for missing metadata fields
const UNKNOWN: &str = "Unknown";

/// Result of a successful audio extraction.
///
/// The file path is owned by the orchestration that requested the download
/// and is only valid until its temporary directory is dropped.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Path to the downloaded audio file inside the destination directory
    pub file_path: PathBuf,

    /// Video title, or a placeholder if absent
    pub title: String,

    /// Duration in whole seconds, zero when unknown
    pub duration: u64,

    /// Uploader name, or a placeholder if absent
    pub uploader: String,

    /// File size in bytes
    pub file_size: u64,
}

/// Errors produced by the extraction adapter.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Video is too long ({minutes} min). Maximum: {limit_minutes} min")]
    TooLong { minutes: u64, limit_minutes: u64 },

    #[error("No audio file found after download")]
    MissingOutput,

    #[error("yt-dlp failed: {0}")]
    Extractor(String),

    #[error("failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse video metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Blocking audio-fetch capability.
///
/// Implementations may run for tens of seconds to minutes; callers are
/// expected to dispatch `fetch_audio` off the async event loop.
pub trait AudioFetcher: Send + Sync {
    /// Fetch the audio track for `url` into `dest_dir` and return its
    /// metadata. The returned file path points inside `dest_dir`.
    fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<ExtractionResult, FetchError>;
}

/// Metadata probe fields we care about from `yt-dlp --dump-json`
#[derive(Debug, Deserialize)]
struct VideoProbe {
    title: Option<String>,
    duration: Option<f64>,
    uploader: Option<String>,
}

/// Audio fetcher backed by the yt-dlp binary.
///
/// Carries a fixed configuration profile: mp3/192k transcode, browser-like
/// network identity and a set of anti-blocking extractor knobs. The knobs
/// only affect reliability against upstream access restrictions, not the
/// output itself.
pub struct YtDlpFetcher {
    yt_dlp_path: String,
    limits: PolicyLimits,
}

impl YtDlpFetcher {
    pub fn new(yt_dlp_path: impl Into<String>, limits: PolicyLimits) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            limits,
        }
    }

    /// Network identity and bypass arguments shared by probe and download.
    fn bypass_args(&self) -> Vec<String> {
        [
            "--no-playlist",
            "--socket-timeout",
            "30",
            "--user-agent",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 \
             (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1",
            "--add-header",
            "Accept:*/*",
            "--add-header",
            "Accept-Language:en-US,en;q=0.9",
            "--extractor-args",
            "youtube:player_client=android,ios,web;skip=hls,dash;player_skip=configs",
            "--sleep-requests",
            "1",
            "--age-limit",
            "18",
            "--geo-bypass-country",
            "US",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Probe video metadata without downloading any media.
    fn probe(&self, url: &str) -> Result<VideoProbe, FetchError> {
        tracing::debug!("Probing video metadata for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--skip-download", "--no-warnings"])
            .args(self.bypass_args())
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Extractor(error.into_owned()));
        }

        let probe: VideoProbe = serde_json::from_slice(&output.stdout)?;
        Ok(probe)
    }

    /// Download and transcode the audio into `dest_dir`.
    fn download(&self, url: &str, dest_dir: &Path) -> Result<(), FetchError> {
        tracing::debug!("Downloading audio for: {}", url);

        let output_template = format!("{}/%(title)s.%(ext)s", dest_dir.display());

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--extract-audio",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--format",
                "bestaudio/best",
                "--output",
                &output_template,
                "--max-filesize",
                &self.limits.max_size.to_string(),
                "--quiet",
                "--no-warnings",
            ])
            .args(self.bypass_args())
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Extractor(error.into_owned()));
        }

        Ok(())
    }
}

impl AudioFetcher for YtDlpFetcher {
    fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<ExtractionResult, FetchError> {
        let probe = self.probe(url)?;

        let title = probe.title.unwrap_or_else(|| UNKNOWN.to_string());
        let duration = probe.duration.map(|d| d as u64).unwrap_or(0);
        let uploader = probe.uploader.unwrap_or_else(|| UNKNOWN.to_string());

        // Refuse over-limit videos before any media transfer happens
        if duration > self.limits.max_duration {
            return Err(FetchError::TooLong {
                minutes: duration / 60,
                limit_minutes: self.limits.max_duration / 60,
            });
        }

        self.download(url, dest_dir)?;

        let file_path = find_audio_file(dest_dir)?.ok_or(FetchError::MissingOutput)?;
        let file_size = fs_err::metadata(&file_path)?.len();

        Ok(ExtractionResult {
            file_path,
            title,
            duration,
            uploader,
            file_size,
        })
    }
}

/// Find the first file in `dir` with a recognized audio extension.
///
/// yt-dlp reporting success does not guarantee a discoverable output file,
/// so the caller must treat `None` as a failure.
fn find_audio_file(dir: &Path) -> Result<Option<PathBuf>, FetchError> {
    for entry in fs_err::read_dir(dir)? {
        let path = entry?.path();
        let is_audio = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);

        if is_audio {
            return Ok(Some(path));
        }
    }

    Ok(None)
}
