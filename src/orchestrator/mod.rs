use std::sync::Arc;
use teloxide::types::ChatId;

use crate::bot::ChatSink;
use crate::extractor::{AudioFetcher, ExtractionResult};
use crate::failure::{self, FailureCategory};
use crate::links;
use crate::policy::{self, PolicyLimits, Violation};
use crate::utils;

const STATUS_CHECKING: &str = "⏳ Checking the video...";
const STATUS_DOWNLOADING: &str = "📡 Downloading the audio... This can take a while.";
const STATUS_SENDING: &str = "📤 Sending the file...";

const CAPTION_TITLE_CHARS: usize = 80;
const FILENAME_TITLE_CHARS: usize = 50;

/// Per-request temporary directory, removed when the orchestration scope
/// ends. Removal failures are logged and never surfaced to the user.
struct TempScope {
    dir: Option<tempfile::TempDir>,
    path: std::path::PathBuf,
}

impl TempScope {
    fn create() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempScope {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to remove temp directory: {}", e);
            }
        }
    }
}

/// Handle one inbound text message end to end.
///
/// Sequence: validate the link, post a status message, fetch the audio in a
/// blocking worker, apply the policy limits, deliver the file, remove the
/// status message. Every failure is converted into exactly one chat message;
/// an `Err` return only means the transport itself is down. The per-request
/// temp directory is dropped, and thereby removed, on every exit path.
pub async fn handle_request<C: ChatSink>(
    chat: &C,
    conv: ChatId,
    text: &str,
    fetcher: Arc<dyn AudioFetcher>,
    limits: PolicyLimits,
) -> crate::Result<()> {
    let url = text.trim();

    if !links::is_supported_link(url) {
        chat.reply_text(conv, failure::NOT_A_LINK_MESSAGE).await?;
        return Ok(());
    }

    let status = chat.reply_text(conv, STATUS_CHECKING).await?;

    let temp_dir = match TempScope::create() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("Failed to create temp directory: {}", e);
            let category = failure::classify(&e.to_string());
            chat.edit_text(conv, status, &failure::user_message(&category, &limits))
                .await;
            return Ok(());
        }
    };

    chat.edit_text(conv, status, STATUS_DOWNLOADING).await;

    let dest = temp_dir.path().to_path_buf();
    let owned_url = url.to_string();
    let fetched =
        tokio::task::spawn_blocking(move || fetcher.fetch_audio(&owned_url, &dest)).await;

    let result = match fetched {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            let error_text = e.to_string();
            tracing::error!("Extraction failed for {}: {}", url, error_text);
            let category = failure::classify(&error_text);
            chat.edit_text(conv, status, &failure::user_message(&category, &limits))
                .await;
            return Ok(());
        }
        Err(join_error) => {
            tracing::error!("Extraction worker failed for {}: {}", url, join_error);
            let category = failure::classify(&join_error.to_string());
            chat.edit_text(conv, status, &failure::user_message(&category, &limits))
                .await;
            return Ok(());
        }
    };

    if let Some(violation) = policy::check(&result, &limits) {
        let message = match violation {
            Violation::Size { actual, limit } => format!(
                "❌ File is too big ({}MB)\nMaximum: {}MB",
                actual / 1024 / 1024,
                limit / 1024 / 1024
            ),
            Violation::Duration { .. } => {
                failure::user_message(&FailureCategory::DurationExceeded, &limits)
            }
        };
        chat.edit_text(conv, status, &message).await;
        return Ok(());
    }

    chat.edit_text(conv, status, STATUS_SENDING).await;

    let caption = build_caption(&result);
    let filename = build_filename(&result.title);

    if let Err(e) = chat
        .reply_document(conv, &result.file_path, filename, caption)
        .await
    {
        let error_text = format!("{:#}", e);
        tracing::error!("Delivery failed for {}: {}", url, error_text);
        let category = failure::classify(&error_text);
        chat.edit_text(conv, status, &failure::user_message(&category, &limits))
            .await;
        return Ok(());
    }

    chat.delete_status(conv, status).await;

    tracing::info!(
        "Successfully processed: {} ({})",
        result.title,
        utils::format_size_kb(result.file_size)
    );

    Ok(())
}

fn build_caption(result: &ExtractionResult) -> String {
    format!(
        "🎵 Audio ready!\n\n\
         📄 {}\n\
         👤 {}\n\
         ⏱ Duration: {}\n\
         📏 Size: {}\n\n\
         ➡️ Forward this file to the main bot for transcription",
        utils::truncate_with_ellipsis(&result.title, CAPTION_TITLE_CHARS),
        result.uploader,
        utils::format_duration(result.duration),
        utils::format_size_kb(result.file_size),
    )
}

fn build_filename(title: &str) -> String {
    format!("{}.mp3", utils::truncate_chars(title, FILENAME_TITLE_CHARS))
}
