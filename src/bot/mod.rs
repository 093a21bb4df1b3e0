use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::extractor::{AudioFetcher, YtDlpFetcher};
use crate::orchestrator;
use crate::policy::PolicyLimits;

/// Chat transport boundary used by the orchestrator.
///
/// Kept as a trait so the download pipeline can be exercised without a live
/// Telegram connection. Status-message edits and deletes are best-effort:
/// the message may have been deleted concurrently, so failures are logged
/// and swallowed by the implementation.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Send a text message, returning a handle for later edits.
    async fn reply_text(&self, chat: ChatId, text: &str) -> crate::Result<MessageId>;

    /// Edit a previously sent message in place. Best-effort.
    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str);

    /// Remove a previously sent status message. Best-effort.
    async fn delete_status(&self, chat: ChatId, message: MessageId);

    /// Send a local file as a document attachment.
    async fn reply_document(
        &self,
        chat: ChatId,
        file: &Path,
        filename: String,
        caption: String,
    ) -> crate::Result<()>;
}

#[async_trait]
impl ChatSink for Bot {
    async fn reply_text(&self, chat: ChatId, text: &str) -> crate::Result<MessageId> {
        let message = self.send_message(chat, text).await?;
        Ok(message.id)
    }

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) {
        if let Err(e) = self.edit_message_text(chat, message, text).await {
            tracing::warn!("Failed to edit status message in chat {}: {}", chat, e);
        }
    }

    async fn delete_status(&self, chat: ChatId, message: MessageId) {
        if let Err(e) = self.delete_message(chat, message).await {
            tracing::debug!("Failed to delete status message in chat {}: {}", chat, e);
        }
    }

    async fn reply_document(
        &self,
        chat: ChatId,
        file: &Path,
        filename: String,
        caption: String,
    ) -> crate::Result<()> {
        let document = InputFile::file(file.to_path_buf()).file_name(filename);
        self.send_document(chat, document).caption(caption).await?;
        Ok(())
    }
}

/// Bot commands with static informational replies.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "start working with the bot")]
    Start,
    #[command(description = "show help")]
    Help,
    #[command(description = "show bot statistics")]
    Stats,
}

/// Fixed command replies, rendered once at startup so they always state the
/// limits that are actually enforced.
pub struct CommandTexts {
    pub welcome: String,
    pub help: String,
    pub stats: String,
}

impl CommandTexts {
    pub fn render(limits: &PolicyLimits) -> Self {
        let minutes = limits.max_duration / 60;
        let megabytes = limits.max_size / 1024 / 1024;

        let welcome = format!(
            "🎵 YouTube Audio Bot

I download the audio track of YouTube videos for transcription!

How to use:
1. Send me a link to a YouTube video
2. Wait for the audio download
3. Forward the file to the main bot for transcription

Limits:
• {minutes} minutes maximum
• {megabytes}MB maximum
• Public videos only

Send /help for more details."
        );

        let help = format!(
            "📋 Help

Commands:
• /start - Start working with the bot
• /help - Show this message
• /stats - Show bot statistics

Supported YouTube formats:
• youtube.com/watch?v=...
• youtu.be/...
• youtube.com/embed/...

How it works:
1. Send a YouTube link
2. The bot downloads the audio as MP3
3. Forward the file to the main bot

Problems?
• Check that the video is public
• Make sure it is shorter than {minutes} minutes
• Try a different video if it does not work"
        );

        let stats = format!(
            "📊 Bot statistics

Audio format: MP3, 192 kbps
Maximum duration: {minutes} minutes
Maximum file size: {megabytes}MB
Extraction engine: yt-dlp"
        );

        Self {
            welcome,
            help,
            stats,
        }
    }
}

/// Shared per-process state handed to message handlers.
pub struct AppState {
    pub fetcher: Arc<dyn AudioFetcher>,
    pub limits: PolicyLimits,
    pub texts: CommandTexts,
}

/// Run the bot until the process is stopped.
pub async fn run(config: Config) -> crate::Result<()> {
    let bot = Bot::new(&config.bot_token);

    let state = Arc::new(AppState {
        fetcher: Arc::new(YtDlpFetcher::new(config.ytdlp_path, config.limits)),
        limits: config.limits,
        texts: CommandTexts::render(&config.limits),
    });

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(dptree::endpoint(handle_message));

    tracing::info!("Starting YouTube audio bot");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let text = match cmd {
        Command::Start => &state.texts.welcome,
        Command::Help => &state.texts.help,
        Command::Stats => &state.texts.stats,
    };

    bot.send_message(msg.chat.id, text.clone()).await?;
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let outcome = orchestrator::handle_request(
        &bot,
        msg.chat.id,
        text,
        state.fetcher.clone(),
        state.limits,
    )
    .await;

    if let Err(e) = outcome {
        tracing::error!("Request handling failed in chat {}: {:#}", msg.chat.id, e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_texts_follow_configured_limits() {
        let limits = PolicyLimits {
            max_size: 10 * 1024 * 1024,
            max_duration: 600,
        };

        let texts = CommandTexts::render(&limits);
        assert!(texts.welcome.contains("10 minutes maximum"));
        assert!(texts.welcome.contains("10MB maximum"));
        assert!(texts.help.contains("shorter than 10 minutes"));
        assert!(texts.stats.contains("Maximum duration: 10 minutes"));
        assert!(texts.stats.contains("Maximum file size: 10MB"));
    }

    #[test]
    fn test_command_texts_defaults() {
        let texts = CommandTexts::render(&PolicyLimits::default());
        assert!(texts.welcome.contains("30 minutes maximum"));
        assert!(texts.welcome.contains("50MB maximum"));
    }
}
