use crate::policy::PolicyLimits;

/// Number of raw error characters shown for unclassified failures
const EXCERPT_LEN: usize = 200;

/// User-facing failure categories for a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCategory {
    /// YouTube refused the request with a bot/auth challenge
    AccessBlocked,
    /// The video is not public
    PrivateVideo,
    /// The video runs longer than the configured limit
    DurationExceeded,
    /// yt-dlp refused the download because of its max-filesize hint
    SizeExceeded,
    /// Anything else, carrying a bounded excerpt of the raw error
    Unknown(String),
}

/// Map raw extractor error text to a failure category.
///
/// Rules are ordered and the first match wins; the categories overlap at the
/// text level (an auth-challenge message may also mention "video"), so the
/// order is part of the contract.
pub fn classify(error_text: &str) -> FailureCategory {
    if error_text.contains("Sign in to confirm") || error_text.to_lowercase().contains("bot") {
        return FailureCategory::AccessBlocked;
    }

    if error_text.contains("Private video") {
        return FailureCategory::PrivateVideo;
    }

    if error_text.contains("too long") {
        return FailureCategory::DurationExceeded;
    }

    if error_text.contains("max-filesize") {
        return FailureCategory::SizeExceeded;
    }

    let excerpt: String = error_text.chars().take(EXCERPT_LEN).collect();
    FailureCategory::Unknown(excerpt)
}

/// Render the chat message for a failure category.
pub fn user_message(category: &FailureCategory, limits: &PolicyLimits) -> String {
    match category {
        FailureCategory::AccessBlocked => "❌ YouTube blocked the request\n\n\
             This happens when its bot protection kicks in.\n\
             Try:\n\
             • a different video\n\
             • again in a few minutes\n\
             • a shorter video"
            .to_string(),
        FailureCategory::PrivateVideo => "❌ Private video\n\n\
             Only public videos can be downloaded."
            .to_string(),
        FailureCategory::DurationExceeded => format!(
            "❌ Video is too long\n\nMaximum duration: {} minutes",
            limits.max_duration / 60
        ),
        FailureCategory::SizeExceeded => format!(
            "❌ File is too big\n\nMaximum size: {}MB",
            limits.max_size / 1024 / 1024
        ),
        FailureCategory::Unknown(excerpt) => format!(
            "❌ Download failed\n\nDetails: {}\n\nTry a different video or try again later.",
            excerpt
        ),
    }
}

/// Message sent when the input is not a recognized YouTube link.
pub const NOT_A_LINK_MESSAGE: &str = "❌ That is not a YouTube link.\n\n\
Send a valid link, for example:\n\
• https://youtube.com/watch?v=...\n\
• https://youtu.be/...";
