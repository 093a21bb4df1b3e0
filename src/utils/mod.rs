/// Truncate a string to at most `max_chars` characters, appending an
/// ellipsis marker when anything was cut off. Counts characters, not bytes,
/// so multi-byte titles are safe to slice.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Truncate a string to at most `max_chars` characters without a marker.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Render a duration in whole seconds as `minutes:seconds` with the seconds
/// zero-padded to two digits. Minutes are not wrapped into hours.
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Render a byte count as whole kibibytes (integer division).
pub fn format_size_kb(bytes: u64) -> String {
    format!("{} KB", bytes / 1024)
}

/// Check if the required external tools are present, returning a description
/// of everything missing.
pub async fn check_dependencies() -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available("yt-dlp").await {
        missing.push("yt-dlp - required for YouTube audio extraction".to_string());
    }

    if !check_command_available("ffmpeg").await {
        missing.push("ffmpeg - required for mp3 transcoding".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(125), "2:05");
        assert_eq!(format_duration(3725), "62:05");
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size_kb(0), "0 KB");
        assert_eq!(format_size_kb(2048), "2 KB");
        assert_eq!(format_size_kb(40 * 1024 * 1024), "40960 KB");
        // Integer division, remainder dropped
        assert_eq!(format_size_kb(1500), "1 KB");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 80), "short");

        let long = "a".repeat(85);
        let truncated = truncate_with_ellipsis(&long, 80);
        assert_eq!(truncated.len(), 83);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().filter(|&c| c == 'a').count(), 80);
    }

    #[test]
    fn test_truncate_exact_length_untouched() {
        let exact = "b".repeat(80);
        assert_eq!(truncate_with_ellipsis(&exact, 80), exact);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 50), "hello");
        assert_eq!(truncate_chars(&"c".repeat(60), 50), "c".repeat(50));
    }

    #[test]
    fn test_truncate_multibyte() {
        let title = "日本語のタイトル";
        assert_eq!(truncate_chars(title, 4), "日本語の");
    }
}
