use regex::Regex;
use std::sync::LazyLock;

/// Recognized YouTube link shapes: canonical domain, short-link domain and
/// the no-cookie proxy domain, with or without scheme and `www.`, followed by
/// one of the known path forms and an 11-character video ID slot.
///
/// Anchored at the start on purpose: text with leading garbage before the
/// scheme is not a link. Domains are lowercase in the pattern, so upper-case
/// domains do not match.
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    )
    .expect("invalid YouTube link pattern")
});

/// Check whether the given text is a recognized YouTube link.
///
/// Matches by position and length (an 11-character run where the video ID
/// belongs), not by validating the ID alphabet. Trailing query junk after
/// the ID is ignored.
pub fn is_supported_link(text: &str) -> bool {
    YOUTUBE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_urls() {
        assert!(is_supported_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_supported_link("https://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_supported_link("http://youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_short_links() {
        assert!(is_supported_link("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_supported_link("youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_embed_and_v_paths() {
        assert!(is_supported_link("https://youtube.com/embed/dQw4w9WgXcQ"));
        assert!(is_supported_link("https://youtube.com/v/dQw4w9WgXcQ"));
        assert!(is_supported_link(
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ"
        ));
    }

    #[test]
    fn test_scheme_and_www_optional() {
        assert!(is_supported_link("youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_supported_link("www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_trailing_junk_ignored() {
        assert!(is_supported_link(
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123"
        ));
    }

    #[test]
    fn test_generic_query_v() {
        assert!(is_supported_link(
            "https://youtube.com/playlist?v=dQw4w9WgXcQ"
        ));
    }

    #[test]
    fn test_rejects_non_links() {
        assert!(!is_supported_link("hello world"));
        assert!(!is_supported_link(""));
        assert!(!is_supported_link("https://vimeo.com/12345678901"));
        assert!(!is_supported_link("https://example.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_leading_garbage_rejected() {
        assert!(!is_supported_link(
            "check this https://youtube.com/watch?v=dQw4w9WgXcQ"
        ));
    }

    #[test]
    fn test_uppercase_domain_not_recognized() {
        assert!(!is_supported_link("https://YOUTUBE.COM/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_short_id_rejected() {
        assert!(!is_supported_link("https://youtu.be/short"));
    }
}
