//! Utility functions for IRC protocol handling.
//!
//! Safe string truncation, line length checks and channel-name detection.

/// Maximum length of a protocol line, CRLF included.
pub const MAX_LINE_LEN: usize = 512;

/// Characters that start a channel name.
pub const CHANNEL_PREFIXES: &str = "#&+!";

/// Truncates a string to at most `max_bytes` bytes without breaking
/// a multi-byte UTF-8 codepoint at the end.
///
/// # Examples
///
/// ```
/// use slirc_client::util::truncate_utf8_safe;
///
/// assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
///
/// let emoji = "Hello 👋 World";
/// assert_eq!(truncate_utf8_safe(emoji, 8), "Hello ");
///
/// assert_eq!(truncate_utf8_safe("hi", 10), "hi");
/// ```
#[inline]
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    // Find the last valid UTF-8 boundary at or before max_bytes
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Returns `Some(len)` if `line` plus CRLF would exceed `limit` bytes.
///
/// `line` is the already encoded wire form.
#[inline]
pub fn check_line_length(line: impl AsRef<[u8]>, limit: usize) -> Option<usize> {
    let len = line.as_ref().len() + 2;
    if len > limit {
        Some(len)
    } else {
        None
    }
}

/// Whether `name` looks like a channel (`#`, `&`, `+` or `!` prefix).
///
/// ```
/// use slirc_client::util::is_channel;
///
/// assert!(is_channel("#rust"));
/// assert!(!is_channel("alice"));
/// assert!(!is_channel(""));
/// ```
#[inline]
pub fn is_channel(name: &str) -> bool {
    name.chars()
        .next()
        .map_or(false, |c| CHANNEL_PREFIXES.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_utf8_safe_ascii() {
        assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
        assert_eq!(truncate_utf8_safe("hello", 10), "hello");
        assert_eq!(truncate_utf8_safe("", 5), "");
    }

    #[test]
    fn test_truncate_utf8_safe_multibyte() {
        // 2-byte UTF-8: é is 2 bytes (0xC3 0xA9)
        let s = "café";
        assert_eq!(truncate_utf8_safe(s, 4), "caf");
        assert_eq!(truncate_utf8_safe(s, 5), "café");

        // 4-byte UTF-8: 👋 is 4 bytes
        let s = "Hi👋";
        assert_eq!(truncate_utf8_safe(s, 3), "Hi");
        assert_eq!(truncate_utf8_safe(s, 6), "Hi👋");

        assert_eq!(truncate_utf8_safe("hello", 0), "");
    }

    #[test]
    fn test_check_line_length() {
        assert!(check_line_length("PING :x", MAX_LINE_LEN).is_none());
        assert!(check_line_length(&"x".repeat(510), MAX_LINE_LEN).is_none());
        assert_eq!(check_line_length(&"x".repeat(511), MAX_LINE_LEN), Some(513));
    }

    #[test]
    fn test_is_channel() {
        for name in ["#a", "&local", "+modeless", "!ABCDEsafe"] {
            assert!(is_channel(name), "{}", name);
        }
        assert!(!is_channel("nick"));
        assert!(!is_channel("*"));
    }
}
