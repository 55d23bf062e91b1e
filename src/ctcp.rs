//! CTCP (Client-to-Client Protocol) de-quoting.
//!
//! CTCP requests travel inside PRIVMSG and NOTICE bodies, delimited by
//! `\x01`. Before splitting, the body is low-level de-quoted: `\x10`
//! followed by `0`, `n`, `r` or `\x10` restores NUL, LF, CR or `\x10`.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_client::ctcp::{dequote, CtcpSegment};
//!
//! let parts = dequote("\x01ACTION waves\x01");
//! assert_eq!(parts, vec![CtcpSegment::tagged("ACTION", Some("waves"))]);
//! ```

use std::borrow::Cow;
use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// The low-level quote character (`\x10`).
pub const LOW_LEVEL_QUOTE: char = '\x10';

/// One piece of a de-quoted message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CtcpSegment {
    /// Ordinary text between CTCP requests.
    Text(String),
    /// A CTCP request or reply: tag plus optional data.
    Tagged {
        /// The CTCP command (`ACTION`, `VERSION`, ...), as sent.
        tag: String,
        /// Everything after the first space, if there was one.
        data: Option<String>,
    },
}

impl CtcpSegment {
    /// Build a tagged segment.
    pub fn tagged(tag: &str, data: Option<&str>) -> Self {
        CtcpSegment::Tagged {
            tag: tag.to_owned(),
            data: data.map(str::to_owned),
        }
    }

    fn from_chunk(chunk: &str) -> Self {
        match chunk.split_once(' ') {
            Some((tag, data)) => Self::tagged(tag, Some(data)),
            None => Self::tagged(chunk, None),
        }
    }

    /// Whether this is a tagged (CTCP) segment.
    pub fn is_tagged(&self) -> bool {
        matches!(self, CtcpSegment::Tagged { .. })
    }
}

impl fmt::Display for CtcpSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtcpSegment::Text(text) => f.write_str(text),
            CtcpSegment::Tagged { tag, data } => {
                write!(f, "{}{}", CTCP_DELIM, tag)?;
                if let Some(data) = data {
                    write!(f, " {}", data)?;
                }
                write!(f, "{}", CTCP_DELIM)
            }
        }
    }
}

/// Reverse low-level quoting.
///
/// A quote followed by an unknown character yields that character; a
/// trailing lone quote is kept.
pub fn low_level_dequote(message: &str) -> Cow<'_, str> {
    if !message.contains(LOW_LEVEL_QUOTE) {
        return Cow::Borrowed(message);
    }

    let mut out = String::with_capacity(message.len());
    let mut chars = message.chars();
    while let Some(c) = chars.next() {
        if c != LOW_LEVEL_QUOTE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push(LOW_LEVEL_QUOTE),
        }
    }
    Cow::Owned(out)
}

/// Apply low-level quoting, the inverse of [`low_level_dequote`].
pub fn low_level_quote(message: &str) -> Cow<'_, str> {
    if !message.contains(['\0', '\n', '\r', LOW_LEVEL_QUOTE]) {
        return Cow::Borrowed(message);
    }

    let mut out = String::with_capacity(message.len() + 4);
    for c in message.chars() {
        match c {
            '\0' => out.push_str("\x100"),
            '\n' => out.push_str("\x10n"),
            '\r' => out.push_str("\x10r"),
            LOW_LEVEL_QUOTE => out.push_str("\x10\x10"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Split a PRIVMSG/NOTICE body into text and CTCP segments.
///
/// Segments between delimiters alternate between text and tagged data.
/// Empty text segments are dropped, tagged ones are always kept. An
/// unmatched trailing delimiter is treated as text, delimiter included.
/// A body with no delimiter at all comes back as a single text segment,
/// even when empty.
pub fn dequote(message: &str) -> Vec<CtcpSegment> {
    let message = low_level_dequote(message);

    if !message.contains(CTCP_DELIM) {
        return vec![CtcpSegment::Text(message.into_owned())];
    }

    let chunks: Vec<&str> = message.split(CTCP_DELIM).collect();
    let mut segments = Vec::with_capacity(chunks.len());

    let mut i = 0;
    while i + 1 < chunks.len() {
        if !chunks[i].is_empty() {
            segments.push(CtcpSegment::Text(chunks[i].to_owned()));
        }
        if i + 2 < chunks.len() {
            segments.push(CtcpSegment::from_chunk(chunks[i + 1]));
        }
        i += 2;
    }

    if let Some(last) = chunks.last() {
        if chunks.len() % 2 == 0 {
            segments.push(CtcpSegment::Text(format!("{}{}", CTCP_DELIM, last)));
        } else if !last.is_empty() {
            segments.push(CtcpSegment::Text((*last).to_owned()));
        }
    }

    segments
}

/// Wrap a CTCP request for sending: `\x01TAG[ data]\x01`.
///
/// The data is low-level quoted, so embedded line breaks survive the trip.
pub fn tagged(tag: &str, data: Option<&str>) -> String {
    let data = data.filter(|d| !d.is_empty()).map(low_level_quote);
    CtcpSegment::tagged(tag, data.as_deref()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_level_dequote() {
        assert_eq!(low_level_dequote("a\x10nb"), "a\nb");
        assert_eq!(low_level_dequote("a\x100b\x10rc"), "a\0b\rc");
        assert_eq!(low_level_dequote("a\x10\x10b"), "a\x10b");
        assert_eq!(low_level_dequote("a\x10xb"), "axb");
        assert_eq!(low_level_dequote("end\x10"), "end\x10");
        assert!(matches!(low_level_dequote("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_quote_then_dequote() {
        let raw = "line\none\0\x10";
        assert_eq!(low_level_dequote(&low_level_quote(raw)), raw);
    }

    #[test]
    fn test_action() {
        assert_eq!(
            dequote("\x01ACTION waves\x01"),
            vec![CtcpSegment::tagged("ACTION", Some("waves"))]
        );
    }

    #[test]
    fn test_tag_without_data() {
        assert_eq!(
            dequote("\x01VERSION\x01"),
            vec![CtcpSegment::tagged("VERSION", None)]
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(dequote("hello"), vec![CtcpSegment::Text("hello".into())]);
        assert_eq!(dequote(""), vec![CtcpSegment::Text(String::new())]);
    }

    #[test]
    fn test_mixed_text_and_tags() {
        assert_eq!(
            dequote("hi \x01PING 123\x01 there\x01TIME\x01"),
            vec![
                CtcpSegment::Text("hi ".into()),
                CtcpSegment::tagged("PING", Some("123")),
                CtcpSegment::Text(" there".into()),
                CtcpSegment::tagged("TIME", None),
            ]
        );
    }

    #[test]
    fn test_text_after_last_tag() {
        assert_eq!(
            dequote("\x01X\x01 tail"),
            vec![CtcpSegment::tagged("X", None), CtcpSegment::Text(" tail".into())]
        );
        assert_eq!(
            dequote("\x01ACTION waves\x01 and smiles"),
            vec![
                CtcpSegment::tagged("ACTION", Some("waves")),
                CtcpSegment::Text(" and smiles".into()),
            ]
        );
    }

    #[test]
    fn test_unmatched_trailing_delimiter_is_text() {
        assert_eq!(
            dequote("hi \x01VERSION"),
            vec![
                CtcpSegment::Text("hi ".into()),
                CtcpSegment::Text("\x01VERSION".into()),
            ]
        );
    }

    #[test]
    fn test_empty_tag_is_kept() {
        assert_eq!(dequote("\x01\x01"), vec![CtcpSegment::tagged("", None)]);
    }

    #[test]
    fn test_tagged_builder() {
        assert_eq!(tagged("PING", Some("42")), "\x01PING 42\x01");
        assert_eq!(tagged("version", None), "\x01version\x01");
        assert_eq!(tagged("VERSION", Some("")), "\x01VERSION\x01");
        assert_eq!(tagged("PING", Some("a\nb")), "\x01PING a\x10nb\x01");
    }
}
