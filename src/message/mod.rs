//! IRC line representation and parsing.

mod parse;

pub use self::parse::parse_line;

use std::fmt;
use std::str::FromStr;

use crate::error::MessageParseError;
use crate::prefix::Prefix;
use crate::response;

/// One parsed protocol line: `[@tags] [:prefix] command [params...] [:trailing]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Raw IRCv3 tag section without the leading `@`, if the server sent one.
    pub tags: Option<String>,
    /// Message source.
    pub prefix: Option<Prefix>,
    /// Command token exactly as received (`PRIVMSG`, `001`, ...).
    pub command: String,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<String>,
}

impl Message {
    /// Parse a single line (without its CRLF terminator).
    pub fn parse(line: &str) -> Result<Self, MessageParseError> {
        parse_line(line)
    }

    /// The event name for this line's command (numerics translated, words lowercased).
    pub fn event_name(&self) -> String {
        response::event_name(&self.command)
    }

    /// Whether the command is a three-digit numeric.
    pub fn is_numeric(&self) -> bool {
        response::is_numeric(&self.command)
    }

    /// Nickname of the source, if the prefix is a user mask.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tags) = &self.tags {
            write!(f, "@{} ", tags)?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;
        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {}", param)?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let raw = ":nick!user@host PRIVMSG #chan :hello world";
        let msg: Message = raw.parse().unwrap();
        assert_eq!(msg.to_string(), raw);
    }

    #[test]
    fn test_event_name() {
        let msg: Message = ":srv 001 bot :Welcome".parse().unwrap();
        assert!(msg.is_numeric());
        assert_eq!(msg.event_name(), "welcome");
        assert_eq!(msg.source_nickname(), None);
    }
}
