//! Error types for the IRC client engine.
//!
//! This module defines error types for protocol-level errors,
//! line parsing failures, mode decoding issues and client lifecycle misuse.
//!
//! None of these are fatal to a running session: transport errors funnel
//! into disconnect and reconnect, parse errors drop the offending line.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Outgoing line exceeded the protocol limit (CRLF included).
    #[error("message too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Encoded length of the rejected line.
        actual: usize,
        /// The configured limit.
        limit: usize,
    },

    /// Unknown text encoding label.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Failed to parse an IRC line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing IRC lines.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Command was missing or not letters / a three-digit numeric.
    #[error("invalid command")]
    InvalidCommand,

    /// Not enough arguments for command.
    #[error("not enough arguments: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments.
        got: usize,
    },

    /// Invalid subcommand for a command.
    #[error("invalid {cmd} subcommand: {sub}")]
    InvalidSubcommand {
        /// The parent command name.
        cmd: &'static str,
        /// The invalid subcommand.
        sub: String,
    },

    /// Invalid message prefix.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
}

/// Errors encountered when decoding mode strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModeParseError {
    /// Invalid mode modifier character (not + or -).
    #[error("invalid mode modifier: {modifier}")]
    InvalidModeModifier {
        /// The invalid modifier character.
        modifier: char,
    },

    /// Missing mode modifier (+ or -).
    #[error("missing mode modifier")]
    MissingModeModifier,
}

/// Errors surfaced by the client command and lifecycle API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// `reconnect` was called before any `connect`.
    #[error("no previous session to reconnect")]
    NoSession,

    /// Protocol-level failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A command argument was rejected before sending.
    #[error(transparent)]
    Parse(#[from] MessageParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 600,
            limit: 512,
        };
        assert_eq!(format!("{}", err), "message too long: 600 bytes (limit 512)");

        let err = MessageParseError::NotEnoughArguments {
            expected: 2,
            got: 1,
        };
        assert_eq!(
            format!("{}", err),
            "not enough arguments: expected 2, got 1"
        );

        let err = MessageParseError::InvalidSubcommand {
            cmd: "CAP",
            sub: "NAK".to_string(),
        };
        assert_eq!(format!("{}", err), "invalid CAP subcommand: NAK");
    }

    #[test]
    fn test_protocol_error_chaining() {
        let parse_err = MessageParseError::InvalidCommand;
        let protocol_err = ProtocolError::InvalidMessage {
            string: "!!!".to_string(),
            cause: parse_err.clone(),
        };

        let source = std::error::Error::source(&protocol_err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), parse_err.to_string());
    }

    #[test]
    fn test_client_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let err: ClientError = ProtocolError::from(io_err).into();
        assert!(matches!(err, ClientError::Protocol(ProtocolError::Io(_))));
        assert_eq!(err.to_string(), "io error: connection reset");
    }
}
