//! Nom-based IRC line parser.
//!
//! Grammar accepted here:
//!
//! ```text
//! [@tags SP] [:prefix SP+] command *(SP+ middle) [SP+ :trailing]
//! command = 1*letter / 3digit
//! ```
//!
//! Anything else is rejected so the caller can drop the line.

use nom::{
    branch::alt,
    bytes::complete::{take_till1, take_while1, take_while_m_n},
    character::complete::{alpha1, char, space0, space1},
    combinator::{eof, opt, peek, recognize},
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::MessageParseError;
use crate::prefix::Prefix;
use crate::response;

use super::Message;

fn parse_tags(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char('@'), take_till1(|c: char| c == ' ')), space1)(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char(':'), take_till1(|c: char| c == ' ')), space1)(input)
}

fn parse_numeric(input: &str) -> IResult<&str, &str> {
    recognize(take_while_m_n(3, 3, |c: char| c.is_ascii_digit()))(input)
}

/// A command is letters or exactly three digits, followed by a space or the end.
fn parse_command(input: &str) -> IResult<&str, &str> {
    terminated(
        alt((alpha1, parse_numeric)),
        peek(alt((eof, take_while1(|c: char| c == ' ')))),
    )(input)
}

fn parse_params(mut rest: &str) -> Vec<String> {
    let mut params = Vec::new();
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }
        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing.to_owned());
            break;
        }
        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(rest[..end].to_owned());
        rest = &rest[end..];
    }
    params
}

/// Numerics only come from servers, so a bare name there is a server
/// even without a dot in it.
fn source(prefix: &str, numeric: bool) -> Prefix {
    match Prefix::new_from_str(prefix) {
        Prefix::Nickname(name, user, host) if numeric && user.is_empty() && host.is_empty() => {
            Prefix::ServerName(name)
        }
        other => other,
    }
}

/// Parse one IRC line (CR/LF already stripped).
pub fn parse_line(line: &str) -> Result<Message, MessageParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let (input, tags) =
        opt(parse_tags)(line).map_err(|_| MessageParseError::InvalidCommand)?;
    let (input, prefix) =
        opt(parse_prefix)(input).map_err(|_| MessageParseError::InvalidCommand)?;
    if input.starts_with(':') {
        return Err(MessageParseError::InvalidPrefix(input.to_owned()));
    }
    let (input, _) = space0::<_, nom::error::Error<&str>>(input)
        .map_err(|_| MessageParseError::InvalidCommand)?;
    let (rest, command) = parse_command(input).map_err(|_| MessageParseError::InvalidCommand)?;

    let numeric = response::is_numeric(command);
    Ok(Message {
        tags: tags.map(str::to_owned),
        prefix: prefix.map(|p| source(p, numeric)),
        command: command.to_owned(),
        params: parse_params(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_with_prefix() {
        let msg = parse_line(":nick!user@host PRIVMSG #chan :hello world").unwrap();
        assert_eq!(msg.prefix, Some(Prefix::new("nick", "user", "host")));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#chan", "hello world"]);
    }

    #[test]
    fn test_numeric_without_prefix() {
        let msg = parse_line("001 bot :Welcome").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params, vec!["bot", "Welcome"]);
    }

    #[test]
    fn test_dotless_server_on_numeric() {
        let msg = parse_line(":localhost 001 bot :hi").unwrap();
        assert_eq!(msg.prefix, Some(Prefix::ServerName("localhost".into())));

        let msg = parse_line(":alice NOTICE bot :hi").unwrap();
        assert_eq!(msg.prefix, Some(Prefix::new("alice", "", "")));
    }

    #[test]
    fn test_middle_params_and_no_trailing() {
        let msg = parse_line(":srv MODE #chan +ov alice bob").unwrap();
        assert_eq!(msg.params, vec!["#chan", "+ov", "alice", "bob"]);
    }

    #[test]
    fn test_repeated_spaces_are_collapsed() {
        let msg = parse_line(":srv  PING   token").unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["token"]);
    }

    #[test]
    fn test_trailing_may_be_empty_or_contain_colons() {
        let msg = parse_line("PRIVMSG #c :").unwrap();
        assert_eq!(msg.params, vec!["#c", ""]);

        let msg = parse_line("PRIVMSG #c ::) a:b").unwrap();
        assert_eq!(msg.params, vec!["#c", ":) a:b"]);
    }

    #[test]
    fn test_tags_are_kept_raw() {
        let msg = parse_line("@time=2023-01-01T00:00:00Z :n!u@h PRIVMSG #c :x").unwrap();
        assert_eq!(msg.tags.as_deref(), Some("time=2023-01-01T00:00:00Z"));
        assert_eq!(msg.command, "PRIVMSG");
    }

    #[test]
    fn test_rejects_bad_commands() {
        assert_eq!(parse_line(""), Err(MessageParseError::EmptyMessage));
        assert_eq!(parse_line("   "), Err(MessageParseError::EmptyMessage));
        assert_eq!(
            parse_line(":prefix-only"),
            Err(MessageParseError::InvalidPrefix(":prefix-only".to_string()))
        );
        assert_eq!(parse_line("0012 x"), Err(MessageParseError::InvalidCommand));
        assert_eq!(parse_line("PRIV#MSG x"), Err(MessageParseError::InvalidCommand));
        assert_eq!(parse_line("12 x"), Err(MessageParseError::InvalidCommand));
    }
}
