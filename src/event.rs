//! Events: the unit of dispatch.
//!
//! Every parsed line becomes one or more [`Event`]s named after its
//! command (numerics translated through [`crate::response`]). PRIVMSG and
//! NOTICE bodies are additionally split into text and CTCP parts, and the
//! event kind is refined by target:
//!
//! | line                      | kind(s)                          |
//! |---------------------------|----------------------------------|
//! | `PRIVMSG #chan :hi`       | `pubmsg`                         |
//! | `PRIVMSG me :hi`          | `privmsg`                        |
//! | `NOTICE #chan :hi`        | `pubnotice`                      |
//! | `NOTICE me :hi`           | `privnotice`                     |
//! | `PRIVMSG x :\x01VERSION\x01` | `ctcp`                        |
//! | `NOTICE x :\x01VERSION 1\x01` | `ctcpreply`                  |
//! | `PRIVMSG x :\x01ACTION y\x01` | `ctcp`, then `action`        |
//! | `MODE me +i`              | `umode`                          |

use crate::ctcp::{self, CtcpSegment};
use crate::message::Message;
use crate::prefix::Prefix;
use crate::util::is_channel;

/// Synthesized after the transport is established.
pub const CONNECT: &str = "connect";
/// Synthesized when the session is torn down by [`disconnect`].
///
/// [`disconnect`]: crate::client::Client::disconnect
pub const DISCONNECT: &str = "disconnect";
/// Synthesized for every received line before it is parsed.
pub const ALL_RAW_MESSAGES: &str = "all_raw_messages";

/// A dispatched event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Event type name (`pubmsg`, `join`, `welcome`, ...).
    pub kind: String,
    /// Who sent it.
    pub source: Option<Prefix>,
    /// The first parameter for most commands; `None` for `quit` and
    /// synthesized lifecycle events.
    pub target: Option<String>,
    /// Remaining parameters.
    pub args: Vec<String>,
}

impl Event {
    /// Build an event.
    pub fn new(
        kind: impl Into<String>,
        source: Option<Prefix>,
        target: Option<String>,
        args: Vec<String>,
    ) -> Self {
        Event {
            kind: kind.into(),
            source,
            target,
            args,
        }
    }

    /// The `connect` lifecycle event.
    pub fn connect() -> Self {
        Event::new(CONNECT, None, None, Vec::new())
    }

    /// The `disconnect` lifecycle event.
    pub fn disconnect(server: &str, reason: &str) -> Self {
        Event::new(
            DISCONNECT,
            Some(Prefix::ServerName(server.to_owned())),
            None,
            vec![reason.to_owned()],
        )
    }

    /// The `all_raw_messages` diagnostic event.
    pub fn raw(server: &str, line: &str) -> Self {
        Event::new(
            ALL_RAW_MESSAGES,
            Some(Prefix::ServerName(server.to_owned())),
            None,
            vec![line.to_owned()],
        )
    }

    /// Nickname of the sender, if it is a user.
    pub fn source_nick(&self) -> Option<&str> {
        self.source.as_ref().and_then(Prefix::nick)
    }

    /// The target parameter, or `""`.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or_default()
    }

    /// Argument `i`, if present.
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// Whether this is a message-like event (`pubmsg`, `ctcp`, ...).
    pub fn is_message(&self) -> bool {
        matches!(
            self.kind.as_str(),
            "privmsg" | "pubmsg" | "privnotice" | "pubnotice" | "ctcp" | "ctcpreply" | "action"
        )
    }

    /// Where a reply should go: the channel for channel traffic, the
    /// sender's nick for private traffic. `None` for other events.
    pub fn reply_target(&self) -> Option<&str> {
        if !self.is_message() {
            return None;
        }
        match self.target.as_deref() {
            Some(target) if is_channel(target) => Some(target),
            _ => self.source.as_ref().map(Prefix::name),
        }
    }

    /// Whitespace-split words of the first argument.
    pub fn words(&self) -> Vec<&str> {
        self.arg(0)
            .map(|text| text.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Translate a parsed line into the events it produces.
///
/// A PRIVMSG or NOTICE without both a target and a body produces nothing.
pub fn translate(msg: &Message) -> Vec<Event> {
    let command = msg.event_name();
    let source = msg.prefix.clone();
    let params = &msg.params;

    match command.as_str() {
        "privmsg" | "notice" => {
            let (Some(target), Some(body)) = (params.first(), params.get(1)) else {
                return Vec::new();
            };
            message_events(&command, source, target, body)
        }
        "quit" => {
            let args = params.first().cloned().into_iter().collect();
            vec![Event::new(command, source, None, args)]
        }
        "ping" => vec![Event::new(command, source, params.first().cloned(), params.clone())],
        _ => {
            let target = params.first().cloned();
            let args = params.iter().skip(1).cloned().collect();
            let kind = match target.as_deref() {
                Some(t) if command == "mode" && !is_channel(t) => "umode".to_owned(),
                _ => command,
            };
            vec![Event::new(kind, source, target, args)]
        }
    }
}

fn message_events(command: &str, source: Option<Prefix>, target: &str, body: &str) -> Vec<Event> {
    let is_privmsg = command == "privmsg";
    let text_kind = match (is_privmsg, is_channel(target)) {
        (true, true) => "pubmsg",
        (true, false) => "privmsg",
        (false, true) => "pubnotice",
        (false, false) => "privnotice",
    };

    let mut events = Vec::new();
    for segment in ctcp::dequote(body) {
        match segment {
            CtcpSegment::Text(text) => {
                events.push(Event::new(
                    text_kind,
                    source.clone(),
                    Some(target.to_owned()),
                    vec![text],
                ));
            }
            CtcpSegment::Tagged { tag, data } => {
                let kind = if is_privmsg { "ctcp" } else { "ctcpreply" };
                let is_action = is_privmsg && tag == "ACTION";

                let mut args = vec![tag];
                args.extend(data);
                let action_args = args[1..].to_vec();

                events.push(Event::new(kind, source.clone(), Some(target.to_owned()), args));
                if is_action {
                    events.push(Event::new(
                        "action",
                        source.clone(),
                        Some(target.to_owned()),
                        action_args,
                    ));
                }
            }
        }
    }
    events
}
