//! # slirc-client
//!
//! An IRC client protocol engine for long-running bots.
//!
//! ## Features
//!
//! - Line framing with a configurable wire encoding
//! - Message parsing and numeric-to-name translation
//! - ISUPPORT negotiation (`PREFIX`, `CHANMODES`, `TARGMAX`, ...)
//! - CTCP de-quoting and channel mode decomposition
//! - Channel and member state kept current from JOIN/WHO/WHOX/MODE traffic
//! - A rate-limited outbound queue with word-aware message splitting
//! - Optional Tokio session with idle detection and automatic reconnect

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing lines
//!
//! ```rust
//! use slirc_client::{event::translate, Message};
//!
//! let msg: Message = ":alice!a@host PRIVMSG #rust :\x01ACTION waves\x01"
//!     .parse()
//!     .expect("valid line");
//! let kinds: Vec<String> = translate(&msg).into_iter().map(|e| e.kind).collect();
//! assert_eq!(kinds, ["ctcp", "action"]);
//! ```
//!
//! ### Server features
//!
//! ```rust
//! use slirc_client::FeatureSet;
//!
//! let mut features = FeatureSet::new();
//! features.load(&["bot", "PREFIX=(qov)~@+", "CHANTYPES=#&", "are supported"]);
//! assert_eq!(features.prefix().mode_for('~'), Some('q'));
//! assert_eq!(features.chantypes(), Some("#&"));
//! ```
//!
//! ### Running a session
//!
//! See [`Client`] (requires the `tokio` feature).

pub mod casemap;
pub mod command;
pub mod config;
pub mod ctcp;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod isupport;
pub mod line;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod response;
pub mod split;
pub mod state;
pub mod util;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod client;

pub use self::casemap::{irc_eq, irc_to_lower, CaseMapping};
pub use self::command::{CapSubCommand, Command};
pub use self::config::{ClientConfig, ConnectParams};
pub use self::ctcp::CtcpSegment;
pub use self::dispatch::{Dispatcher, HandlerId, HandlerResult, Priority};
pub use self::error::{ClientError, MessageParseError, ModeParseError, ProtocolError};
pub use self::event::Event;
pub use self::isupport::{ChanModes, FeatureSet, FeatureValue, PrefixMap};
pub use self::line::LineFramer;
pub use self::message::Message;
pub use self::mode::{decode_mode_changes, ModeArg, ModeChange};
pub use self::prefix::Prefix;
pub use self::response::Response;
pub use self::split::split_message;
pub use self::state::{Channel, ChannelMap, ConnectionState, User};

#[cfg(feature = "tokio")]
pub use self::client::{Client, OutboundQueue};
