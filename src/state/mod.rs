//! Sans-IO session state.
//!
//! This module holds the in-memory model the built-in handlers maintain:
//! joined channels, their members and ban lists, plus the connection
//! lifecycle state. Nothing here performs I/O; the client feeds it from
//! parsed events.
//!
//! Lookups return `Option` rather than failing. The server does not
//! guarantee the client's view is in sync, so a miss is a normal outcome.

mod channel;
mod user;

use std::collections::{HashMap, VecDeque};

use crate::casemap::irc_eq;

pub use self::channel::Channel;
pub use self::user::User;

/// Lifecycle of a single session.
///
/// `Disconnected` is both the start and the terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No transport.
    #[default]
    Disconnected,
    /// Establishing the transport.
    Connecting,
    /// Transport up, USER/NICK sent, awaiting welcome (001).
    Registering,
    /// Received 001.
    Active,
    /// QUIT sent, flushing and closing.
    Disconnecting,
}

impl ConnectionState {
    /// Whether a transport is attached (registering or active).
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Registering | ConnectionState::Active)
    }
}

/// A WHO query awaiting its end-of-WHO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWho {
    /// Channel the replies belong to.
    pub channel: String,
    /// What was queried: the channel itself or a nickname.
    pub target: String,
}

/// All joined channels, keyed by name as sent by the server.
#[derive(Clone, Debug, Default)]
pub struct ChannelMap {
    channels: HashMap<String, Channel>,
    pending_who: VecDeque<PendingWho>,
}

impl ChannelMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a channel, replacing any stale record.
    pub fn create(&mut self, name: &str) -> &mut Channel {
        let channel = self.channels.entry(name.to_owned()).or_default();
        *channel = Channel::new(name);
        channel
    }

    /// Tracked channel, created if absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut Channel {
        self.channels
            .entry(name.to_owned())
            .or_insert_with(|| Channel::new(name))
    }

    /// Look up a channel.
    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    /// Mutable channel lookup.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    /// Stop tracking a channel.
    pub fn remove(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(name)
    }

    /// Forget everything, pending WHO queries included.
    pub fn clear(&mut self) {
        self.channels.clear();
        self.pending_who.clear();
    }

    /// Names of tracked channels, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Iterate over tracked channels.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// Number of tracked channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is tracked.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Look up a member of a specific channel.
    pub fn find_user(&self, channel: &str, nick: &str) -> Option<&User> {
        self.channels.get(channel)?.user(nick)
    }

    /// First record for `nick` found in any channel.
    pub fn find_user_anywhere(&self, nick: &str) -> Option<&User> {
        self.channels.values().find_map(|c| c.user(nick))
    }

    /// Rename `old` to `new` in every channel containing it.
    pub fn rename_everywhere(&mut self, old: &str, new: &str) {
        for channel in self.channels.values_mut() {
            channel.rename_user(old, new);
        }
    }

    /// Remove `nick` from every channel.
    pub fn remove_everywhere(&mut self, nick: &str) {
        for channel in self.channels.values_mut() {
            channel.remove_user(nick);
        }
    }

    /// Set the account on every record of `nick`.
    pub fn set_account_everywhere(&mut self, nick: &str, account: &str) {
        for channel in self.channels.values_mut() {
            if let Some(user) = channel.user_mut(nick) {
                user.account = Some(account.to_owned());
            }
        }
    }

    /// Remember a WHO query so its replies can be attributed.
    pub fn push_pending_who(&mut self, channel: &str, target: &str) {
        self.pending_who.push_back(PendingWho {
            channel: channel.to_owned(),
            target: target.to_owned(),
        });
    }

    /// The oldest outstanding WHO query.
    pub fn pending_who(&self) -> Option<&PendingWho> {
        self.pending_who.front()
    }

    /// The oldest outstanding WHO query a reply belongs to.
    ///
    /// A reply matches when the query named its channel, or named the
    /// nickname the reply describes.
    pub fn pending_who_for(&self, channel: &str, nick: &str) -> Option<&PendingWho> {
        self.pending_who
            .iter()
            .find(|p| irc_eq(&p.target, channel) || irc_eq(&p.target, nick))
    }

    /// Retire the oldest outstanding WHO query for `mask`.
    ///
    /// An end-of-WHO for a query we never issued leaves the queue alone.
    pub fn finish_who(&mut self, mask: &str) -> Option<PendingWho> {
        let index = self
            .pending_who
            .iter()
            .position(|p| irc_eq(&p.target, mask))?;
        self.pending_who.remove(index)
    }
}
