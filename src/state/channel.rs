//! Joined channel record.

use std::collections::HashMap;

use super::User;

/// A channel the client has joined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    /// Channel name, including its type prefix.
    pub name: String,
    /// Current topic; empty when unset.
    pub topic: String,
    /// Channel mode string, when known.
    pub modes: String,
    users: HashMap<String, User>,
    bans: Vec<String>,
}

impl Channel {
    /// An empty channel.
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up a member by nickname.
    pub fn user(&self, nick: &str) -> Option<&User> {
        self.users.get(nick)
    }

    /// Mutable member lookup.
    pub fn user_mut(&mut self, nick: &str) -> Option<&mut User> {
        self.users.get_mut(nick)
    }

    /// Whether `nick` is a member.
    pub fn has_user(&self, nick: &str) -> bool {
        self.users.contains_key(nick)
    }

    /// Insert or replace a member.
    pub fn add_user(&mut self, user: User) {
        self.users.insert(user.nickname.clone(), user);
    }

    /// Merge a plain WHO reply: an existing member only gets its server
    /// refreshed, an unknown one is inserted whole.
    pub fn merge_user(&mut self, user: User) {
        match self.users.get_mut(&user.nickname) {
            Some(existing) => existing.server = user.server,
            None => self.add_user(user),
        }
    }

    /// Re-key a member. Returns `false` if `old` is not present.
    pub fn rename_user(&mut self, old: &str, new: &str) -> bool {
        match self.users.remove(old) {
            Some(mut user) => {
                user.nickname = new.to_owned();
                self.users.insert(new.to_owned(), user);
                true
            }
            None => false,
        }
    }

    /// Remove a member, returning its record.
    pub fn remove_user(&mut self, nick: &str) -> Option<User> {
        self.users.remove(nick)
    }

    /// Iterate over members in arbitrary order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    /// Mutable iteration over members.
    pub fn users_mut(&mut self) -> impl Iterator<Item = &mut User> {
        self.users.values_mut()
    }

    /// Number of tracked members.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Add a ban mask unless already listed.
    pub fn add_ban(&mut self, mask: &str) {
        if !self.bans.iter().any(|b| b == mask) {
            self.bans.push(mask.to_owned());
        }
    }

    /// Remove a ban mask if listed.
    pub fn remove_ban(&mut self, mask: &str) {
        self.bans.retain(|b| b != mask);
    }

    /// Known ban masks.
    pub fn bans(&self) -> &[String] {
        &self.bans
    }
}
