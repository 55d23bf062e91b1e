//! Per-channel member record.

use crate::isupport::PrefixMap;

/// A channel member as seen in WHO replies and MODE changes.
///
/// The `status` field is the raw WHO flags string (`H@`, `G+`, ...). The
/// derived `away` / `op` / `voiced` booleans are recomputed whenever it
/// changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Nickname, case as sent by the server.
    pub nickname: String,
    /// Username (ident).
    pub username: String,
    /// Hostname.
    pub host: String,
    /// Real name / GECOS.
    pub realname: String,
    /// Server the user is connected to.
    pub server: String,
    /// Services account, when known.
    pub account: Option<String>,
    status: String,
    away: bool,
    op: bool,
    voiced: bool,
}

impl User {
    /// A record with only a nickname.
    pub fn new(nickname: impl Into<String>) -> Self {
        User {
            nickname: nickname.into(),
            ..Default::default()
        }
    }

    /// Raw WHO status flags.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the status flags and recompute the derived booleans.
    pub fn set_status(&mut self, status: &str, prefixes: &PrefixMap) {
        self.status = status.to_owned();
        self.recompute(prefixes);
    }

    /// Add or remove a status prefix character (`@`, `+`, ...).
    pub fn modify_prefix(&mut self, prefix: char, add: bool, prefixes: &PrefixMap) {
        if add {
            if !self.status.contains(prefix) {
                self.status.push(prefix);
            }
        } else {
            self.status.retain(|c| c != prefix);
        }
        self.recompute(prefixes);
    }

    fn recompute(&mut self, prefixes: &PrefixMap) {
        self.away = self.status.contains('G');
        self.op = self
            .status
            .chars()
            .any(|c| c != '+' && prefixes.is_prefix(c));
        self.voiced = self.status.contains('+') && prefixes.is_prefix('+');
    }

    /// Marked away (`G`).
    pub fn is_away(&self) -> bool {
        self.away
    }

    /// Holds any status above voice.
    pub fn is_op(&self) -> bool {
        self.op
    }

    /// Holds voice (`+`).
    pub fn is_voiced(&self) -> bool {
        self.voiced
    }

    /// Voiced, or an operator when `op_counts` is set.
    pub fn can_speak(&self, op_counts: bool) -> bool {
        self.voiced || (op_counts && self.op)
    }
}
