//! ISUPPORT (numeric 005) feature negotiation.
//!
//! [`FeatureSet`] stores every advertised capability under its lower-cased
//! name. Well-known names get typed values (`PREFIX`, `CHANMODES`,
//! `TARGMAX`, `CHANLIMIT`, `MAXLIST`); everything else is an integer when
//! the value is all digits, a string otherwise, or a bare flag.
//!
//! # Reference
//! - <https://modern.ircdocs.horse/#rplisupport-parameters>
//!
//! # Example
//!
//! ```
//! use slirc_client::isupport::FeatureSet;
//!
//! let mut features = FeatureSet::new();
//! features.load(&["bot", "PREFIX=(qov)~@+", "NETWORK=Libera", "are supported"]);
//! assert_eq!(features.prefix().mode_for('~'), Some('q'));
//! assert_eq!(features.network(), Some("Libera"));
//! ```

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RFC 1459 channel mode classes, used until the server sends `CHANMODES`.
const RFC1459_CHANMODES: [&str; 4] = ["b", "k", "l", "imnpst"];

/// A typed capability value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeatureValue {
    /// Present without a value (`WHOX`, `EXCEPTS`, `NAME=`).
    Flag,
    /// All-digit value.
    Int(u64),
    /// Any other value, verbatim.
    Str(String),
    /// `PREFIX`.
    Prefix(PrefixMap),
    /// `CHANMODES`.
    ChanModes(ChanModes),
    /// `TARGMAX`: command name to optional target limit.
    TargMax(Vec<(String, Option<u32>)>),
    /// `CHANLIMIT` / `MAXLIST`: one entry per letter.
    Limits(HashMap<char, u32>),
}

/// Association between status prefix characters and their mode letters,
/// highest rank first.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrefixMap {
    entries: Vec<(char, char)>,
}

impl PrefixMap {
    /// Parse `(modes)prefixes`, zipping positionally.
    ///
    /// Returns `None` when the parentheses are missing.
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix('(')?;
        let (modes, prefixes) = rest.split_once(')')?;
        Some(PrefixMap {
            entries: prefixes.chars().zip(modes.chars()).collect(),
        })
    }

    /// The mode letter for a prefix character (`'@'` → `'o'`).
    pub fn mode_for(&self, prefix: char) -> Option<char> {
        self.entries
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, m)| *m)
    }

    /// The prefix character for a mode letter (`'o'` → `'@'`).
    pub fn prefix_for(&self, mode: char) -> Option<char> {
        self.entries
            .iter()
            .find(|(_, m)| *m == mode)
            .map(|(p, _)| *p)
    }

    /// Whether `c` is a status prefix character.
    pub fn is_prefix(&self, c: char) -> bool {
        self.mode_for(c).is_some()
    }

    /// Whether `c` is a status mode letter.
    pub fn is_mode(&self, c: char) -> bool {
        self.prefix_for(c).is_some()
    }

    /// All mode letters, highest rank first.
    pub fn modes(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().map(|(_, m)| *m)
    }

    /// `(prefix, mode)` pairs, highest rank first.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of status levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PrefixMap {
    fn default() -> Self {
        PrefixMap {
            entries: vec![('@', 'o'), ('+', 'v')],
        }
    }
}

/// The four `CHANMODES` classes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChanModes {
    /// Type A: list modes, always take an argument (`b`, `e`, `I`).
    pub list: String,
    /// Type B: always take an argument (`k`).
    pub always: String,
    /// Type C: take an argument only when set (`l`).
    pub set_only: String,
    /// Type D: never take an argument.
    pub never: String,
}

impl ChanModes {
    /// Split `a,b,c,d`. Missing classes are empty; extra ones are ignored.
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split(',').map(str::to_owned);
        ChanModes {
            list: parts.next().unwrap_or_default(),
            always: parts.next().unwrap_or_default(),
            set_only: parts.next().unwrap_or_default(),
            never: parts.next().unwrap_or_default(),
        }
    }

    fn rfc1459() -> Self {
        let [list, always, set_only, never] = RFC1459_CHANMODES.map(str::to_owned);
        ChanModes {
            list,
            always,
            set_only,
            never,
        }
    }
}

/// Capabilities advertised by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSet {
    features: HashMap<String, FeatureValue>,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureSet {
    /// A feature set holding only the RFC 1459 `PREFIX`.
    pub fn new() -> Self {
        let mut features = HashMap::new();
        features.insert(
            "prefix".to_owned(),
            FeatureValue::Prefix(PrefixMap::default()),
        );
        FeatureSet { features }
    }

    /// Load the parameters of a 005 reply.
    ///
    /// The first (target) and last (trailing text) parameters are skipped.
    pub fn load<S: AsRef<str>>(&mut self, params: &[S]) {
        if params.len() < 3 {
            return;
        }
        for token in &params[1..params.len() - 1] {
            self.load_feature(token.as_ref());
        }
    }

    /// Apply a single ISUPPORT token.
    pub fn load_feature(&mut self, token: &str) {
        if let Some(name) = token.strip_prefix('-') {
            self.remove(name);
            return;
        }

        let (name, value) = token.split_once('=').unwrap_or((token, ""));
        if name.is_empty() {
            return;
        }
        let key = name.to_ascii_lowercase();

        if value.is_empty() {
            let flag = if key == "prefix" {
                FeatureValue::Prefix(PrefixMap { entries: Vec::new() })
            } else {
                FeatureValue::Flag
            };
            self.features.insert(key, flag);
            return;
        }

        let parsed = match key.as_str() {
            "prefix" => match PrefixMap::parse(value) {
                Some(map) => FeatureValue::Prefix(map),
                None => {
                    tracing::warn!(value, "ignoring malformed PREFIX");
                    return;
                }
            },
            "chanmodes" => FeatureValue::ChanModes(ChanModes::parse(value)),
            "targmax" => FeatureValue::TargMax(parse_targmax(value)),
            "chanlimit" | "maxlist" => FeatureValue::Limits(parse_limits(value)),
            _ => parse_other(value),
        };
        tracing::debug!(feature = %key, ?parsed, "loaded feature");
        self.features.insert(key, parsed);
    }

    /// Drop a capability. Dropping `PREFIX` restores the RFC 1459 default.
    pub fn remove(&mut self, name: &str) {
        let key = name.to_ascii_lowercase();
        if key == "prefix" {
            self.features
                .insert(key, FeatureValue::Prefix(PrefixMap::default()));
        } else {
            self.features.remove(&key);
        }
    }

    /// Raw lookup by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(&name.to_ascii_lowercase())
    }

    /// Whether the capability is present at all.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Integer value of a capability.
    pub fn int(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            FeatureValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// String value of a capability.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FeatureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The status prefix map. Always present.
    pub fn prefix(&self) -> &PrefixMap {
        static RFC1459: std::sync::OnceLock<PrefixMap> = std::sync::OnceLock::new();
        match self.features.get("prefix") {
            Some(FeatureValue::Prefix(map)) => map,
            _ => RFC1459.get_or_init(PrefixMap::default),
        }
    }

    /// Channel mode classes, falling back to RFC 1459 before negotiation.
    pub fn chanmodes(&self) -> ChanModes {
        match self.features.get("chanmodes") {
            Some(FeatureValue::ChanModes(modes)) => modes.clone(),
            _ => ChanModes::rfc1459(),
        }
    }

    /// Target limit for `command`: `None` when not advertised,
    /// `Some(None)` when advertised without a limit.
    pub fn targmax(&self, command: &str) -> Option<Option<u32>> {
        match self.features.get("targmax")? {
            FeatureValue::TargMax(entries) => entries
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, limit)| *limit),
            _ => None,
        }
    }

    /// `CHANLIMIT` entry for a channel type character.
    pub fn chanlimit(&self, chantype: char) -> Option<u32> {
        self.limit("chanlimit", chantype)
    }

    /// `MAXLIST` entry for a list mode letter.
    pub fn maxlist(&self, mode: char) -> Option<u32> {
        self.limit("maxlist", mode)
    }

    fn limit(&self, key: &str, c: char) -> Option<u32> {
        match self.features.get(key)? {
            FeatureValue::Limits(map) => map.get(&c).copied(),
            _ => None,
        }
    }

    /// `CHANTYPES`, if advertised.
    pub fn chantypes(&self) -> Option<&str> {
        self.string("chantypes")
    }

    /// `NETWORK`, if advertised.
    pub fn network(&self) -> Option<&str> {
        self.string("network")
    }

    /// `CASEMAPPING`, if advertised.
    pub fn casemapping(&self) -> Option<&str> {
        self.string("casemapping")
    }

    /// Ban-exception mode letter; `e` when advertised without a value.
    pub fn excepts(&self) -> Option<char> {
        self.mode_letter("excepts", 'e')
    }

    /// Invite-exception mode letter; `I` when advertised without a value.
    pub fn invex(&self) -> Option<char> {
        self.mode_letter("invex", 'I')
    }

    fn mode_letter(&self, key: &str, default: char) -> Option<char> {
        match self.features.get(key)? {
            FeatureValue::Flag => Some(default),
            FeatureValue::Str(s) => s.chars().next(),
            _ => None,
        }
    }

    /// Whether the server supports WHOX.
    pub fn whox(&self) -> bool {
        self.has("whox")
    }
}

fn parse_targmax(value: &str) -> Vec<(String, Option<u32>)> {
    value
        .split(',')
        .filter_map(|pair| {
            let (name, limit) = pair.split_once(':')?;
            Some((name.to_owned(), limit.parse().ok()))
        })
        .collect()
}

fn parse_limits(value: &str) -> HashMap<char, u32> {
    let mut limits = HashMap::new();
    for group in value.split(',') {
        let Some((letters, limit)) = group.split_once(':') else {
            continue;
        };
        let Ok(limit) = limit.parse::<u32>() else {
            continue;
        };
        for c in letters.chars() {
            limits.insert(c, limit);
        }
    }
    limits
}

fn parse_other(value: &str) -> FeatureValue {
    if value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse() {
            return FeatureValue::Int(n);
        }
    }
    FeatureValue::Str(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        let features = FeatureSet::new();
        assert_eq!(features.prefix().mode_for('@'), Some('o'));
        assert_eq!(features.prefix().mode_for('+'), Some('v'));
        assert_eq!(features.prefix().len(), 2);
    }

    #[test]
    fn test_load_prefix() {
        let mut features = FeatureSet::new();
        features.load(&["target", "PREFIX=(ov)@+", "msg"]);
        let prefix = features.prefix();
        assert_eq!(prefix.iter().collect::<Vec<_>>(), vec![('@', 'o'), ('+', 'v')]);

        features.load(&["target", "PREFIX=(abc)+-/", "your message sir"]);
        assert_eq!(features.prefix().mode_for('+'), Some('a'));
        assert_eq!(features.prefix().mode_for('-'), Some('b'));
        assert_eq!(features.prefix().mode_for('/'), Some('c'));
    }

    #[test]
    fn test_chanlimit_expands_letters() {
        let mut features = FeatureSet::new();
        features.load_feature("CHANLIMIT=ibe:250,xyz:100");
        match features.get("chanlimit") {
            Some(FeatureValue::Limits(map)) => assert_eq!(map.len(), 6),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(features.chanlimit('x'), Some(100));
        assert_eq!(features.chanlimit('i'), Some(250));
        assert_eq!(features.chanlimit('b'), Some(250));
        assert_eq!(features.chanlimit('e'), Some(250));
    }

    #[test]
    fn test_maxlist() {
        let mut features = FeatureSet::new();
        features.load_feature("MAXLIST=beI:100");
        assert_eq!(features.maxlist('I'), Some(100));
        assert_eq!(features.maxlist('q'), None);
    }

    #[test]
    fn test_targmax() {
        let mut features = FeatureSet::new();
        features.load_feature("TARGMAX=a:3,c:,b:2");
        assert_eq!(features.targmax("a"), Some(Some(3)));
        assert_eq!(features.targmax("c"), Some(None));
        assert_eq!(features.targmax("B"), Some(Some(2)));
        assert_eq!(features.targmax("d"), None);
    }

    #[test]
    fn test_chanmodes() {
        let mut features = FeatureSet::new();
        assert_eq!(features.chanmodes().always, "k");

        features.load_feature("CHANMODES=beI,k,l,imnpst");
        let modes = features.chanmodes();
        assert_eq!(modes.list, "beI");
        assert_eq!(modes.set_only, "l");

        features.load_feature("CHANMODES=foo,bar,baz");
        let modes = features.chanmodes();
        assert_eq!(modes.set_only, "baz");
        assert_eq!(modes.never, "");
    }

    #[test]
    fn test_flags_ints_strings() {
        let mut features = FeatureSet::new();
        features.load(&[
            "bot",
            "WHOX",
            "NICKLEN=30",
            "NETWORK=Example",
            "EXCEPTS",
            "INVEX=J",
            "SAFELIST=",
            "are supported by this server",
        ]);
        assert!(features.whox());
        assert_eq!(features.int("nicklen"), Some(30));
        assert_eq!(features.network(), Some("Example"));
        assert_eq!(features.excepts(), Some('e'));
        assert_eq!(features.invex(), Some('J'));
        assert_eq!(features.get("SAFELIST"), Some(&FeatureValue::Flag));
        assert!(!features.has("are supported by this server"));
    }

    #[test]
    fn test_negation() {
        let mut features = FeatureSet::new();
        features.load_feature("WHOX");
        features.load_feature("-WHOX");
        assert!(!features.whox());

        features.load_feature("PREFIX=(qo)~@");
        features.load_feature("-PREFIX");
        assert_eq!(features.prefix(), &PrefixMap::default());
    }

    #[test]
    fn test_last_load_wins() {
        let mut features = FeatureSet::new();
        features.load_feature("MODES=3");
        features.load_feature("MODES=6");
        assert_eq!(features.int("MODES"), Some(6));
    }

    #[test]
    fn test_malformed_prefix_keeps_previous() {
        let mut features = FeatureSet::new();
        features.load_feature("PREFIX=@+");
        assert_eq!(features.prefix(), &PrefixMap::default());
    }

    #[test]
    fn test_empty_prefix_means_no_status() {
        let mut features = FeatureSet::new();
        features.load_feature("PREFIX=");
        assert!(features.prefix().is_empty());
    }

    #[test]
    fn test_short_load_is_ignored() {
        let mut features = FeatureSet::new();
        features.load(&["bot", "are supported"]);
        assert_eq!(features, FeatureSet::new());
    }
}
