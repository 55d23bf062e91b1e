//! IRC case-mapping functions.
//!
//! The engine keys channel members case-as-sent. Applications that compare
//! nicknames or channel names should go through these helpers, which
//! implement the `rfc1459` mapping (the server default) and plain `ascii`.

/// A case mapping advertised through ISUPPORT `CASEMAPPING`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaseMapping {
    /// `A-Z` only.
    Ascii,
    /// `A-Z` plus `[]\~` → `{}|^`.
    #[default]
    Rfc1459,
}

impl CaseMapping {
    /// Map a `CASEMAPPING` token; unknown names fall back to `rfc1459`.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("ascii") => CaseMapping::Ascii,
            _ => CaseMapping::Rfc1459,
        }
    }

    /// Lowercase one character.
    #[inline]
    pub fn fold(self, c: char) -> char {
        match (self, c) {
            (CaseMapping::Rfc1459, '[') => '{',
            (CaseMapping::Rfc1459, ']') => '}',
            (CaseMapping::Rfc1459, '\\') => '|',
            (CaseMapping::Rfc1459, '~') => '^',
            (_, 'A'..='Z') => c.to_ascii_lowercase(),
            _ => c,
        }
    }

    /// Lowercase a string.
    pub fn to_lower(self, s: &str) -> String {
        s.chars().map(|c| self.fold(c)).collect()
    }

    /// Case-insensitive equality under this mapping.
    pub fn equals(self, a: &str, b: &str) -> bool {
        a.len() == b.len() && a.chars().zip(b.chars()).all(|(x, y)| self.fold(x) == self.fold(y))
    }
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    CaseMapping::Rfc1459.to_lower(s)
}

/// Compare two strings using RFC 1459 case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    CaseMapping::Rfc1459.equals(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc1459() {
        assert_eq!(irc_to_lower("Nick[Away]\\~"), "nick{away}|^");
        assert!(irc_eq("FOO[1]", "foo{1}"));
        assert!(!irc_eq("foo", "fooo"));
    }

    #[test]
    fn test_ascii() {
        let map = CaseMapping::from_token(Some("ascii"));
        assert_eq!(map, CaseMapping::Ascii);
        assert!(!map.equals("a[", "a{"));
        assert!(map.equals("ABC", "abc"));
        assert_eq!(CaseMapping::from_token(None), CaseMapping::Rfc1459);
    }
}
