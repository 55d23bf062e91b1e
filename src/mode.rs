//! MODE argument decoding.
//!
//! A MODE line packs several changes into one mode string followed by
//! their arguments: `+ol-v alice 10 bob`. [`decode_mode_changes`] walks
//! the string and pairs each letter with its argument, consulting the
//! negotiated [`FeatureSet`] for which letters take one.

use std::fmt;

use crate::error::ModeParseError;
use crate::isupport::FeatureSet;

enum PlusMinus {
    Plus,
    Minus,
}

/// A mode argument, coerced to an integer when it parses as one.
///
/// Coercion only happens when the integer prints back to the same text,
/// so `Display` always reproduces the argument as sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Numeric argument such as a user limit.
    Int(i64),
    /// Anything else: a nickname, mask or key.
    Text(String),
}

impl ModeArg {
    fn coerce(arg: &str) -> Self {
        match arg.parse::<i64>() {
            Ok(n) if n.to_string() == arg => ModeArg::Int(n),
            _ => ModeArg::Text(arg.to_owned()),
        }
    }

    /// The argument as text; `None` for integers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ModeArg::Text(s) => Some(s),
            ModeArg::Int(_) => None,
        }
    }
}

impl fmt::Display for ModeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeArg::Int(n) => write!(f, "{}", n),
            ModeArg::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ModeArg {
    fn from(n: i64) -> Self {
        ModeArg::Int(n)
    }
}

impl From<&str> for ModeArg {
    fn from(s: &str) -> Self {
        ModeArg::Text(s.to_owned())
    }
}

/// One discrete mode change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub adding: bool,
    /// The mode letter.
    pub mode: char,
    /// The consumed argument, if the letter takes one.
    pub arg: Option<ModeArg>,
}

impl ModeChange {
    /// Build a change.
    pub fn new(adding: bool, mode: char, arg: Option<ModeArg>) -> Self {
        ModeChange { adding, mode, arg }
    }

    /// The signed letter, e.g. `"+o"`.
    pub fn flag(&self) -> String {
        format!("{}{}", if self.adding { '+' } else { '-' }, self.mode)
    }
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag())?;
        if let Some(arg) = &self.arg {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Expand `[modestring, arg...]` into discrete changes.
///
/// A letter that needs an argument when none is left is skipped, which
/// covers list queries such as `MODE #chan +b`. Surplus arguments are
/// ignored. An empty argument list yields no changes.
pub fn decode_mode_changes<S: AsRef<str>>(
    args: &[S],
    features: &FeatureSet,
) -> Result<Vec<ModeChange>, ModeParseError> {
    use self::PlusMinus::*;

    let Some((first, rest)) = args.split_first() else {
        return Ok(Vec::new());
    };

    let mut modes = first.as_ref().chars();
    let mut cur_mod = match modes.next() {
        Some('+') => Plus,
        Some('-') => Minus,
        Some(modifier) => return Err(ModeParseError::InvalidModeModifier { modifier }),
        None => return Err(ModeParseError::MissingModeModifier),
    };

    let chanmodes = features.chanmodes();
    let prefix = features.prefix();
    let mut params = rest.iter().map(AsRef::as_ref);
    let mut res = Vec::new();

    for c in modes {
        match c {
            '+' => cur_mod = Plus,
            '-' => cur_mod = Minus,
            _ => {
                let takes_arg = prefix.is_mode(c)
                    || chanmodes.list.contains(c)
                    || chanmodes.always.contains(c)
                    || (matches!(cur_mod, Plus) && chanmodes.set_only.contains(c));

                let arg = if takes_arg {
                    match params.next() {
                        Some(arg) => Some(ModeArg::coerce(arg)),
                        None => continue,
                    }
                } else {
                    None
                };

                res.push(ModeChange::new(matches!(cur_mod, Plus), c, arg));
            }
        }
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(args: &[&str]) -> Vec<(String, Option<ModeArg>)> {
        decode_mode_changes(args, &FeatureSet::new())
            .unwrap()
            .into_iter()
            .map(|c| (c.flag(), c.arg))
            .collect()
    }

    #[test]
    fn test_multiple_ops() {
        assert_eq!(
            decode(&["+ooo", "a", "b", "c"]),
            vec![
                ("+o".into(), Some("a".into())),
                ("+o".into(), Some("b".into())),
                ("+o".into(), Some("c".into())),
            ]
        );
    }

    #[test]
    fn test_limit_is_coerced_to_int() {
        assert_eq!(
            decode(&["+sntl", "100"]),
            vec![
                ("+s".into(), None),
                ("+n".into(), None),
                ("+t".into(), None),
                ("+l".into(), Some(ModeArg::Int(100))),
            ]
        );
    }

    #[test]
    fn test_numeric_looking_nick_keeps_its_text() {
        assert_eq!(
            decode(&["+ol", "007", "+5"]),
            vec![
                ("+o".into(), Some("007".into())),
                ("+l".into(), Some("+5".into())),
            ]
        );
        assert_eq!(decode(&["+v", "42"]), vec![("+v".into(), Some(ModeArg::Int(42)))]);
    }

    #[test]
    fn test_set_only_mode_takes_no_arg_when_removed() {
        assert_eq!(
            decode(&["-l+v", "bob"]),
            vec![("-l".into(), None), ("+v".into(), Some("bob".into()))]
        );
    }

    #[test]
    fn test_ban_query_without_mask_is_skipped() {
        assert!(decode(&["+b"]).is_empty());
        assert_eq!(
            decode(&["+ib"]),
            vec![("+i".into(), None)]
        );
    }

    #[test]
    fn test_negotiated_classes() {
        let mut features = FeatureSet::new();
        features.load_feature("CHANMODES=beI,k,fl,imnpst");
        features.load_feature("PREFIX=(qaohv)~&@%+");

        let changes = decode_mode_changes(&["+qf-h", "alice", "10:5", "bob"], &features).unwrap();
        assert_eq!(
            changes,
            vec![
                ModeChange::new(true, 'q', Some("alice".into())),
                ModeChange::new(true, 'f', Some("10:5".into())),
                ModeChange::new(false, 'h', Some("bob".into())),
            ]
        );
    }

    #[test]
    fn test_invalid_modifier() {
        let features = FeatureSet::new();
        assert_eq!(
            decode_mode_changes(&["o", "alice"], &features),
            Err(ModeParseError::InvalidModeModifier { modifier: 'o' })
        );
        assert_eq!(
            decode_mode_changes(&[""], &features),
            Err(ModeParseError::MissingModeModifier)
        );
        assert_eq!(decode_mode_changes::<&str>(&[], &features), Ok(Vec::new()));
    }

    #[test]
    fn test_display() {
        let change = ModeChange::new(false, 'b', Some("*!*@spam".into()));
        assert_eq!(change.to_string(), "-b *!*@spam");
        assert_eq!(ModeChange::new(true, 'l', Some(ModeArg::Int(5))).to_string(), "+l 5");
    }
}
