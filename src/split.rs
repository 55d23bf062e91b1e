//! Word-aware splitting of long PRIVMSG/NOTICE bodies.
//!
//! The payload budget is measured in encoded bytes, not characters. Every
//! part except the last ends with [`CONTINUATION`].

use crate::util::truncate_utf8_safe;

/// Marker appended to every part that is continued on the next line.
pub const CONTINUATION: &str = " \u{2026}";

/// Default payload budget per physical line.
pub const DEFAULT_BUDGET: usize = 440;

/// Bytes available for the body of `COMMAND target :body` under `budget`.
pub fn body_budget(command: &str, target: &str, budget: usize) -> usize {
    budget.saturating_sub(command.len() + target.len() + 3)
}

/// Split `body` so that `COMMAND target :part` fits `budget` for every part.
///
/// A body that already fits is returned untouched. Otherwise words are
/// packed greedily, separated by single spaces; a word longer than a whole
/// line is hard-cut on a character boundary and continues on the next
/// part. A body made only of whitespace yields no parts once it needs
/// splitting.
pub fn split_message(command: &str, target: &str, body: &str, budget: usize) -> Vec<String> {
    let max = body_budget(command, target, budget);
    if body.len() <= max {
        return vec![body.to_owned()];
    }

    let room = max.saturating_sub(CONTINUATION.len());
    let mut parts = Vec::new();
    let mut current = String::new();

    for word in body.split_whitespace() {
        if word.len() > room {
            continue_on_next(&mut current, &mut parts);
            let mut rest = word;
            while rest.len() > room {
                let chunk = hard_cut(rest, room);
                parts.push(format!("{}{}", chunk, CONTINUATION));
                rest = &rest[chunk.len()..];
            }
            current.push_str(rest);
            continue;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if needed > room {
            continue_on_next(&mut current, &mut parts);
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn continue_on_next(current: &mut String, parts: &mut Vec<String>) {
    if !current.is_empty() {
        current.push_str(CONTINUATION);
        parts.push(std::mem::take(current));
    }
}

/// Longest prefix of `s` within `max` bytes, never empty.
fn hard_cut(s: &str, max: usize) -> &str {
    let chunk = truncate_utf8_safe(s, max);
    if !chunk.is_empty() {
        return chunk;
    }
    match s.char_indices().nth(1) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
