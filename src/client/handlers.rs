//! Built-in subscribers that keep channel and member state in sync with
//! the server and answer the protocol chores (PING, nickname collisions).
//!
//! Locks are released before anything is queued.

use tracing::{debug, warn};

use super::Client;
use crate::command::Command;
use crate::dispatch::{HandlerResult, Priority};
use crate::event::Event;
use crate::mode::decode_mode_changes;
use crate::state::User;

/// WHOX field selection; the `31` query type tags the replies we track.
pub(crate) const WHOX_FIELDS: &str = "%tcnuhrsaf,31";
const WHOX_QUERY_TYPE: &str = "31";

type Builtin = fn(&Client, &Event) -> HandlerResult;

const BUILTINS: &[(&str, Builtin)] = &[
    ("join", on_join),
    ("whospcrpl", on_whox_reply),
    ("whoreply", on_who_reply),
    ("endofwho", on_end_of_who),
    ("whoisaccount", on_whois_account),
    ("nick", on_nick),
    ("mode", on_mode),
    ("kick", on_kick),
    ("part", on_part),
    ("quit", on_quit),
    ("currenttopic", on_current_topic),
    ("topic", on_topic),
    ("banlist", on_banlist),
    ("nicknameinuse", on_nickname_in_use),
    ("ping", on_ping),
];

pub(super) fn install(client: &Client) {
    for (kind, handler) in BUILTINS {
        client.subscribe(kind, Priority::Normal, *handler);
    }
}

fn on_join(client: &Client, event: &Event) -> HandlerResult {
    let Some(nick) = event.source_nick() else {
        return Ok(());
    };
    let channel = event.target();
    let whox = client.with_features(|f| f.whox());
    let options = whox.then_some(WHOX_FIELDS);

    if client.is_me(nick) {
        {
            let mut channels = client.shared.channels.write();
            channels.create(channel);
            channels.push_pending_who(channel, channel);
        }
        client.who(channel, options)?;
        client.mode(channel, "b")?;
    } else {
        client
            .shared
            .channels
            .write()
            .push_pending_who(channel, nick);
        client.who(nick, options)?;
    }
    Ok(())
}

/// `354 me 31 #chan user host server nick flags account :realname`
fn on_whox_reply(client: &Client, event: &Event) -> HandlerResult {
    if event.arg(0) != Some(WHOX_QUERY_TYPE) || event.args.len() < 9 {
        return Ok(());
    }
    let a = &event.args;

    let mut user = User::new(a[5].as_str());
    user.username = a[2].clone();
    user.host = a[3].clone();
    user.server = a[4].clone();
    user.realname = a[8].clone();
    user.account = (a[7] != "0").then(|| a[7].clone());

    let prefixes = client.with_features(|f| f.prefix().clone());
    user.set_status(&a[6], &prefixes);

    let mut channels = client.shared.channels.write();
    let name = match channels.pending_who_for(&a[1], &a[5]) {
        Some(pending) => pending.channel.clone(),
        None => a[1].clone(),
    };
    match channels.get_mut(&name) {
        Some(channel) => channel.add_user(user),
        None => debug!(channel = %name, "WHOX reply for untracked channel"),
    }
    Ok(())
}

/// `352 me #chan user host server nick flags :hops realname`
fn on_who_reply(client: &Client, event: &Event) -> HandlerResult {
    if event.args.len() < 7 {
        return Ok(());
    }
    let a = &event.args;
    let nick = a[4].as_str();

    let mut user = User::new(nick);
    user.username = a[1].clone();
    user.host = a[2].clone();
    user.server = a[3].clone();
    user.realname = match a[6].split_once(' ') {
        Some((_hops, realname)) => realname.to_owned(),
        None => String::new(),
    };
    let (prefixes, whox) = client.with_features(|f| (f.prefix().clone(), f.whox()));
    user.set_status(&a[5], &prefixes);

    let needs_whois = {
        let mut channels = client.shared.channels.write();
        let Some(pending) = channels.pending_who_for(&a[0], nick).cloned() else {
            return Ok(());
        };
        let Some(channel) = channels.get_mut(&pending.channel) else {
            return Ok(());
        };
        channel.merge_user(user);

        if whox {
            false
        } else {
            let known = channels
                .iter()
                .filter_map(|c| c.user(nick))
                .find_map(|u| u.account.clone());
            match known {
                Some(account) => {
                    if let Some(member) = channels
                        .get_mut(&pending.channel)
                        .and_then(|c| c.user_mut(nick))
                    {
                        member.account = Some(account);
                    }
                    false
                }
                None => true,
            }
        }
    };

    if needs_whois {
        client.whois(&[nick])?;
    }
    Ok(())
}

/// `315 me mask :End of WHO list`
fn on_end_of_who(client: &Client, event: &Event) -> HandlerResult {
    if let Some(mask) = event.arg(0) {
        client.shared.channels.write().finish_who(mask);
    }
    Ok(())
}

fn on_whois_account(client: &Client, event: &Event) -> HandlerResult {
    if let (Some(nick), Some(account)) = (event.arg(0), event.arg(1)) {
        client
            .shared
            .channels
            .write()
            .set_account_everywhere(nick, account);
    }
    Ok(())
}

fn on_nick(client: &Client, event: &Event) -> HandlerResult {
    if let Some(old) = event.source_nick() {
        client
            .shared
            .channels
            .write()
            .rename_everywhere(old, event.target());
    }
    Ok(())
}

fn on_mode(client: &Client, event: &Event) -> HandlerResult {
    let (changes, prefixes) = client.with_features(|features| {
        decode_mode_changes(&event.args, features).map(|c| (c, features.prefix().clone()))
    })?;

    let mut channels = client.shared.channels.write();
    let Some(channel) = channels.get_mut(event.target()) else {
        return Ok(());
    };
    for change in changes {
        // Coercion is lossless, so this is the argument as sent.
        let Some(arg) = change.arg.as_ref().map(ToString::to_string) else {
            continue;
        };
        if let Some(prefix) = prefixes.prefix_for(change.mode) {
            if let Some(member) = channel.user_mut(&arg) {
                member.modify_prefix(prefix, change.adding, &prefixes);
            }
        } else if change.mode == 'b' {
            if change.adding {
                channel.add_ban(&arg);
            } else {
                channel.remove_ban(&arg);
            }
        }
    }
    Ok(())
}

/// `KICK #chan victim :reason`
fn on_kick(client: &Client, event: &Event) -> HandlerResult {
    let Some(victim) = event.arg(0) else {
        return Ok(());
    };
    leave(client, event.target(), victim);
    Ok(())
}

fn on_part(client: &Client, event: &Event) -> HandlerResult {
    if let Some(nick) = event.source_nick() {
        leave(client, event.target(), nick);
    }
    Ok(())
}

fn leave(client: &Client, channel: &str, nick: &str) {
    let me = client.is_me(nick);
    let mut channels = client.shared.channels.write();
    if me {
        channels.remove(channel);
    } else if let Some(channel) = channels.get_mut(channel) {
        channel.remove_user(nick);
    }
}

fn on_quit(client: &Client, event: &Event) -> HandlerResult {
    let Some(nick) = event.source_nick() else {
        return Ok(());
    };
    let me = client.is_me(nick);
    let mut channels = client.shared.channels.write();
    channels.remove_everywhere(nick);
    if me {
        channels.clear();
    }
    Ok(())
}

/// `332 me #chan :topic`
fn on_current_topic(client: &Client, event: &Event) -> HandlerResult {
    if let (Some(name), Some(topic)) = (event.arg(0), event.arg(1)) {
        client.shared.channels.write().get_or_create(name).topic = topic.to_owned();
    }
    Ok(())
}

fn on_topic(client: &Client, event: &Event) -> HandlerResult {
    if let Some(topic) = event.arg(0) {
        if let Some(channel) = client.shared.channels.write().get_mut(event.target()) {
            channel.topic = topic.to_owned();
        }
    }
    Ok(())
}

/// `367 me #chan mask [setter ts]`
fn on_banlist(client: &Client, event: &Event) -> HandlerResult {
    if let (Some(name), Some(mask)) = (event.arg(0), event.arg(1)) {
        if let Some(channel) = client.shared.channels.write().get_mut(name) {
            channel.add_ban(mask);
        }
    }
    Ok(())
}

fn on_nickname_in_use(client: &Client, _event: &Event) -> HandlerResult {
    let config = client.config();
    let nick = {
        let mut session = client.shared.session.lock();
        if let Some(max) = config.max_nick_retries {
            if session.nick_retries >= max {
                warn!(nick = %session.nick, retries = session.nick_retries, "giving up on nickname");
                return Ok(());
            }
        }
        session.nick_retries += 1;
        session.nick.push_str(&config.nick_suffix);
        session.nick.clone()
    };
    debug!(%nick, "nickname in use, retrying");
    client.send_urgent(Command::NICK(nick))?;
    Ok(())
}

fn on_ping(client: &Client, event: &Event) -> HandlerResult {
    client.pong(event.target())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client() -> Client {
        let client = Client::new(ClientConfig::default()).unwrap();
        client.handle_line(":srv 001 bot :Welcome");
        client
    }

    #[test]
    fn test_mode_skips_unknown_member() {
        let client = client();
        client.handle_line(":bot!b@h JOIN #c");
        client.handle_line(":op!o@h MODE #c +o ghost");
        assert!(client.find_channel("#c").is_some());
        assert!(client.find_user("#c", "ghost").is_none());
    }

    #[test]
    fn test_self_join_queries_members() {
        let client = client();
        client.handle_line(":bot!b@h JOIN #c");
        assert_eq!(client.queued_lines(), vec!["WHO #c", "MODE #c b"]);
    }

    #[test]
    fn test_whox_join_uses_field_selection() {
        let client = client();
        client.handle_line(":srv 005 bot WHOX :are supported");
        client.handle_line(":bot!b@h JOIN #c");
        assert_eq!(client.queued_lines()[0], "WHO #c %tcnuhrsaf,31");
    }

    #[test]
    fn test_topic_numeric_creates_channel() {
        let client = client();
        client.handle_line(":srv 332 bot #new :hello world");
        assert_eq!(client.find_channel("#new").unwrap().topic, "hello world");
    }

    #[test]
    fn test_ping_is_answered_urgently() {
        let client = client();
        client.handle_line("PING :irc.example.net");
        assert_eq!(client.queued_lines(), vec!["PONG :irc.example.net"]);
    }

    #[test]
    fn test_ban_mode_tracking() {
        let client = client();
        client.handle_line(":bot!b@h JOIN #c");
        client.handle_line(":op!o@h MODE #c +bb a!*@* b!*@*");
        client.handle_line(":op!o@h MODE #c -b a!*@*");
        assert_eq!(client.find_channel("#c").unwrap().bans(), ["b!*@*"]);
    }
}
