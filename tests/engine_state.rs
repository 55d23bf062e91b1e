//! Integration tests for the built-in state handlers.
//!
//! Lines are fed straight into the engine; no socket is involved. Outbound
//! effects are observed through the queue.

use std::sync::Arc;

use parking_lot::Mutex;
use slirc_client::{Client, ClientConfig, ClientError, Priority, ProtocolError};

fn registered(config: ClientConfig) -> Client {
    let client = Client::new(config).expect("valid config");
    client.handle_line(":irc.example.net 001 bot :Welcome to the network");
    client
}

fn joined() -> Client {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");
    client.handle_line(":irc.example.net 315 bot #test :End of WHO list");
    client.queue().clear();
    client
}

#[test]
fn test_self_join_creates_channel_and_queries() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");

    assert!(client.find_channel("#test").is_some());
    assert_eq!(client.queued_lines(), vec!["WHO #test", "MODE #test b"]);
}

#[test]
fn test_self_join_is_case_insensitive() {
    let client = registered(ClientConfig::default());
    client.handle_line(":BOT!b@host JOIN #test");
    assert!(client.find_channel("#test").is_some());
}

#[test]
fn test_who_reply_populates_member() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");
    client.handle_line(":irc.example.net 352 bot #test ~alice alice.host irc.example.net alice H@ :0 Alice Liddell");

    let alice = client.find_user("#test", "alice").expect("alice tracked");
    assert!(alice.is_op());
    assert!(!alice.is_away());
    assert_eq!(alice.username, "~alice");
    assert_eq!(alice.host, "alice.host");
    assert_eq!(alice.realname, "Alice Liddell");
    assert_eq!(alice.account, None);

    // No WHOX and no account known elsewhere: ask the server.
    assert_eq!(client.queued_lines().last().unwrap(), "WHOIS alice");

    client.handle_line(":irc.example.net 330 bot alice wonderland :is logged in as");
    let alice = client.find_user("#test", "alice").unwrap();
    assert_eq!(alice.account.as_deref(), Some("wonderland"));
}

#[test]
fn test_whox_reply_carries_account() {
    let client = registered(ClientConfig::default());
    client.handle_line(":irc.example.net 005 bot WHOX PREFIX=(ohv)@%+ :are supported by this server");
    client.handle_line(":bot!b@host JOIN #test");
    assert_eq!(client.queued_lines()[0], "WHO #test %tcnuhrsaf,31");

    client.handle_line(":irc.example.net 354 bot 31 #test ~h half.host irc.example.net hal G% halaccount :Hal 9000");
    client.handle_line(":irc.example.net 354 bot 31 #test ~n anon.host irc.example.net nobody H 0 :Nobody");

    let hal = client.find_user("#test", "hal").unwrap();
    assert_eq!(hal.account.as_deref(), Some("halaccount"));
    assert!(hal.is_away());
    assert!(hal.is_op());
    assert_eq!(hal.realname, "Hal 9000");

    let nobody = client.find_user("#test", "nobody").unwrap();
    assert_eq!(nobody.account, None);
}

#[test]
fn test_other_join_targets_who_at_nick() {
    let client = joined();
    client.handle_line(":carol!c@carol.host JOIN #test");
    assert_eq!(client.queued_lines(), vec!["WHO carol"]);

    client.handle_line(":irc.example.net 352 bot * ~c carol.host irc.example.net carol H :0 Carol");
    assert!(client.find_user("#test", "carol").is_some());
}

#[test]
fn test_end_of_who_retires_only_its_own_query() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");
    client.who("#x", None).unwrap();

    client.handle_line(":irc.example.net 352 bot #x ~z z.host srv zed H :0 Zed");
    client.handle_line(":irc.example.net 315 bot #x :End of WHO list");
    client.handle_line(":irc.example.net 352 bot #test ~alice alice.host srv alice H@ :0 Alice");
    client.handle_line(":irc.example.net 315 bot #test :End of WHO list");

    assert!(client.find_user("#test", "alice").unwrap().is_op());
    assert!(client.find_user("#test", "zed").is_none());
}

#[test]
fn test_numeric_nick_gets_op() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");
    client.handle_line(":irc.example.net 352 bot #test ~b b.host srv 007 H :0 Bond");
    client.handle_line(":irc.example.net 315 bot #test :End of WHO list");

    client.handle_line(":op!o@host MODE #test +o 007");
    assert!(client.find_user("#test", "007").unwrap().is_op());
}

#[test]
fn test_nick_mode_kick_and_quit() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host JOIN #test");
    client.handle_line(":irc.example.net 352 bot #test ~a a.host srv alice H@ :0 Alice");
    client.handle_line(":irc.example.net 352 bot #test ~d d.host srv dave H+ :0 Dave");
    client.handle_line(":irc.example.net 315 bot #test :End of WHO list");

    client.handle_line(":alice!a@a.host NICK alicia");
    assert!(client.find_user("#test", "alice").is_none());
    assert!(client.find_user("#test", "alicia").unwrap().is_op());

    client.handle_line(":op!o@host MODE #test -o+v alicia alicia");
    let alicia = client.find_user("#test", "alicia").unwrap();
    assert!(!alicia.is_op());
    assert!(alicia.is_voiced());

    client.handle_line(":op!o@host KICK #test alicia :bye");
    assert!(client.find_user("#test", "alicia").is_none());

    client.handle_line(":dave!d@d.host QUIT :Client quit");
    assert_eq!(client.find_channel("#test").unwrap().user_count(), 0);
}

#[test]
fn test_kick_of_untracked_is_noop() {
    let client = joined();
    client.handle_line(":op!o@host KICK #elsewhere ghost :bye");
    client.handle_line(":op!o@host KICK #test ghost :bye");
    assert!(client.find_channel("#test").is_some());
}

#[test]
fn test_self_part_and_kick_drop_channel() {
    let client = joined();
    client.handle_line(":bot!b@host PART #test :later");
    assert!(client.find_channel("#test").is_none());

    client.handle_line(":bot!b@host JOIN #test");
    client.handle_line(":op!o@host KICK #test bot :out");
    assert!(client.find_channel("#test").is_none());
}

#[test]
fn test_self_quit_forgets_everything() {
    let client = joined();
    client.handle_line(":bot!b@host JOIN #other");
    client.handle_line(":bot!b@host QUIT :gone");
    assert!(client.channels().is_empty());
}

#[test]
fn test_topic_and_banlist() {
    let client = joined();
    client.handle_line(":irc.example.net 332 bot #test :Welcome to #test");
    assert_eq!(client.find_channel("#test").unwrap().topic, "Welcome to #test");

    client.handle_line(":op!o@host TOPIC #test :New topic");
    assert_eq!(client.find_channel("#test").unwrap().topic, "New topic");

    client.handle_line(":irc.example.net 367 bot #test *!*@spam op 1700000000");
    client.handle_line(":irc.example.net 367 bot #test *!*@spam op 1700000000");
    assert_eq!(client.find_channel("#test").unwrap().bans(), ["*!*@spam"]);
}

#[test]
fn test_nickname_retries_are_capped() {
    let client = registered(ClientConfig::default().with_max_nick_retries(Some(1)));
    client.handle_line(":irc.example.net 433 * bot :Nickname is already in use");
    client.handle_line(":irc.example.net 433 * bot_ :Nickname is already in use");

    assert_eq!(client.queued_lines(), vec!["NICK bot_"]);
    assert_eq!(client.nickname(), "bot_");
}

#[test]
fn test_own_nick_change_is_tracked() {
    let client = registered(ClientConfig::default());
    client.handle_line(":bot!b@host NICK robot");
    assert_eq!(client.nickname(), "robot");
    assert!(client.is_me("ROBOT"));
}

#[test]
fn test_ctcp_events_reach_subscribers() {
    let client = registered(ClientConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));

    for kind in ["pubmsg", "ctcp", "action"] {
        let seen = Arc::clone(&seen);
        client.subscribe(kind, Priority::Normal, move |_, event| {
            seen.lock().push((event.kind.clone(), event.args.clone()));
            Ok(())
        });
    }

    client.handle_line(":alice!a@host PRIVMSG #test :hi \x01ACTION waves\x01");
    assert_eq!(
        *seen.lock(),
        vec![
            ("pubmsg".to_string(), vec!["hi ".to_string()]),
            ("ctcp".to_string(), vec!["ACTION".to_string(), "waves".to_string()]),
            ("action".to_string(), vec!["waves".to_string()]),
        ]
    );
}

#[test]
fn test_failing_handler_does_not_stop_builtins() {
    let client = registered(ClientConfig::default());
    client.subscribe("join", Priority::High, |_, _| anyhow::bail!("boom"));
    client.subscribe("join", Priority::High, |_, _| panic!("kaboom"));

    client.handle_line(":bot!b@host JOIN #test");
    assert!(client.find_channel("#test").is_some());
}

#[test]
fn test_raw_event_precedes_parsing() {
    let client = registered(ClientConfig::default());
    let raw = Arc::new(Mutex::new(Vec::new()));
    {
        let raw = Arc::clone(&raw);
        client.subscribe("all_raw_messages", Priority::Normal, move |_, event| {
            raw.lock().push(event.args[0].clone());
            Ok(())
        });
    }

    client.handle_line("!!! not a line");
    assert_eq!(*raw.lock(), vec!["!!! not a line"]);
}

#[test]
fn test_long_privmsg_is_split() {
    let client = registered(ClientConfig::default());
    let body = "word ".repeat(300);
    client.privmsg("#test", &body).unwrap();

    let lines = client.queued_lines();
    assert!(lines.len() > 1);
    for line in &lines[..lines.len() - 1] {
        assert!(line.starts_with("PRIVMSG #test :"));
        assert!(line.ends_with(" \u{2026}"));
        assert!(line.len() + 2 <= 512);
    }
}

#[test]
fn test_command_api_validation() {
    let client = registered(ClientConfig::default());

    assert!(matches!(client.cap("NAK", &[]), Err(ClientError::Parse(_))));
    client.cap("req", &["multi-prefix", "sasl"]).unwrap();
    assert_eq!(client.queued_lines(), vec!["CAP REQ :multi-prefix sasl"]);
    client.queue().clear();

    let err = client.send_raw(&"x".repeat(600), false).unwrap_err();
    assert!(matches!(
        err,
        ClientError::Protocol(ProtocolError::MessageTooLong { actual: 602, limit: 512 })
    ));
    assert!(client.queue().is_empty());

    client.send_raw("PRIVMSG #a :one\r\nQUIT", false).unwrap();
    assert_eq!(client.queued_lines(), vec!["PRIVMSG #a :oneQUIT"]);
}

#[test]
fn test_ctcp_helpers() {
    let client = registered(ClientConfig::default());
    client.ctcp("alice", "version", None).unwrap();
    client.ctcp_reply("alice", "ping", Some("12345")).unwrap();
    client.quit(None).unwrap();

    assert_eq!(
        client.queued_lines(),
        vec![
            "QUIT :Sayonara <3",
            "PRIVMSG alice :\x01VERSION\x01",
            "NOTICE alice :\x01PING 12345\x01",
        ]
    );
}

#[test]
fn test_ctcp_data_is_quoted() {
    let client = registered(ClientConfig::default());
    client.action("#c", "two\nlines").unwrap();
    assert_eq!(
        client.queued_lines(),
        vec!["PRIVMSG #c :\x01ACTION two\x10nlines\x01"]
    );
}

#[test]
fn test_urgent_raw_line_jumps_queue() {
    let client = registered(ClientConfig::default());
    client.privmsg("#c", "first").unwrap();
    client.send_raw("PING :x", true).unwrap();
    assert_eq!(client.queued_lines(), vec!["PING :x", "PRIVMSG #c :first"]);
}
