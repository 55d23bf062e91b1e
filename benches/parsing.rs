//! Benchmarks for the inbound hot path: framing, parsing, translation,
//! plus the outbound splitter.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slirc_client::{
    decode_mode_changes, event::translate, split_message, FeatureSet, LineFramer, Message,
};

/// Simple PING message
const SIMPLE_MESSAGE: &str = "PING :irc.example.com";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Message with IRCv3 tags
const TAGGED_MESSAGE: &str = "@time=2023-01-01T00:00:00.000Z;msgid=abc123 :nick!user@host PRIVMSG #channel :Hello with tags!";

/// CTCP action mixed with text
const CTCP_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :hi \x01ACTION waves\x01 there";

/// WHOX reply
const WHOX_REPLY: &str = ":irc.server.net 354 bot 31 #channel ident host.example.com irc.server.net alice H@ alice :Alice Liddell";

const ISUPPORT: [&str; 10] = [
    "bot",
    "CHANTYPES=#&",
    "PREFIX=(qaohv)~&@%+",
    "CHANMODES=beI,k,l,imnpst",
    "NETWORK=Example",
    "CASEMAPPING=rfc1459",
    "TARGMAX=PRIVMSG:4,NOTICE:4,JOIN:",
    "MAXLIST=beI:100",
    "WHOX",
    "are supported by this server",
];

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    for (name, line) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("with_tags", TAGGED_MESSAGE),
        ("whox_reply", WHOX_REPLY),
    ] {
        group.bench_with_input(BenchmarkId::new("parse", name), line, |b, s| {
            b.iter(|| {
                let msg: Message = black_box(s).parse().unwrap();
                black_box(msg)
            })
        });
    }

    group.finish();
}

fn benchmark_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Event Translation");

    let plain: Message = PREFIX_MESSAGE.parse().unwrap();
    let ctcp: Message = CTCP_MESSAGE.parse().unwrap();

    group.bench_function("pubmsg", |b| b.iter(|| black_box(translate(black_box(&plain)))));
    group.bench_function("ctcp_mixed", |b| b.iter(|| black_box(translate(black_box(&ctcp)))));

    group.finish();
}

fn benchmark_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Framing");

    let burst: Vec<u8> = [PREFIX_MESSAGE, WHOX_REPLY, SIMPLE_MESSAGE]
        .iter()
        .cycle()
        .take(300)
        .flat_map(|line| format!("{}\r\n", line).into_bytes())
        .collect();

    group.bench_function("burst_300_lines", |b| {
        b.iter(|| {
            let mut framer = LineFramer::utf8();
            for chunk in black_box(&burst).chunks(1024) {
                framer.feed(chunk);
                for line in framer.drain() {
                    black_box(line);
                }
            }
        })
    });

    group.finish();
}

fn benchmark_features(c: &mut Criterion) {
    let mut group = c.benchmark_group("Server Features");

    group.bench_function("isupport_load", |b| {
        b.iter(|| {
            let mut features = FeatureSet::new();
            features.load(black_box(&ISUPPORT));
            black_box(features)
        })
    });

    let mut features = FeatureSet::new();
    features.load(&ISUPPORT);
    let args = ["+ooo-v+bl", "alice", "bob", "carol", "dave", "*!*@spam", "50"];
    group.bench_function("mode_decode", |b| {
        b.iter(|| black_box(decode_mode_changes(black_box(&args), &features)))
    });

    group.finish();
}

fn benchmark_split(c: &mut Criterion) {
    let body = "lorem ipsum dolor sit amet ".repeat(80);
    c.bench_function("split_message_2k", |b| {
        b.iter(|| black_box(split_message("PRIVMSG", "#channel", black_box(&body), 440)))
    });
}

criterion_group!(
    benches,
    benchmark_parsing,
    benchmark_translation,
    benchmark_framing,
    benchmark_features,
    benchmark_split,
);

criterion_main!(benches);
