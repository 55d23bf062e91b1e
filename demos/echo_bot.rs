//! Echo bot example
//!
//! Connects, joins the channels given on the command line, echoes `!echo`
//! requests, answers CTCP VERSION and reports channel membership on `!who`.
//!
//! ```text
//! RUST_LOG=slirc_client=debug cargo run --example echo_bot -- irc.libera.chat 6667 '#slirc-test'
//! ```

use std::env;

use slirc_client::{Client, ClientConfig, ConnectParams, Priority};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    let server = args.next().unwrap_or_else(|| "irc.libera.chat".to_string());
    let port = args.next().and_then(|p| p.parse().ok()).unwrap_or(6667);
    let channels: Vec<String> = args.collect();

    let client = Client::new(ClientConfig::default())?;

    client.subscribe("welcome", Priority::Normal, move |client, _| {
        for channel in &channels {
            client.join(channel)?;
        }
        Ok(())
    });

    client.subscribe("pubmsg", Priority::Normal, |client, event| {
        let words = event.words();
        let Some(target) = event.reply_target() else {
            return Ok(());
        };
        match words.first() {
            Some(&"!echo") => client.privmsg(target, &words[1..].join(" "))?,
            Some(&"!who") => {
                let summary = client
                    .find_channel(target)
                    .map(|c| {
                        let ops = c.users().filter(|u| u.is_op()).count();
                        format!("{} users, {} ops, {} bans", c.user_count(), ops, c.bans().len())
                    })
                    .unwrap_or_else(|| "not tracking this channel".to_string());
                client.privmsg(target, &summary)?;
            }
            _ => {}
        }
        Ok(())
    });

    client.subscribe("ctcp", Priority::Normal, |client, event| {
        if event.arg(0) == Some("VERSION") {
            if let Some(nick) = event.source_nick() {
                client.ctcp_reply(nick, "VERSION", Some("slirc-client echo bot"))?;
            }
        }
        Ok(())
    });

    let supervisor = client.connect(ConnectParams::new(server, port, "slirc_echo", "slirc", "slirc echo bot"));

    tokio::signal::ctrl_c().await?;
    client.shutdown(&client.config().quit_message);
    supervisor.await?;
    Ok(())
}
