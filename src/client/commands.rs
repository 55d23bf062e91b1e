//! The outbound command API.
//!
//! Every command funnels through one enqueue path that strips line breaks
//! and enforces the line length limit on the encoded form.

use tracing::warn;

use super::Client;
use crate::command::{CapSubCommand, Command};
use crate::ctcp;
use crate::error::{ClientError, ProtocolError};
use crate::split::split_message;
use crate::util::{check_line_length, is_channel};

impl Client {
    /// Queue a command. `QUIT` and `USER` jump the queue.
    pub fn send(&self, command: Command) -> Result<(), ClientError> {
        let urgent = command.is_urgent();
        self.send_with(command, urgent)
    }

    /// Queue a command ahead of every normal line.
    pub fn send_urgent(&self, command: Command) -> Result<(), ClientError> {
        self.send_with(command, true)
    }

    /// Queue a preformatted line.
    pub fn send_raw(&self, line: &str, urgent: bool) -> Result<(), ClientError> {
        self.send_with(Command::Raw(line.to_owned()), urgent)
    }

    fn send_with(&self, command: Command, urgent: bool) -> Result<(), ClientError> {
        self.enqueue(command.to_string(), urgent)
    }

    fn enqueue(&self, mut line: String, urgent: bool) -> Result<(), ClientError> {
        line.retain(|c| c != '\r' && c != '\n');

        let limit = self.config().max_line_len;
        let (encoded, _, _) = self.shared.encoding.encode(&line);
        if let Some(actual) = check_line_length(&encoded, limit) {
            warn!(actual, limit, "line too long, not sent: {}", line);
            return Err(ProtocolError::MessageTooLong { actual, limit }.into());
        }

        self.shared.queue.push(line, urgent);
        Ok(())
    }

    /// Change nickname.
    pub fn nick(&self, nick: &str) -> Result<(), ClientError> {
        self.send(Command::NICK(nick.to_owned()))
    }

    /// Register username and realname.
    pub fn user(&self, user: &str, realname: &str) -> Result<(), ClientError> {
        self.send(Command::USER(user.to_owned(), realname.to_owned()))
    }

    /// Join one or more comma-separated channels.
    pub fn join(&self, channels: &str) -> Result<(), ClientError> {
        self.send(Command::JOIN(channels.to_owned()))
    }

    pub fn part(&self, channel: &str, reason: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::PART(channel.to_owned(), reason.map(str::to_owned)))
    }

    /// Send a PRIVMSG, split over several lines if it is too long.
    pub fn privmsg(&self, target: &str, body: &str) -> Result<(), ClientError> {
        for part in split_message("PRIVMSG", target, body, self.config().split_budget) {
            self.send(Command::PRIVMSG(target.to_owned(), part))?;
        }
        Ok(())
    }

    /// Send a NOTICE, split over several lines if it is too long.
    pub fn notice(&self, target: &str, body: &str) -> Result<(), ClientError> {
        for part in split_message("NOTICE", target, body, self.config().split_budget) {
            self.send(Command::NOTICE(target.to_owned(), part))?;
        }
        Ok(())
    }

    /// PRIVMSG to channels, NOTICE to users.
    pub fn msg(&self, target: &str, body: &str) -> Result<(), ClientError> {
        if is_channel(target) {
            self.privmsg(target, body)
        } else {
            self.notice(target, body)
        }
    }

    pub fn mode(&self, target: &str, modes: &str) -> Result<(), ClientError> {
        self.send(Command::MODE(target.to_owned(), modes.to_owned()))
    }

    /// `WHO target [options]`, e.g. `who("#c", Some("%tcnuhrsaf,31"))`.
    pub fn who(&self, target: &str, options: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::WHO(Some(target.to_owned()), options.map(str::to_owned)))
    }

    pub fn whois(&self, nicks: &[&str]) -> Result<(), ClientError> {
        self.send(Command::WHOIS(to_owned_all(nicks)))
    }

    pub fn whowas(&self, nick: &str, count: Option<u32>) -> Result<(), ClientError> {
        self.send(Command::WHOWAS(
            nick.to_owned(),
            count.map(|c| c.to_string()),
            None,
        ))
    }

    pub fn kick(&self, channel: &str, nick: &str, reason: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::KICK(
            channel.to_owned(),
            nick.to_owned(),
            reason.map(str::to_owned),
        ))
    }

    /// Query the topic with `None`, set it otherwise. An empty string
    /// clears it.
    pub fn topic(&self, channel: &str, topic: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::TOPIC(channel.to_owned(), topic.map(str::to_owned)))
    }

    pub fn invite(&self, nick: &str, channel: &str) -> Result<(), ClientError> {
        self.send(Command::INVITE(nick.to_owned(), channel.to_owned()))
    }

    pub fn names(&self, channels: &[&str]) -> Result<(), ClientError> {
        self.send(Command::NAMES(to_owned_all(channels)))
    }

    pub fn list(&self, channels: &[&str]) -> Result<(), ClientError> {
        self.send(Command::LIST(to_owned_all(channels), None))
    }

    pub fn ison(&self, nicks: &[&str]) -> Result<(), ClientError> {
        self.send(Command::ISON(to_owned_all(nicks)))
    }

    pub fn userhost(&self, nicks: &[&str]) -> Result<(), ClientError> {
        self.send(Command::USERHOST(to_owned_all(nicks)))
    }

    pub fn oper(&self, name: &str, password: &str) -> Result<(), ClientError> {
        self.send(Command::OPER(name.to_owned(), password.to_owned()))
    }

    pub fn squit(&self, server: &str, comment: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::SQUIT(server.to_owned(), comment.map(str::to_owned)))
    }

    pub fn wallops(&self, text: &str) -> Result<(), ClientError> {
        self.send(Command::WALLOPS(text.to_owned()))
    }

    pub fn globops(&self, text: &str) -> Result<(), ClientError> {
        self.send(Command::GLOBOPS(text.to_owned()))
    }

    /// Server queries. `server` addresses a remote server; `None` asks the
    /// one we are connected to.
    pub fn motd(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::MOTD(server.map(str::to_owned)))
    }

    pub fn lusers(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::LUSERS(server.map(str::to_owned)))
    }

    pub fn version(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::VERSION(server.map(str::to_owned)))
    }

    pub fn time(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::TIME(server.map(str::to_owned)))
    }

    pub fn info(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::INFO(server.map(str::to_owned)))
    }

    pub fn users(&self, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::USERS(server.map(str::to_owned)))
    }

    pub fn trace(&self, target: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::TRACE(target.map(str::to_owned)))
    }

    pub fn stats(&self, query: &str, server: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::STATS(query.to_owned(), server.map(str::to_owned)))
    }

    pub fn links(&self, remote: Option<&str>, mask: Option<&str>) -> Result<(), ClientError> {
        self.send(Command::LINKS(remote.map(str::to_owned), mask.map(str::to_owned)))
    }

    /// Reply to a server PING.
    pub fn pong(&self, token: &str) -> Result<(), ClientError> {
        self.send_urgent(Command::PONG(token.to_owned()))
    }

    /// Queue a QUIT without tearing the session down; the server closes
    /// the link. `None` uses the configured quit message.
    pub fn quit(&self, reason: Option<&str>) -> Result<(), ClientError> {
        let reason = reason.unwrap_or(self.config().quit_message.as_str()).to_owned();
        self.send(Command::QUIT(reason))
    }

    /// Send a CTCP request. The tag is upper-cased.
    pub fn ctcp(&self, target: &str, tag: &str, data: Option<&str>) -> Result<(), ClientError> {
        let body = ctcp::tagged(&tag.to_ascii_uppercase(), data);
        self.send(Command::PRIVMSG(target.to_owned(), body))
    }

    /// Answer a CTCP request. The tag is upper-cased.
    pub fn ctcp_reply(&self, target: &str, tag: &str, data: Option<&str>) -> Result<(), ClientError> {
        let body = ctcp::tagged(&tag.to_ascii_uppercase(), data);
        self.send(Command::NOTICE(target.to_owned(), body))
    }

    /// `/me` style action.
    pub fn action(&self, target: &str, text: &str) -> Result<(), ClientError> {
        self.ctcp(target, "ACTION", Some(text))
    }

    /// Capability negotiation. `NAK` and unknown subcommands are rejected
    /// before anything is queued.
    pub fn cap(&self, subcommand: &str, args: &[&str]) -> Result<(), ClientError> {
        let sub = CapSubCommand::for_client(subcommand)?;
        self.send(Command::CAP(sub, to_owned_all(args)))
    }
}

fn to_owned_all(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
