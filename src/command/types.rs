//! IRC command types.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol

use super::subcommands::CapSubCommand;

/// An outbound IRC command with its parameters.
///
/// Optional parameters are omitted from the rendered line when `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    // === Connection Registration ===
    /// `NICK nickname`
    NICK(String),
    /// `USER username * * :realname`
    USER(String, String),
    /// `OPER name password`
    OPER(String, String),
    /// `QUIT :message`
    QUIT(String),
    /// `SQUIT server [:comment]`
    SQUIT(String, Option<String>),
    /// `CAP subcommand [args]`
    CAP(CapSubCommand, Vec<String>),

    // === Channel Operations ===
    /// `JOIN channel`
    JOIN(String),
    /// `PART channel [:message]`
    PART(String, Option<String>),
    /// `MODE target modes`, modes verbatim (letters plus arguments)
    MODE(String, String),
    /// `TOPIC channel [:topic]`
    TOPIC(String, Option<String>),
    /// `NAMES [channel,...]`
    NAMES(Vec<String>),
    /// `LIST [channel,...] [server]`
    LIST(Vec<String>, Option<String>),
    /// `INVITE nickname channel`
    INVITE(String, String),
    /// `KICK channel nickname [:comment]`
    KICK(String, String, Option<String>),

    // === Messaging ===
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),

    // === Server Queries ===
    /// `MOTD [server]`
    MOTD(Option<String>),
    /// `LUSERS [server]`
    LUSERS(Option<String>),
    /// `VERSION [server]`
    VERSION(Option<String>),
    /// `STATS query [server]`
    STATS(String, Option<String>),
    /// `LINKS [remote] [mask]`
    LINKS(Option<String>, Option<String>),
    /// `TIME [server]`
    TIME(Option<String>),
    /// `TRACE [target]`
    TRACE(Option<String>),
    /// `INFO [server]`
    INFO(Option<String>),

    // === User Queries ===
    /// `WHO [mask] [options]`
    WHO(Option<String>, Option<String>),
    /// `WHOIS nick,...`
    WHOIS(Vec<String>),
    /// `WHOWAS nick [count] [server]`
    WHOWAS(String, Option<String>, Option<String>),
    /// `USERHOST nick,...`
    USERHOST(Vec<String>),
    /// `ISON nick ...`
    ISON(Vec<String>),
    /// `USERS [server]`
    USERS(Option<String>),

    // === Miscellaneous ===
    /// `PONG :token`
    PONG(String),
    /// `WALLOPS :text`
    WALLOPS(String),
    /// `GLOBOPS :text`
    GLOBOPS(String),

    /// A pre-rendered line, sent verbatim.
    Raw(String),
}

impl Command {
    /// Whether this command is sent ahead of the rate-limited queue by
    /// default.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Command::QUIT(_) | Command::USER(..))
    }
}
