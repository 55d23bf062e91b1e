//! IRC numeric replies and their event names.
//!
//! Three-digit numerics are translated to short lowercase event names
//! (`001` becomes `welcome`, `433` becomes `nicknameinuse`) so handlers can
//! subscribe to them by name. Numerics missing from the table keep their
//! numeric string as the event name.
//!
//! # Reference
//! - RFC 1459 / RFC 2812 numeric replies

#![allow(non_camel_case_types)]

use std::str::FromStr;

macro_rules! numerics {
    ($( $variant:ident = $code:literal => $name:literal, )*) => {
        /// IRC server numeric reply.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        #[non_exhaustive]
        pub enum Response {
            $(
                #[doc = concat!("`", stringify!($code), "` (`", $name, "`)")]
                $variant = $code,
            )*
        }

        impl Response {
            /// Look up a numeric by its integer code.
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $( $code => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// The event name this numeric is dispatched under.
            pub fn event_name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }
        }
    };
}

numerics! {
    RPL_WELCOME = 1 => "welcome",
    RPL_YOURHOST = 2 => "yourhost",
    RPL_CREATED = 3 => "created",
    RPL_MYINFO = 4 => "myinfo",
    RPL_ISUPPORT = 5 => "featurelist",
    RPL_TRACELINK = 200 => "tracelink",
    RPL_TRACECONNECTING = 201 => "traceconnecting",
    RPL_TRACEHANDSHAKE = 202 => "tracehandshake",
    RPL_TRACEUNKNOWN = 203 => "traceunknown",
    RPL_TRACEOPERATOR = 204 => "traceoperator",
    RPL_TRACEUSER = 205 => "traceuser",
    RPL_TRACESERVER = 206 => "traceserver",
    RPL_TRACESERVICE = 207 => "traceservice",
    RPL_TRACENEWTYPE = 208 => "tracenewtype",
    RPL_TRACECLASS = 209 => "traceclass",
    RPL_TRACERECONNECT = 210 => "tracereconnect",
    RPL_STATSLINKINFO = 211 => "statslinkinfo",
    RPL_STATSCOMMANDS = 212 => "statscommands",
    RPL_STATSCLINE = 213 => "statscline",
    RPL_STATSNLINE = 214 => "statsnline",
    RPL_STATSILINE = 215 => "statsiline",
    RPL_STATSKLINE = 216 => "statskline",
    RPL_STATSQLINE = 217 => "statsqline",
    RPL_STATSYLINE = 218 => "statsyline",
    RPL_ENDOFSTATS = 219 => "endofstats",
    RPL_UMODEIS = 221 => "umodeis",
    RPL_SERVICEINFO = 231 => "serviceinfo",
    RPL_ENDOFSERVICES = 232 => "endofservices",
    RPL_SERVICE = 233 => "service",
    RPL_SERVLIST = 234 => "servlist",
    RPL_SERVLISTEND = 235 => "servlistend",
    RPL_STATSLLINE = 241 => "statslline",
    RPL_STATSUPTIME = 242 => "statsuptime",
    RPL_STATSOLINE = 243 => "statsoline",
    RPL_STATSHLINE = 244 => "statshline",
    RPL_LUSERCONNS = 250 => "luserconns",
    RPL_LUSERCLIENT = 251 => "luserclient",
    RPL_LUSEROP = 252 => "luserop",
    RPL_LUSERUNKNOWN = 253 => "luserunknown",
    RPL_LUSERCHANNELS = 254 => "luserchannels",
    RPL_LUSERME = 255 => "luserme",
    RPL_ADMINME = 256 => "adminme",
    RPL_ADMINLOC1 = 257 => "adminloc1",
    RPL_ADMINLOC2 = 258 => "adminloc2",
    RPL_ADMINEMAIL = 259 => "adminemail",
    RPL_TRACELOG = 261 => "tracelog",
    RPL_ENDOFTRACE = 262 => "endoftrace",
    RPL_TRYAGAIN = 263 => "tryagain",
    RPL_LOCALUSERS = 265 => "n_local",
    RPL_GLOBALUSERS = 266 => "n_global",
    RPL_NONE = 300 => "none",
    RPL_AWAY = 301 => "away",
    RPL_USERHOST = 302 => "userhost",
    RPL_ISON = 303 => "ison",
    RPL_UNAWAY = 305 => "unaway",
    RPL_NOWAWAY = 306 => "nowaway",
    RPL_WHOISUSER = 311 => "whoisuser",
    RPL_WHOISSERVER = 312 => "whoisserver",
    RPL_WHOISOPERATOR = 313 => "whoisoperator",
    RPL_WHOWASUSER = 314 => "whowasuser",
    RPL_ENDOFWHO = 315 => "endofwho",
    RPL_WHOISCHANOP = 316 => "whoischanop",
    RPL_WHOISIDLE = 317 => "whoisidle",
    RPL_ENDOFWHOIS = 318 => "endofwhois",
    RPL_WHOISCHANNELS = 319 => "whoischannels",
    RPL_LISTSTART = 321 => "liststart",
    RPL_LIST = 322 => "list",
    RPL_LISTEND = 323 => "listend",
    RPL_CHANNELMODEIS = 324 => "channelmodeis",
    RPL_CREATIONTIME = 329 => "channelcreate",
    RPL_WHOISACCOUNT = 330 => "whoisaccount",
    RPL_NOTOPIC = 331 => "notopic",
    RPL_TOPIC = 332 => "currenttopic",
    RPL_TOPICWHOTIME = 333 => "topicinfo",
    RPL_INVITING = 341 => "inviting",
    RPL_SUMMONING = 342 => "summoning",
    RPL_INVITELIST = 346 => "invitelist",
    RPL_ENDOFINVITELIST = 347 => "endofinvitelist",
    RPL_EXCEPTLIST = 348 => "exceptlist",
    RPL_ENDOFEXCEPTLIST = 349 => "endofexceptlist",
    RPL_VERSION = 351 => "version",
    RPL_WHOREPLY = 352 => "whoreply",
    RPL_NAMREPLY = 353 => "namreply",
    RPL_WHOSPCRPL = 354 => "whospcrpl",
    RPL_KILLDONE = 361 => "killdone",
    RPL_CLOSING = 362 => "closing",
    RPL_CLOSEEND = 363 => "closeend",
    RPL_LINKS = 364 => "links",
    RPL_ENDOFLINKS = 365 => "endoflinks",
    RPL_ENDOFNAMES = 366 => "endofnames",
    RPL_BANLIST = 367 => "banlist",
    RPL_ENDOFBANLIST = 368 => "endofbanlist",
    RPL_ENDOFWHOWAS = 369 => "endofwhowas",
    RPL_INFO = 371 => "info",
    RPL_MOTD = 372 => "motd",
    RPL_INFOSTART = 373 => "infostart",
    RPL_ENDOFINFO = 374 => "endofinfo",
    RPL_MOTDSTART = 375 => "motdstart",
    RPL_ENDOFMOTD = 376 => "endofmotd",
    RPL_MOTD2 = 377 => "motd2",
    RPL_YOUREOPER = 381 => "youreoper",
    RPL_REHASHING = 382 => "rehashing",
    RPL_MYPORTIS = 384 => "myportis",
    RPL_TIME = 391 => "time",
    RPL_USERSSTART = 392 => "usersstart",
    RPL_USERS = 393 => "users",
    RPL_ENDOFUSERS = 394 => "endofusers",
    RPL_NOUSERS = 395 => "nousers",
    ERR_NOSUCHNICK = 401 => "nosuchnick",
    ERR_NOSUCHSERVER = 402 => "nosuchserver",
    ERR_NOSUCHCHANNEL = 403 => "nosuchchannel",
    ERR_CANNOTSENDTOCHAN = 404 => "cannotsendtochan",
    ERR_TOOMANYCHANNELS = 405 => "toomanychannels",
    ERR_WASNOSUCHNICK = 406 => "wasnosuchnick",
    ERR_TOOMANYTARGETS = 407 => "toomanytargets",
    ERR_NOORIGIN = 409 => "noorigin",
    ERR_INVALIDCAPCMD = 410 => "invalidcapcmd",
    ERR_NORECIPIENT = 411 => "norecipient",
    ERR_NOTEXTTOSEND = 412 => "notexttosend",
    ERR_NOTOPLEVEL = 413 => "notoplevel",
    ERR_WILDTOPLEVEL = 414 => "wildtoplevel",
    ERR_UNKNOWNCOMMAND = 421 => "unknowncommand",
    ERR_NOMOTD = 422 => "nomotd",
    ERR_NOADMININFO = 423 => "noadmininfo",
    ERR_FILEERROR = 424 => "fileerror",
    ERR_NONICKNAMEGIVEN = 431 => "nonicknamegiven",
    ERR_ERRONEUSNICKNAME = 432 => "erroneusnickname",
    ERR_NICKNAMEINUSE = 433 => "nicknameinuse",
    ERR_NICKCOLLISION = 436 => "nickcollision",
    ERR_UNAVAILRESOURCE = 437 => "unavailresource",
    ERR_USERNOTINCHANNEL = 441 => "usernotinchannel",
    ERR_NOTONCHANNEL = 442 => "notonchannel",
    ERR_USERONCHANNEL = 443 => "useronchannel",
    ERR_NOLOGIN = 444 => "nologin",
    ERR_SUMMONDISABLED = 445 => "summondisabled",
    ERR_USERSDISABLED = 446 => "usersdisabled",
    ERR_NOTREGISTERED = 451 => "notregistered",
    ERR_NEEDMOREPARAMS = 461 => "needmoreparams",
    ERR_ALREADYREGISTRED = 462 => "alreadyregistered",
    ERR_NOPERMFORHOST = 463 => "nopermforhost",
    ERR_PASSWDMISMATCH = 464 => "passwdmismatch",
    ERR_YOUREBANNEDCREEP = 465 => "yourebannedcreep",
    ERR_YOUWILLBEBANNED = 466 => "youwillbebanned",
    ERR_KEYSET = 467 => "keyset",
    ERR_CHANNELISFULL = 471 => "channelisfull",
    ERR_UNKNOWNMODE = 472 => "unknownmode",
    ERR_INVITEONLYCHAN = 473 => "inviteonlychan",
    ERR_BANNEDFROMCHAN = 474 => "bannedfromchan",
    ERR_BADCHANNELKEY = 475 => "badchannelkey",
    ERR_BADCHANMASK = 476 => "badchanmask",
    ERR_NOCHANMODES = 477 => "nochanmodes",
    ERR_BANLISTFULL = 478 => "banlistfull",
    ERR_NOPRIVILEGES = 481 => "noprivileges",
    ERR_CHANOPRIVSNEEDED = 482 => "chanoprivsneeded",
    ERR_CANTKILLSERVER = 483 => "cantkillserver",
    ERR_RESTRICTED = 484 => "restricted",
    ERR_UNIQOPPRIVSNEEDED = 485 => "uniqopprivsneeded",
    ERR_NOOPERHOST = 491 => "nooperhost",
    ERR_NOSERVICEHOST = 492 => "noservicehost",
    ERR_UMODEUNKNOWNFLAG = 501 => "umodeunknownflag",
    ERR_USERSDONTMATCH = 502 => "usersdontmatch",
}

impl Response {
    /// The numeric code.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether this is an error reply (400-599).
    #[inline]
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl FromStr for Response {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(());
        }
        s.parse::<u16>().ok().and_then(Response::from_code).ok_or(())
    }
}

/// Whether `command` is a three-digit numeric token.
pub fn is_numeric(command: &str) -> bool {
    command.len() == 3 && command.bytes().all(|b| b.is_ascii_digit())
}

/// Map a command token to its event name.
///
/// Known numerics become their symbolic name, unknown numerics stay as they
/// are, and word commands are lowercased.
pub fn event_name(command: &str) -> String {
    match command.parse::<Response>() {
        Ok(resp) => resp.event_name().to_owned(),
        Err(()) => command.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_numerics() {
        assert_eq!(event_name("001"), "welcome");
        assert_eq!(event_name("005"), "featurelist");
        assert_eq!(event_name("353"), "namreply");
        assert_eq!(event_name("433"), "nicknameinuse");
        assert_eq!(event_name("354"), "whospcrpl");
    }

    #[test]
    fn test_unknown_numeric_is_kept() {
        assert_eq!(event_name("900"), "900");
        assert_eq!(event_name("042"), "042");
    }

    #[test]
    fn test_word_commands_are_lowercased() {
        assert_eq!(event_name("PRIVMSG"), "privmsg");
        assert_eq!(event_name("Join"), "join");
    }

    #[test]
    fn test_codes() {
        assert_eq!(Response::RPL_WELCOME.code(), 1);
        assert_eq!(Response::from_code(433), Some(Response::ERR_NICKNAMEINUSE));
        assert!(Response::ERR_NICKNAMEINUSE.is_error());
        assert!(!Response::RPL_BANLIST.is_error());
        assert!("12".parse::<Response>().is_err());
    }
}
