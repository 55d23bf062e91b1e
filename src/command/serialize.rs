use std::fmt::{self, Write};

use super::types::Command;

/// Write a command followed by its present, non-empty middle parameters.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[Option<&str>]) -> fmt::Result {
    f.write_str(cmd)?;
    for arg in args.iter().flatten() {
        if !arg.is_empty() {
            f.write_char(' ')?;
            f.write_str(arg)?;
        }
    }
    Ok(())
}

/// Write a command with a freeform (always colon-prefixed) trailing argument.
fn write_cmd_freeform(
    f: &mut fmt::Formatter<'_>,
    cmd: &str,
    args: &[Option<&str>],
    trailing: Option<&str>,
) -> fmt::Result {
    write_cmd(f, cmd, args)?;
    if let Some(trailing) = trailing {
        f.write_str(" :")?;
        f.write_str(trailing)?;
    }
    Ok(())
}

fn joined(items: &[String], sep: &str) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(sep))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(n) => write_cmd(f, "NICK", &[Some(n.as_str())]),
            Command::USER(u, r) => write_cmd_freeform(f, "USER", &[Some(u.as_str()), Some("* *")], Some(r.as_str())),
            Command::OPER(u, p) => write_cmd(f, "OPER", &[Some(u.as_str()), Some(p.as_str())]),
            Command::QUIT(m) => write_cmd_freeform(f, "QUIT", &[], Some(m.as_str())),
            Command::SQUIT(s, c) => write_cmd_freeform(f, "SQUIT", &[Some(s.as_str())], c.as_deref()),
            Command::CAP(sub, args) => {
                f.write_str("CAP ")?;
                f.write_str(sub.as_str())?;
                // With more than one capability the first carries the
                // multi-parameter sentinel.
                for (i, arg) in args.iter().enumerate() {
                    f.write_char(' ')?;
                    if i == 0 && args.len() > 1 {
                        f.write_char(':')?;
                    }
                    f.write_str(arg)?;
                }
                Ok(())
            }
            Command::JOIN(c) => write_cmd(f, "JOIN", &[Some(c.as_str())]),
            Command::PART(c, m) => write_cmd_freeform(f, "PART", &[Some(c.as_str())], m.as_deref()),
            Command::MODE(t, m) => write_cmd(f, "MODE", &[Some(t.as_str()), Some(m.as_str())]),
            Command::TOPIC(c, t) => write_cmd_freeform(f, "TOPIC", &[Some(c.as_str())], t.as_deref()),
            Command::NAMES(chans) => write_cmd(f, "NAMES", &[joined(chans, ",").as_deref()]),
            Command::LIST(chans, server) => write_cmd(
                f,
                "LIST",
                &[joined(chans, ",").as_deref(), server.as_deref()],
            ),
            Command::INVITE(n, c) => write_cmd(f, "INVITE", &[Some(n.as_str()), Some(c.as_str())]),
            Command::KICK(c, n, comment) => {
                write_cmd_freeform(f, "KICK", &[Some(c.as_str()), Some(n.as_str())], comment.as_deref())
            }
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[Some(t.as_str())], Some(m.as_str())),
            Command::NOTICE(t, m) => write_cmd_freeform(f, "NOTICE", &[Some(t.as_str())], Some(m.as_str())),
            Command::MOTD(s) => write_cmd(f, "MOTD", &[s.as_deref()]),
            Command::LUSERS(s) => write_cmd(f, "LUSERS", &[s.as_deref()]),
            Command::VERSION(s) => write_cmd(f, "VERSION", &[s.as_deref()]),
            Command::STATS(q, s) => write_cmd(f, "STATS", &[Some(q.as_str()), s.as_deref()]),
            Command::LINKS(r, m) => write_cmd(f, "LINKS", &[r.as_deref(), m.as_deref()]),
            Command::TIME(s) => write_cmd(f, "TIME", &[s.as_deref()]),
            Command::TRACE(t) => write_cmd(f, "TRACE", &[t.as_deref()]),
            Command::INFO(s) => write_cmd(f, "INFO", &[s.as_deref()]),
            Command::WHO(t, o) => write_cmd(f, "WHO", &[t.as_deref(), o.as_deref()]),
            Command::WHOIS(n) => write_cmd(f, "WHOIS", &[joined(n, ",").as_deref()]),
            Command::WHOWAS(n, c, s) => {
                write_cmd(f, "WHOWAS", &[Some(n.as_str()), c.as_deref(), s.as_deref()])
            }
            Command::USERHOST(n) => write_cmd(f, "USERHOST", &[joined(n, ",").as_deref()]),
            Command::ISON(n) => write_cmd(f, "ISON", &[joined(n, " ").as_deref()]),
            Command::USERS(s) => write_cmd(f, "USERS", &[s.as_deref()]),
            Command::PONG(t) => write_cmd_freeform(f, "PONG", &[], Some(t.as_str())),
            Command::WALLOPS(t) => write_cmd_freeform(f, "WALLOPS", &[], Some(t.as_str())),
            Command::GLOBOPS(t) => write_cmd_freeform(f, "GLOBOPS", &[], Some(t.as_str())),
            Command::Raw(line) => f.write_str(line),
        }
    }
}
