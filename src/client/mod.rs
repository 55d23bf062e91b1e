//! The tokio session: connection lifecycle, outbound queue, dispatch and
//! the built-in state handlers.
//!
//! [`Client`] is a cheap, cloneable handle. Every clone talks to the same
//! session.
//!
//! # Example
//!
//! ```no_run
//! use slirc_client::{Client, ClientConfig, ConnectParams, Priority};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::default())?;
//! client.subscribe("pubmsg", Priority::Normal, |client, event| {
//!     if event.words().first() == Some(&"!ping") {
//!         if let Some(target) = event.reply_target() {
//!             client.privmsg(target, "pong")?;
//!         }
//!     }
//!     Ok(())
//! });
//! let supervisor = client.connect(ConnectParams::new("irc.libera.chat", 6667, "slirc", "slirc", "slirc bot"));
//! supervisor.await?;
//! # Ok(())
//! # }
//! ```

mod commands;
mod connection;
mod handlers;
mod outbound;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Notify};
use tokio::time::Instant;
use tracing::{debug, trace};

pub use self::outbound::OutboundQueue;

use crate::casemap::CaseMapping;
use crate::config::{ClientConfig, ConnectParams};
use crate::dispatch::{Dispatcher, HandlerId, HandlerResult, Priority};
use crate::error::{ClientError, ProtocolError};
use crate::event::{translate, Event};
use crate::isupport::FeatureSet;
use crate::message::Message;
use crate::state::{Channel, ChannelMap, ConnectionState, User};

#[derive(Debug, Default)]
struct Session {
    params: Option<ConnectParams>,
    nick: String,
    nick_retries: u32,
}

struct Shared {
    config: ClientConfig,
    encoding: &'static encoding::Encoding,
    dispatcher: Dispatcher<Client>,
    session: Mutex<Session>,
    features: RwLock<FeatureSet>,
    channels: RwLock<ChannelMap>,
    queue: OutboundQueue,
    /// QUIT line owed to a session that is being torn down.
    farewell: Mutex<Option<(u64, String)>>,
    state: watch::Sender<ConnectionState>,
    last_activity: Mutex<Instant>,
    generation: AtomicU64,
    session_id: AtomicU64,
    stopped: AtomicBool,
    stop: Notify,
}

/// Handle to an IRC session.
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state())
            .field("nickname", &self.nickname())
            .field("queued", &self.shared.queue.len())
            .finish()
    }
}

impl Client {
    /// Create a disconnected client with the built-in handlers installed.
    ///
    /// Fails if `config.encoding` is not a known encoding label.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let encoding = encoding::Encoding::for_label(config.encoding.as_bytes())
            .ok_or_else(|| ProtocolError::UnknownEncoding(config.encoding.clone()))?;
        let (state, _) = watch::channel(ConnectionState::Disconnected);

        let client = Client {
            shared: Arc::new(Shared {
                config,
                encoding,
                dispatcher: Dispatcher::new(),
                session: Mutex::new(Session::default()),
                features: RwLock::new(FeatureSet::new()),
                channels: RwLock::new(ChannelMap::new()),
                queue: OutboundQueue::new(),
                farewell: Mutex::new(None),
                state,
                last_activity: Mutex::new(Instant::now()),
                generation: AtomicU64::new(0),
                session_id: AtomicU64::new(0),
                stopped: AtomicBool::new(false),
                stop: Notify::new(),
            }),
        };
        handlers::install(&client);
        Ok(client)
    }

    /// Engine tunables.
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.borrow()
    }

    /// A receiver that observes every lifecycle transition.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.shared.state.send_replace(state);
        if previous != state {
            debug!(?previous, ?state, "connection state");
        }
    }

    /// Our current nickname: the server-confirmed one once registered.
    pub fn nickname(&self) -> String {
        self.shared.session.lock().nick.clone()
    }

    /// Whether `nick` is us, under the server's case mapping.
    pub fn is_me(&self, nick: &str) -> bool {
        let mapping = self.case_mapping();
        mapping.equals(&self.shared.session.lock().nick, nick)
    }

    /// The negotiated `CASEMAPPING`, `rfc1459` until the server says
    /// otherwise.
    pub fn case_mapping(&self) -> CaseMapping {
        self.with_features(|f| CaseMapping::from_token(f.casemapping()))
    }

    /// Server of the current (or last) session.
    pub fn server(&self) -> String {
        self.shared
            .session
            .lock()
            .params
            .as_ref()
            .map(|p| p.server.clone())
            .unwrap_or_default()
    }

    /// Parameters of the current (or last) session.
    pub fn params(&self) -> Option<ConnectParams> {
        self.shared.session.lock().params.clone()
    }

    /// Snapshot of the negotiated features.
    pub fn features(&self) -> FeatureSet {
        self.shared.features.read().clone()
    }

    /// Run `f` against the negotiated features without cloning them.
    pub fn with_features<R>(&self, f: impl FnOnce(&FeatureSet) -> R) -> R {
        f(&self.shared.features.read())
    }

    /// Snapshot of a joined channel.
    pub fn find_channel(&self, name: &str) -> Option<Channel> {
        self.shared.channels.read().get(name).cloned()
    }

    /// Snapshot of a channel member.
    pub fn find_user(&self, channel: &str, nick: &str) -> Option<User> {
        self.shared.channels.read().find_user(channel, nick).cloned()
    }

    /// Snapshot of the first record of `nick` in any channel.
    pub fn find_user_anywhere(&self, nick: &str) -> Option<User> {
        self.shared.channels.read().find_user_anywhere(nick).cloned()
    }

    /// Snapshot of every joined channel.
    pub fn channels(&self) -> Vec<Channel> {
        self.shared.channels.read().iter().cloned().collect()
    }

    /// Run `f` against the channel map without cloning it.
    pub fn with_channels<R>(&self, f: impl FnOnce(&ChannelMap) -> R) -> R {
        f(&self.shared.channels.read())
    }

    /// The outbound queue.
    pub fn queue(&self) -> &OutboundQueue {
        &self.shared.queue
    }

    /// Lines waiting to be written, urgent ones first.
    pub fn queued_lines(&self) -> Vec<String> {
        self.shared.queue.snapshot()
    }

    /// Subscribe to events of `kind`.
    pub fn subscribe<F>(&self, kind: &str, priority: Priority, handler: F) -> HandlerId
    where
        F: Fn(&Client, &Event) -> HandlerResult + Send + Sync + 'static,
    {
        self.shared.dispatcher.subscribe(kind, priority, handler)
    }

    /// Remove a handler.
    pub fn unsubscribe(&self, handle: &HandlerId) -> bool {
        self.shared.dispatcher.unsubscribe(handle)
    }

    /// Dispatch an event to its subscribers.
    ///
    /// `ping` and `pong` refresh the liveness timestamp first.
    pub fn dispatch(&self, event: &Event) {
        if event.kind == "ping" || event.kind == "pong" {
            self.touch();
        }
        self.shared.dispatcher.dispatch(self, event);
    }

    fn touch(&self) {
        *self.shared.last_activity.lock() = Instant::now();
    }

    fn last_activity(&self) -> Instant {
        *self.shared.last_activity.lock()
    }

    /// Process one received line: the raw diagnostic event, parsing,
    /// protocol bookkeeping, then dispatch of the translated events.
    ///
    /// Lines that do not parse are dropped.
    pub fn handle_line(&self, line: &str) {
        trace!("<- {}", line);
        self.dispatch(&Event::raw(&self.server(), line));

        let msg = match Message::parse(line) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(error = %err, line, "dropping unparsable line");
                return;
            }
        };

        self.observe(&msg);
        for event in translate(&msg) {
            self.dispatch(&event);
        }
    }

    /// Bookkeeping that must happen before any handler sees the line.
    fn observe(&self, msg: &Message) {
        match msg.event_name().as_str() {
            "welcome" => {
                if let Some(nick) = msg.params.first() {
                    let mut session = self.shared.session.lock();
                    session.nick = nick.clone();
                    session.nick_retries = 0;
                }
                self.set_state(ConnectionState::Active);
            }
            "nick" => {
                if let (Some(old), Some(new)) = (msg.source_nickname(), msg.params.first()) {
                    let mapping = self.case_mapping();
                    let mut session = self.shared.session.lock();
                    if mapping.equals(&session.nick, old) {
                        session.nick = new.clone();
                    }
                }
            }
            "featurelist" => self.shared.features.write().load(&msg.params),
            _ => {}
        }
    }

    pub(crate) fn is_current_session(&self, session: u64) -> bool {
        self.shared.session_id.load(Ordering::SeqCst) == session
    }

    pub(crate) fn session_alive(&self, session: u64) -> bool {
        self.is_current_session(session) && self.state().is_connected()
    }

    /// The QUIT line left for `session` by [`disconnect`](Client::disconnect).
    pub(crate) fn take_farewell(&self, session: u64) -> Option<String> {
        let mut farewell = self.shared.farewell.lock();
        match farewell.take() {
            Some((owner, line)) if owner == session => Some(line),
            other => {
                *farewell = other;
                None
            }
        }
    }
}
