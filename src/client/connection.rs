//! Connection lifecycle: supervisor, session start-up, read loop and
//! teardown.
//!
//! One supervisor task owns the connect → run → backoff → reconnect loop.
//! Each successful connect starts a session made of two tasks, the reader
//! and the queue drainer, which both stop once the published state leaves
//! `Registering`/`Active` or a newer session replaces theirs.

use std::sync::atomic::Ordering;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use super::outbound::run_drainer;
use super::Client;
use crate::command::Command;
use crate::config::ConnectParams;
use crate::error::ClientError;
use crate::event::Event;
use crate::isupport::FeatureSet;
use crate::line::LineFramer;
use crate::state::ConnectionState;

impl Client {
    /// Connect to a server and keep the session alive.
    ///
    /// An active session is first disconnected with `"Changing servers"`.
    /// Failed connects are retried every `reconnect_delay`; a dropped
    /// session is re-established the same way. The returned task ends only
    /// when [`shutdown`](Client::shutdown) is called or a later `connect`
    /// supersedes it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(&self, params: ConnectParams) -> JoinHandle<()> {
        if self.state().is_connected() {
            self.disconnect("Changing servers");
        }

        self.shared.session.lock().params = Some(params);
        self.shared.stopped.store(false, Ordering::SeqCst);
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.stop.notify_waiters();

        let client = self.clone();
        tokio::spawn(async move { client.supervise(generation).await })
    }

    /// Connect again with the parameters of the last [`connect`](Client::connect).
    pub fn reconnect(&self) -> Result<JoinHandle<()>, ClientError> {
        let params = self.params().ok_or(ClientError::NoSession)?;
        Ok(self.connect(params))
    }

    /// End the current session: QUIT is sent urgently, the transport is
    /// closed and a `disconnect` event is dispatched.
    ///
    /// Does nothing unless registering or active. The supervisor
    /// reconnects afterwards; use [`shutdown`](Client::shutdown) to stop
    /// for good.
    pub fn disconnect(&self, reason: &str) {
        let quit = Command::QUIT(reason.to_owned()).to_string();
        let claimed = self.shared.state.send_if_modified(|state| {
            if state.is_connected() {
                // Left for this session's drainer, never in the shared queue
                // the next session starts from.
                let session = self.shared.session_id.load(Ordering::SeqCst);
                *self.shared.farewell.lock() = Some((session, quit));
                *state = ConnectionState::Disconnecting;
                true
            } else {
                false
            }
        });
        if !claimed {
            return;
        }

        info!(reason, "disconnecting");
        self.dispatch(&Event::disconnect(&self.server(), reason));
        self.set_state(ConnectionState::Disconnected);
        self.shared.queue.wake();
    }

    /// Disconnect and stop the supervisor.
    pub fn shutdown(&self, reason: &str) {
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.stop.notify_waiters();
        self.disconnect(reason);
    }

    fn superseded(&self, generation: u64) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
            || self.shared.generation.load(Ordering::SeqCst) != generation
    }

    /// Sleep for the reconnect backoff, cut short by shutdown or a new
    /// `connect`.
    async fn backoff(&self, generation: u64) {
        // Registered before the check so a concurrent notify_waiters is not lost.
        let stop = self.shared.stop.notified();
        if self.superseded(generation) {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.config().reconnect_delay) => {}
            _ = stop => {}
        }
    }

    async fn supervise(self, generation: u64) {
        loop {
            if self.superseded(generation) {
                return;
            }
            let Some(params) = self.params() else {
                return;
            };

            self.set_state(ConnectionState::Connecting);
            info!(server = %params.server, port = params.port, "connecting");

            let stream = match TcpStream::connect((params.server.as_str(), params.port)).await {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(
                        server = %params.server,
                        error = %err,
                        "cannot connect, retrying in {:?}",
                        self.config().reconnect_delay
                    );
                    if !self.superseded(generation) {
                        self.set_state(ConnectionState::Disconnected);
                    }
                    self.backoff(generation).await;
                    continue;
                }
            };
            if self.superseded(generation) {
                return;
            }

            let reader = self.start_session(stream, &params);
            if let Err(err) = reader.await {
                warn!(error = %err, "reader task failed");
                self.set_state(ConnectionState::Disconnected);
            }

            if self.superseded(generation) {
                return;
            }
            info!(
                "disconnected from server, reconnecting in {:?}",
                self.config().reconnect_delay
            );
            self.backoff(generation).await;
        }
    }

    fn start_session(&self, stream: TcpStream, params: &ConnectParams) -> JoinHandle<()> {
        if self.config().tcp_keepalive {
            if let Err(err) = enable_keepalive(&stream) {
                warn!(error = %err, "failed to enable TCP keepalive");
            }
        }

        let session = self.shared.session_id.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.shared.session.lock();
            state.nick = params.nick.clone();
            state.nick_retries = 0;
        }
        *self.shared.features.write() = FeatureSet::new();
        self.shared.channels.write().clear();
        self.shared.queue.clear();
        self.touch();
        self.set_state(ConnectionState::Registering);
        info!(server = %params.server, session, "connected");

        let (read_half, write_half) = stream.into_split();
        let encoding = self.shared.encoding;
        let lines = FramedRead::new(read_half, LineFramer::with_encoding(encoding));
        let sink = FramedWrite::new(write_half, LineFramer::with_encoding(encoding));

        tokio::spawn(run_drainer(self.clone(), sink, session));
        let reader = tokio::spawn(self.clone().read_loop(lines, session));

        self.dispatch(&Event::connect());
        let registration = [
            Command::USER(params.user.clone(), params.realname.clone()),
            Command::NICK(params.nick.clone()),
        ];
        for command in registration {
            if let Err(err) = self.send_urgent(command) {
                warn!(error = %err, "cannot queue registration");
            }
        }

        reader
    }

    /// Transport loss: mark the session gone without synthesizing events.
    fn drop_session(&self, session: u64) {
        if self.session_alive(session) {
            self.set_state(ConnectionState::Disconnected);
            self.shared.queue.wake();
        }
    }

    async fn read_loop(self, mut lines: FramedRead<OwnedReadHalf, LineFramer>, session: u64) {
        let mut state_rx = self.watch_state();

        while self.session_alive(session) {
            let timeout = self.config().random_idle_timeout();
            let deadline = self.last_activity() + timeout;

            tokio::select! {
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = tokio::time::sleep_until(deadline) => {
                    let idle = self.last_activity().elapsed();
                    if idle >= timeout {
                        warn!(idle = ?idle, "no ping from server");
                        self.disconnect(&format!("Pong timeout: {} seconds", idle.as_secs()));
                    }
                }
                frame = lines.next() => match frame {
                    Some(Ok(line)) => {
                        if !line.is_empty() {
                            self.handle_line(&line);
                        }
                    }
                    Some(Err(err)) => {
                        warn!(error = %err, "read failed");
                        self.drop_session(session);
                    }
                    None => {
                        info!("server closed the connection");
                        self.drop_session(session);
                    }
                }
            }
        }
        debug!(session, "reader stopped");
    }
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    use socket2::{SockRef, TcpKeepalive};

    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}
