//! Rate-limited outbound queue and its drainer task.
//!
//! Urgent lines are written as soon as the drainer wakes; normal lines go
//! out one per `message_delay` tick, oldest first. A line is removed from
//! the queue before it is written, so a slow write never duplicates it.

use std::collections::VecDeque;

use futures_util::SinkExt;
use parking_lot::Mutex;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Notify;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::codec::FramedWrite;
use tracing::{debug, trace, warn};

use super::Client;
use crate::line::LineFramer;

/// Sink type the drainer writes to.
pub(crate) type LineSink = FramedWrite<OwnedWriteHalf, LineFramer>;

#[derive(Debug, Default)]
struct Queues {
    urgent: VecDeque<String>,
    normal: VecDeque<String>,
}

/// Pending outbound lines, shared between the command API and the drainer.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    queues: Mutex<Queues>,
    wake: Notify,
}

impl OutboundQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a line. Urgent lines wake the drainer immediately.
    pub fn push(&self, line: String, urgent: bool) {
        {
            let mut queues = self.queues.lock();
            if urgent {
                queues.urgent.push_back(line);
            } else {
                queues.normal.push_back(line);
            }
        }
        if urgent {
            self.wake.notify_one();
        }
    }

    /// Take the oldest urgent line.
    pub fn pop_urgent(&self) -> Option<String> {
        self.queues.lock().urgent.pop_front()
    }

    /// Take the oldest normal line.
    pub fn pop_normal(&self) -> Option<String> {
        self.queues.lock().normal.pop_front()
    }

    /// Snapshot of every pending line, urgent ones first.
    pub fn snapshot(&self) -> Vec<String> {
        let queues = self.queues.lock();
        queues
            .urgent
            .iter()
            .chain(queues.normal.iter())
            .cloned()
            .collect()
    }

    /// Number of pending lines.
    pub fn len(&self) -> usize {
        let queues = self.queues.lock();
        queues.urgent.len() + queues.normal.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pending line.
    pub fn clear(&self) {
        let mut queues = self.queues.lock();
        queues.urgent.clear();
        queues.normal.clear();
    }

    /// Wake the drainer without queueing anything.
    pub(crate) fn wake(&self) {
        self.wake.notify_one();
    }

    async fn woken(&self) {
        self.wake.notified().await
    }
}

async fn write_line(sink: &mut LineSink, line: String) -> crate::error::Result<()> {
    trace!("-> {}", line);
    sink.send(line).await
}

/// Drain the queue onto `sink` until session `session` ends.
///
/// Once the session is over nothing more is taken from the queue, which
/// already belongs to whichever session comes next; only the session's own
/// QUIT is written before the write half is closed.
pub(crate) async fn run_drainer(client: Client, mut sink: LineSink, session: u64) {
    let queue = client.queue();
    let mut state_rx = client.watch_state();
    let mut tick = interval(client.config().message_delay);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if !client.session_alive(session) {
            if let Some(line) = client.take_farewell(session) {
                if let Err(err) = write_line(&mut sink, line).await {
                    debug!(error = %err, "QUIT not delivered");
                }
            }
            if let Err(err) = sink.close().await {
                debug!(error = %err, "closing write half failed");
            }
            debug!(session, "drainer stopped");
            return;
        }

        if let Some(line) = queue.pop_urgent() {
            if !deliver(&client, &mut sink, line, session).await {
                return;
            }
            continue;
        }

        tokio::select! {
            _ = queue.woken() => {}
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            _ = tick.tick() => {
                if let Some(line) = queue.pop_normal() {
                    if !deliver(&client, &mut sink, line, session).await {
                        return;
                    }
                }
            }
        }
    }
}

/// Write one line; a failure resets the session it belongs to.
async fn deliver(client: &Client, sink: &mut LineSink, line: String, session: u64) -> bool {
    match write_line(sink, line).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "write failed");
            if client.is_current_session(session) {
                client.disconnect("Connection reset by peer.");
            }
            false
        }
    }
}
