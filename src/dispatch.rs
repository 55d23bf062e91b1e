//! Event publish/subscribe registry.
//!
//! Handlers subscribe to an event kind with a [`Priority`]. On dispatch,
//! every `High` handler runs before every `Normal` one, and handlers of
//! the same tier run in registration order. Each invocation is isolated:
//! an `Err` or a panic is logged and the next handler still runs, so
//! [`Dispatcher::dispatch`] never fails.
//!
//! The handler list is snapshotted before invocation, so handlers may
//! subscribe or unsubscribe while being dispatched.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::event::Event;

/// What a handler returns. Errors are logged and swallowed.
pub type HandlerResult = anyhow::Result<()>;

/// A subscribed callback, invoked with the dispatch context and the event.
pub type Handler<C> = Arc<dyn Fn(&C, &Event) -> HandlerResult + Send + Sync>;

/// Handler ordering tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Runs after every `High` handler.
    #[default]
    Normal,
    /// Runs first.
    High,
}

/// Token returned by [`Dispatcher::subscribe`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId {
    kind: String,
    id: u64,
}

impl HandlerId {
    /// The event kind this handler is subscribed to.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

struct Entry<C> {
    id: u64,
    priority: Priority,
    handler: Handler<C>,
}

/// Maps event kinds to ordered handler lists.
pub struct Dispatcher<C> {
    handlers: RwLock<HashMap<String, Vec<Entry<C>>>>,
    next_id: AtomicU64,
}

impl<C> Default for Dispatcher<C> {
    fn default() -> Self {
        Dispatcher {
            handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<C> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let mut counts: Vec<_> = handlers.iter().map(|(k, v)| (k.clone(), v.len())).collect();
        counts.sort();
        f.debug_struct("Dispatcher").field("handlers", &counts).finish()
    }
}

impl<C> Dispatcher<C> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe<F>(&self, kind: &str, priority: Priority, handler: F) -> HandlerId
    where
        F: Fn(&C, &Event) -> HandlerResult + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            id,
            priority,
            handler: Arc::new(handler),
        };

        let mut handlers = self.handlers.write();
        let list = handlers.entry(kind.to_owned()).or_default();
        match priority {
            Priority::High => {
                let at = list
                    .iter()
                    .position(|e| e.priority == Priority::Normal)
                    .unwrap_or(list.len());
                list.insert(at, entry);
            }
            Priority::Normal => list.push(entry),
        }

        HandlerId {
            kind: kind.to_owned(),
            id,
        }
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, handle: &HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let Some(list) = handlers.get_mut(&handle.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.id != handle.id);
        before != list.len()
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: &str) -> usize {
        self.handlers.read().get(kind).map_or(0, Vec::len)
    }

    fn snapshot(&self, kind: &str) -> Vec<Handler<C>> {
        self.handlers
            .read()
            .get(kind)
            .map(|list| list.iter().map(|e| Arc::clone(&e.handler)).collect())
            .unwrap_or_default()
    }

    /// Invoke every handler subscribed to `event.kind`.
    pub fn dispatch(&self, ctx: &C, event: &Event) {
        for handler in self.snapshot(&event.kind) {
            match catch_unwind(AssertUnwindSafe(|| handler(ctx, event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(kind = %event.kind, error = %err, "event handler failed");
                }
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_owned());
                    warn!(kind = %event.kind, panic = %msg, "event handler panicked");
                }
            }
        }
    }
}
