//! Topic-keyed subscriber registry.
//!
//! Decoded feed messages fan out to every callback registered under the
//! matching topic. Multiple callbacks per topic are allowed; removal is
//! by the id handed back at registration (closures carry no identity).

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use model::{ActiveSymbol, Tick, TickHistory};
use parking_lot::RwLock;

/// Subscription topic: which message kind a callback wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Tick,
    History,
    ActiveSymbols,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick => f.write_str("tick"),
            Self::History => f.write_str("history"),
            Self::ActiveSymbols => f.write_str("active_symbols"),
        }
    }
}

/// Payload delivered to subscribers of one topic.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedPayload {
    Tick(Tick),
    History(TickHistory),
    ActiveSymbols(Vec<ActiveSymbol>),
}

impl FeedPayload {
    /// The topic this payload fans out under.
    pub fn topic(&self) -> Topic {
        match self {
            Self::Tick(_) => Topic::Tick,
            Self::History(_) => Topic::History,
            Self::ActiveSymbols(_) => Topic::ActiveSymbols,
        }
    }
}

/// Handle for removing a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&FeedPayload) + Send + Sync>;

/// Fan-out registry shared between the client handle and its driver task.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<Topic, Vec<(SubscriptionId, Callback)>>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback under a topic.
    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> SubscriptionId
    where
        F: Fn(&FeedPayload) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .entry(topic)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns whether it was registered under `topic`.
    pub fn unsubscribe(&self, topic: Topic, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        match subscribers.get_mut(&topic) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|(entry_id, _)| *entry_id != id);
                entries.len() != before
            }
            None => false,
        }
    }

    /// Invoke every callback registered under the payload's topic.
    ///
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, payload: &FeedPayload) -> usize {
        let subscribers = self.subscribers.read();
        let Some(entries) = subscribers.get(&payload.topic()) else {
            return 0;
        };

        for (_, callback) in entries.iter() {
            callback(payload);
        }
        entries.len()
    }

    /// Number of callbacks currently registered under `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscribers
            .read()
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

/// Shared registry handle.
pub type SharedRegistry = Arc<SubscriberRegistry>;

pub fn create_registry() -> SharedRegistry {
    Arc::new(SubscriberRegistry::new())
}
