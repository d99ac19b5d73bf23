//! Realtime push hub.
//!
//! Listeners register with the [`PushHub`] and receive serialized
//! [`PushMessage`](heatmap_server_models::PushMessage) payloads through a
//! bounded channel. A single ticker task ([`run_ticker`]) generates one
//! snapshot per interval and broadcasts it to every listener, so the
//! generation cost does not grow with the number of subscribers.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::views;

/// Identifier handed out to each listener.
pub type ListenerId = u64;

/// Pending messages a listener may buffer before ticks are skipped for it.
pub const LISTENER_BUFFER: usize = 8;

/// A registered listener's receiving side.
#[derive(Debug)]
pub struct Subscription {
    /// Id to pass to [`PushHub::unsubscribe`].
    pub id: ListenerId,
    /// Serialized push payloads.
    pub rx: mpsc::Receiver<Arc<str>>,
}

/// Delivery counts for one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Listeners that accepted the payload.
    pub delivered: usize,
    /// Listeners whose buffer was full; they stay registered.
    pub skipped: usize,
    /// Listeners whose receiver was gone; they were unregistered.
    pub removed: usize,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: ListenerId,
    listeners: BTreeMap<ListenerId, mpsc::Sender<Arc<str>>>,
}

/// Process-wide set of realtime listeners.
#[derive(Debug, Clone, Default)]
pub struct PushHub {
    registry: Arc<Mutex<Registry>>,
}

impl PushHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new listener.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(LISTENER_BUFFER);
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, tx);
        log::info!(
            "Listener {id} subscribed ({} active)",
            registry.listeners.len()
        );
        Subscription { id, rx }
    }

    /// Unregisters a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let removed = registry.listeners.remove(&id).is_some();
        if removed {
            log::info!(
                "Listener {id} unsubscribed ({} active)",
                registry.listeners.len()
            );
        }
        removed
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Offers `payload` to every listener without waiting.
    ///
    /// A listener with a full buffer misses this payload but stays
    /// registered. A listener whose receiver has been dropped is removed.
    pub fn broadcast(&self, payload: &Arc<str>) -> BroadcastOutcome {
        let mut registry = self.lock();
        let mut outcome = BroadcastOutcome::default();
        let mut closed = Vec::new();

        for (&id, tx) in &registry.listeners {
            match tx.try_send(Arc::clone(payload)) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    log::debug!("Listener {id} is lagging, skipping this update");
                    outcome.skipped += 1;
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        for id in closed {
            registry.listeners.remove(&id);
            log::debug!("Listener {id} is gone, removed from hub");
            outcome.removed += 1;
        }

        outcome
    }
}

/// Broadcasts a fresh snapshot to every listener once per `interval`,
/// forever. Ticks with no listeners skip generation entirely.
pub async fn run_ticker(hub: PushHub, interval: Duration, point_limit: usize) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if hub.listener_count() == 0 {
            continue;
        }

        let Some(payload) = snapshot(point_limit) else {
            continue;
        };
        let outcome = hub.broadcast(&payload);
        log::trace!("Push tick: {outcome:?}");
    }
}

fn snapshot(point_limit: usize) -> Option<Arc<str>> {
    let message = views::push_update(&mut rand::thread_rng(), point_limit);
    match serde_json::to_string(&message) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            log::error!("Failed to serialize push update: {e}");
            None
        }
    }
}
