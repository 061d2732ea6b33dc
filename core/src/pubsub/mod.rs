//! Named-event publish/subscribe channel.
//!
//! The set of event names is fixed when the bus is built. Delivery is
//! synchronous: `publish` returns after every subscriber has run, in the
//! order they subscribed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("Event {0} does not exist.")]
    UnknownEvent(String),
}

pub type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubscriberId(u64);

struct Subscriber<P> {
    id: SubscriberId,
    callback: Callback<P>,
}

struct Registry<P> {
    channels: HashMap<String, Vec<Subscriber<P>>>,
    next_id: u64,
}

impl<P> Registry<P> {
    fn channel_mut(&mut self, event: &str) -> Result<&mut Vec<Subscriber<P>>, BusError> {
        self.channels
            .get_mut(event)
            .ok_or_else(|| BusError::UnknownEvent(event.to_string()))
    }
}

pub struct EventBus<P> {
    registry: Arc<Mutex<Registry<P>>>,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry) }
    }
}

impl<P: 'static> EventBus<P> {
    pub fn new<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels = events.into_iter().map(|name| (name.into(), Vec::new())).collect();
        Self {
            registry: Arc::new(Mutex::new(Registry { channels, next_id: 0 })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry<P>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `callback` for `event`.
    ///
    /// With a non-zero `max_subscribers` that is already reached, the callback
    /// is dropped and an inert handle is returned instead.
    pub fn subscribe<F>(
        &self,
        event: &str,
        callback: F,
        max_subscribers: Option<usize>,
    ) -> Result<Unsubscribe<P>, BusError>
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let next_id = registry.next_id;
        let channel = registry.channel_mut(event)?;

        if let Some(max) = max_subscribers.filter(|max| *max > 0) {
            if channel.len() >= max {
                return Ok(Unsubscribe {
                    registry: Weak::new(),
                    event: event.to_string(),
                    id: None,
                });
            }
        }

        let id = SubscriberId(next_id);
        channel.push(Subscriber { id, callback: Arc::new(callback) });
        registry.next_id += 1;

        Ok(Unsubscribe {
            registry: Arc::downgrade(&self.registry),
            event: event.to_string(),
            id: Some(id),
        })
    }

    /// Calls every subscriber of `event` with `payload`.
    ///
    /// Subscribers are snapshotted before the first one runs, so changes made
    /// from inside a callback apply to the next publish.
    pub fn publish(&self, event: &str, payload: &P) -> Result<(), BusError> {
        let callbacks: Vec<Callback<P>> = {
            let mut registry = self.lock();
            registry
                .channel_mut(event)?
                .iter()
                .map(|subscriber| Arc::clone(&subscriber.callback))
                .collect()
        };

        for callback in callbacks {
            callback(payload);
        }
        Ok(())
    }

    pub fn subscriber_count(&self, event: &str) -> Result<usize, BusError> {
        Ok(self.lock().channel_mut(event)?.len())
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.lock().channels.contains_key(event)
    }
}

/// Handle returned by [`EventBus::subscribe`]. Calling it more than once is harmless.
pub struct Unsubscribe<P> {
    registry: Weak<Mutex<Registry<P>>>,
    event: String,
    id: Option<SubscriberId>,
}

impl<P> Unsubscribe<P> {
    pub fn unsubscribe(&self) {
        let Some(id) = self.id else {
            return;
        };
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(channel) = registry.channels.get_mut(&self.event) {
            channel.retain(|subscriber| subscriber.id != id);
        }
    }

    /// False when the callback was never registered because the cap was reached.
    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}

impl<P> std::fmt::Debug for Unsubscribe<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("event", &self.event)
            .field("registered", &self.id.is_some())
            .finish()
    }
}
