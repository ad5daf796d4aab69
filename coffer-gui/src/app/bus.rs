use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use tracing::error;

use crate::app::wallets::WalletIdentity;

/// Events exchanged between the shell components. The payload travels with
/// the tag so a subscriber cannot read a topic's event as another topic's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The visible pane changed. Published on every activation, including
    /// re-activating the current tab.
    TabChanged,
    /// The selected wallet changed.
    WalletSelected(WalletIdentity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    TabChanged,
    WalletSelected,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::TabChanged => Topic::TabChanged,
            Event::WalletSelected(_) => Topic::WalletSelected,
        }
    }
}

type Handler = Arc<Mutex<dyn FnMut(&Event) + Send>>;

struct Entry {
    id: u64,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// In-memory publish/subscribe channel scoped to the running UI session.
///
/// Clones share the same registry. Delivery is synchronous and in
/// subscription order for a given publish; a panicking subscriber is caught
/// and logged and does not prevent delivery to the remaining subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for `topic`. Subscriptions to the same topic are
    /// additive. The returned handle cancels the subscription; dropping it
    /// without calling [`Subscription::cancel`] leaves the handler
    /// registered for the lifetime of the bus.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: FnMut(&Event) + Send + 'static,
    {
        let mut registry = self.registry.lock().unwrap();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            topic,
            handler: Arc::new(Mutex::new(handler)),
        });
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to all current subscribers of its topic.
    pub fn publish(&self, event: Event) {
        // Snapshot the matching handlers so a subscriber may publish or
        // subscribe from within its handler without deadlocking the
        // registry.
        let handlers: Vec<Handler> = {
            let registry = self.registry.lock().unwrap();
            registry
                .entries
                .iter()
                .filter(|e| e.topic == event.topic())
                .map(|e| e.handler.clone())
                .collect()
        };
        for handler in handlers {
            let mut handler = handler.lock().unwrap();
            if catch_unwind(AssertUnwindSafe(|| (*handler)(&event))).is_err() {
                error!("subscriber panicked while handling {:?}", event.topic());
            }
        }
    }
}

/// Cancellation handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn cancel(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap();
            registry.entries.retain(|e| e.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: &str) -> WalletIdentity {
        WalletIdentity::new(name)
    }

    #[test]
    fn delivery_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let seen = seen.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                seen.lock().unwrap().push(i);
            });
        }
        bus.publish(Event::TabChanged);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn topics_are_independent_and_carry_payload() {
        let bus = EventBus::new();
        let tabs = Arc::new(Mutex::new(0));
        let wallets = Arc::new(Mutex::new(Vec::new()));
        {
            let tabs = tabs.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                *tabs.lock().unwrap() += 1;
            });
        }
        {
            let wallets = wallets.clone();
            bus.subscribe(Topic::WalletSelected, move |event| {
                if let Event::WalletSelected(w) = event {
                    wallets.lock().unwrap().push(w.name.clone());
                }
            });
        }
        bus.publish(Event::WalletSelected(identity("alice")));
        assert_eq!(*tabs.lock().unwrap(), 0);
        assert_eq!(*wallets.lock().unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn cancelled_subscription_stops_receiving() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let subscription = {
            let count = count.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                *count.lock().unwrap() += 1;
            })
        };
        bus.publish(Event::TabChanged);
        subscription.cancel();
        bus.publish(Event::TabChanged);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn panicking_subscriber_does_not_block_the_rest() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        bus.subscribe(Topic::TabChanged, |_| panic!("boom"));
        {
            let count = count.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                *count.lock().unwrap() += 1;
            });
        }
        bus.publish(Event::TabChanged);
        bus.publish(Event::TabChanged);
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn subscriber_may_publish_another_topic() {
        let bus = EventBus::new();
        let relayed = Arc::new(Mutex::new(0));
        {
            let bus2 = bus.clone();
            bus.subscribe(Topic::WalletSelected, move |_| {
                bus2.publish(Event::TabChanged);
            });
        }
        {
            let relayed = relayed.clone();
            bus.subscribe(Topic::TabChanged, move |_| {
                *relayed.lock().unwrap() += 1;
            });
        }
        bus.publish(Event::WalletSelected(identity("alice")));
        assert_eq!(*relayed.lock().unwrap(), 1);
    }
}
