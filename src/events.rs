//! Session notifications
//!
//! Every `subscribe()` call gets its own channel; a subscriber that drops its
//! receiver is removed on the next publish.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::resources::ResourceSet;

#[derive(Debug, Clone, PartialEq)]
pub enum LensEvent {
    /// The current tree is about to be replaced; drop results derived from it
    BeforeUpdate,
    /// The current tree was replaced (possibly by `None`); results may be recomputed
    AfterUpdate,
    /// Resource list of the active file, `None` when it has no resources
    ResourcesUpdated(Option<Arc<ResourceSet>>),
    /// An environment failure the host should show
    Error(String),
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<LensEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<LensEvent> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    pub fn publish(&self, event: LensEvent) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if subscribers.len() < before {
            debug!("Pruned {} closed subscriber(s)", before - subscribers.len());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn clear(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_gets_events_in_order() {
        let bus = EventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(LensEvent::BeforeUpdate);
        bus.publish(LensEvent::AfterUpdate);

        for rx in [&first, &second] {
            let events: Vec<LensEvent> = rx.try_iter().collect();
            assert_eq!(events, vec![LensEvent::BeforeUpdate, LensEvent::AfterUpdate]);
        }
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(LensEvent::Error("boom".into()));
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), LensEvent::Error("boom".into()));
    }
}
