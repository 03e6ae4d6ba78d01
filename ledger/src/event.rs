//! Events emitted after each successful ledger operation.

use learnopoly_types::{CourseId, Identity, PostId};
use serde::Serialize;

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
///
/// Exactly one event per successful mutation; rejected operations emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LedgerEvent {
    ProfileCreated {
        owner: Identity,
        username: String,
    },
    ProfileUpdated {
        owner: Identity,
    },
    ReputationIncreased {
        target: Identity,
        amount: u64,
        /// Reputation after the increase.
        reputation: u64,
    },
    CourseCreated {
        id: CourseId,
        creator: Identity,
    },
    Enrolled {
        student: Identity,
        course: CourseId,
        enrollment_count: u64,
    },
    PostCreated {
        id: PostId,
        author: Identity,
    },
    PostLiked {
        id: PostId,
        liker: Identity,
        likes: u64,
    },
    /// A mutual connection; both adjacency lists were extended.
    ConnectionAdded {
        from: Identity,
        to: Identity,
    },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the writing thread, after the batch is
/// committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn alice() -> Identity {
        Identity::new([0xA1; 20])
    }

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&LedgerEvent::ProfileUpdated { owner: alice() });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&LedgerEvent::PostCreated {
            id: PostId::FIRST,
            author: alice(),
        });
    }

    #[test]
    fn listener_sees_event_payload() {
        let likes_seen = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let seen = Arc::clone(&likes_seen);
        bus.subscribe(Box::new(move |event| {
            if let LedgerEvent::PostLiked { likes, .. } = event {
                seen.store(*likes as usize, Ordering::SeqCst);
            }
        }));

        bus.emit(&LedgerEvent::PostLiked {
            id: PostId::FIRST,
            liker: alice(),
            likes: 7,
        });

        assert_eq!(likes_seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn default_creates_empty_bus() {
        let bus = EventBus::default();
        assert_eq!(bus.listener_count(), 0);
    }
}
