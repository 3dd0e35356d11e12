//! Change notifications.
//!
//! Observers are plain closures registered on the registry. Every event is
//! delivered synchronously, in registration order, before the operation that
//! caused it returns.

use std::fmt;

/// What happened to an autostart entry, keyed by file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEvent {
    Added(String),
    Changed(String),
    Removed(String),
}

impl EntryEvent {
    pub fn filename(&self) -> &str {
        match self {
            EntryEvent::Added(name) | EntryEvent::Changed(name) | EntryEvent::Removed(name) => {
                name
            }
        }
    }
}

impl fmt::Display for EntryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryEvent::Added(name) => write!(f, "added {}", name),
            EntryEvent::Changed(name) => write!(f, "changed {}", name),
            EntryEvent::Removed(name) => write!(f, "removed {}", name),
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Observer = Box<dyn FnMut(&EntryEvent)>;

/// Registered observers.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns whether the subscription existed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn emit(&mut self, event: EntryEvent) {
        log::debug!("Notify: {}", event);
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}
