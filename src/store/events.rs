//! Change notification for store consumers
//!
//! Every state-changing store operation emits exactly one [`StoreEvent`]
//! after all of its steps have been applied. Calls that change nothing emit
//! nothing.

use serde::Serialize;

use crate::domain::{FolderId, NoteId};

/// What a mutation changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    FolderAdded {
        id: FolderId,
    },
    FolderRenamed {
        id: FolderId,
    },
    /// A folder and every note inside it were removed
    FolderDeleted {
        id: FolderId,
        removed_notes: Vec<NoteId>,
        active_folder_reset: bool,
        active_note_cleared: bool,
    },
    /// A note was created; it is now the active note
    NoteAdded {
        id: NoteId,
    },
    NoteUpdated {
        id: NoteId,
    },
    NoteDeleted {
        id: NoteId,
        active_note_cleared: bool,
    },
    ActiveFolderChanged {
        id: Option<FolderId>,
    },
    ActiveNoteChanged {
        id: Option<NoteId>,
    },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StoreEvent)>;

/// Registered observers, called in subscription order
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != len_before
    }

    pub(crate) fn notify(&mut self, event: &StoreEvent) {
        for (_, callback) in self.entries.iter_mut() {
            callback(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notify_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();

        let first = seen.clone();
        observers.subscribe(Box::new(move |_| first.borrow_mut().push(1)));
        let second = seen.clone();
        observers.subscribe(Box::new(move |_| second.borrow_mut().push(2)));

        observers.notify(&StoreEvent::ActiveNoteChanged { id: None });
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut observers = Observers::default();

        let counter = count.clone();
        let id = observers.subscribe(Box::new(move |_| *counter.borrow_mut() += 1));
        observers.notify(&StoreEvent::ActiveFolderChanged { id: None });

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&StoreEvent::ActiveFolderChanged { id: None });

        assert_eq!(*count.borrow(), 1);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn event_serializes_with_tag() {
        let event = StoreEvent::ActiveFolderChanged {
            id: Some(FolderId::default_folder()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "active_folder_changed");
        assert_eq!(json["id"], "default");
    }
}
