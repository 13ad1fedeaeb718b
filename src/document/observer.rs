//! Mutation notification.
//!
//! The host registers listeners; the document pushes one [`UpdateEvent`] per
//! committed transaction that changed the tree.

use std::fmt;

/// Tags attached to a transaction, describing how the host should react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateTag {
    /// Do not scroll the selection into view after this update
    SkipScrollIntoView,
    /// Rows, columns or cells were inserted, removed or re-spanned
    Structural,
    /// A column width or row height changed
    Resize,
    /// Nodes were created from an external format (HTML, Markdown, JSON)
    Import,
}

/// Notification delivered after a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    pub revision: u64,
    pub tags: Vec<UpdateTag>,
}

impl UpdateEvent {
    pub fn has_tag(&self, tag: UpdateTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&UpdateEvent)>;

#[derive(Default)]
pub(crate) struct UpdateListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl UpdateListeners {
    pub(crate) fn register(&mut self, listener: impl FnMut(&UpdateEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, event: &UpdateEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for UpdateListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_register_notify_unregister() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = UpdateListeners::default();

        let sink = Rc::clone(&seen);
        let id = listeners.register(move |e| sink.borrow_mut().push(e.revision));

        listeners.notify(&UpdateEvent {
            revision: 1,
            tags: vec![],
        });
        assert!(listeners.unregister(id));
        assert!(!listeners.unregister(id));
        listeners.notify(&UpdateEvent {
            revision: 2,
            tags: vec![],
        });

        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(listeners.len(), 0);
    }
}
