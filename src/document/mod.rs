//! Document model: node arena, transaction boundary and mutation listeners.
//!
//! The tree is only mutable inside [`Document::run`]. A transaction either
//! commits as a whole or is rolled back, so listeners never observe a partial
//! mutation.

mod observer;
mod tree;

pub use observer::{ListenerId, UpdateEvent, UpdateTag};
pub use tree::Tree;

use observer::UpdateListeners;

use crate::error::Result;
use crate::types::{NodeKey, SerializedTable};

#[derive(Debug, Default)]
pub struct Document {
    tree: Tree,
    /// Incremented once per committed transaction that changed the tree
    revision: u64,
    listeners: UpdateListeners,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding the given tables, in order.
    pub fn from_tables(tables: &[SerializedTable]) -> Result<Self> {
        let mut tree = Tree::new();
        for table in tables {
            tree.import_table(table, None)?;
        }
        Ok(Self {
            tree,
            ..Self::default()
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Run `mutator` as one batched update.
    ///
    /// On error the tree is restored to its state before the call. On success,
    /// listeners are notified once if anything changed.
    pub fn run<T>(
        &mut self,
        tags: &[UpdateTag],
        mutator: impl FnOnce(&mut Tree) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.tree.clone();
        match mutator(&mut self.tree) {
            Ok(value) => {
                if self.tree != snapshot {
                    self.revision += 1;
                    let event = UpdateEvent {
                        revision: self.revision,
                        tags: tags.to_vec(),
                    };
                    log::trace!("committed revision {} {:?}", self.revision, tags);
                    self.listeners.notify(&event);
                }
                Ok(value)
            }
            Err(e) => {
                log::warn!("transaction rolled back: {e}");
                self.tree = snapshot;
                Err(e)
            }
        }
    }

    /// Register a listener called after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&UpdateEvent) + 'static) -> ListenerId {
        self.listeners.register(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Serialize one table.
    pub fn export_table(&self, table: NodeKey) -> Result<SerializedTable> {
        self.tree.export_table(table)
    }

    /// Serialize every table in document order.
    pub fn export_tables(&self) -> Result<Vec<SerializedTable>> {
        self.tree
            .tables()
            .iter()
            .map(|t| self.tree.export_table(*t))
            .collect()
    }

    /// JSON form of every table.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_tables()?)?)
    }

    /// Build a document from the JSON produced by [`Document::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: Vec<SerializedTable> = serde_json::from_str(json)?;
        Self::from_tables(&tables)
    }
}
