//! Document-level pointer listeners with scoped lifetime.
//!
//! While a drag or resize is in flight, pointer moves and releases must reach
//! the owning window wherever the pointer is. An interaction attaches a
//! listener and keeps the returned [`ListenerGuard`]; dropping the guard is
//! the only way to detach, so a listener cannot outlive its interaction or
//! its window.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::registry::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    Drag,
    Resize,
}

#[derive(Debug)]
struct Listener {
    key: u64,
    owner: WindowId,
    kind: ListenerKind,
}

#[derive(Debug, Default)]
struct ListenerTable {
    listeners: Vec<Listener>,
    next_key: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PointerListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the guard detaches the listener immediately"]
    pub fn attach(&self, owner: &WindowId, kind: ListenerKind) -> ListenerGuard {
        let mut table = self.table.borrow_mut();
        let key = table.next_key;
        table.next_key = key.wrapping_add(1);
        table.listeners.push(Listener {
            key,
            owner: owner.clone(),
            kind,
        });
        tracing::trace!(window_id = %owner, ?kind, "attached pointer listener");
        ListenerGuard {
            table: Rc::downgrade(&self.table),
            key,
        }
    }

    /// Windows currently listening, oldest first, with what they listen for.
    pub fn owners(&self) -> Vec<(WindowId, ListenerKind)> {
        self.table
            .borrow()
            .listeners
            .iter()
            .map(|l| (l.owner.clone(), l.kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Disposer for one attached listener.
#[derive(Debug)]
pub struct ListenerGuard {
    table: Weak<RefCell<ListenerTable>>,
    key: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        table.borrow_mut().listeners.retain(|l| l.key != self.key);
    }
}
