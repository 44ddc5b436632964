//! Window registry: identity, titles, minimized flags and stacking order.
//!
//! The registry is the single source of truth for which windows exist and
//! which one is in front. It never sees geometry. Mutation only happens
//! through the six operations on [`WindowRegistry`]; everything a reader needs
//! comes from the derived [`WindowRegistry::windows`] view, where the active
//! flag is projected from `active_id` rather than stored.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Stable identity of one mounted window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WindowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
struct WindowDescriptor {
    id: WindowId,
    title: String,
    slug: Option<String>,
    is_minimized: bool,
    z_index: u64,
}

/// Read-only projection of a descriptor, as handed to the taskbar and surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub id: WindowId,
    pub title: String,
    pub slug: Option<String>,
    pub is_minimized: bool,
    pub z_index: u64,
    pub is_active: bool,
}

#[derive(Debug, Default)]
pub struct WindowRegistry {
    // registration order; `windows()` sorts by z_index on the way out
    descriptors: Vec<WindowDescriptor>,
    active_id: Option<WindowId>,
    z_counter: u64,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_z(&mut self) -> u64 {
        self.z_counter = self.z_counter.saturating_add(1);
        self.z_counter
    }

    fn position(&self, id: &WindowId) -> Option<usize> {
        self.descriptors.iter().position(|d| &d.id == id)
    }

    /// Register a window, or update title and slug of an already known one.
    ///
    /// A new window goes to the front and becomes active. A known window keeps
    /// its stacking position, minimized flag and focus state.
    pub fn register_window(&mut self, id: &WindowId, title: impl Into<String>, slug: Option<&str>) {
        let title = title.into();
        let slug = slug.map(str::to_string);
        if let Some(idx) = self.position(id) {
            let descriptor = &mut self.descriptors[idx];
            descriptor.title = title;
            descriptor.slug = slug;
            return;
        }
        let z_index = self.next_z();
        tracing::debug!(window_id = %id, z_index, "registered window");
        self.descriptors.push(WindowDescriptor {
            id: id.clone(),
            title,
            slug,
            is_minimized: false,
            z_index,
        });
        self.active_id = Some(id.clone());
    }

    /// Remove a window. Unknown ids are ignored.
    ///
    /// Focus falls back to the most recently registered visible window, not the
    /// highest z-index.
    pub fn unregister_window(&mut self, id: &WindowId) {
        let Some(idx) = self.position(id) else {
            return;
        };
        self.descriptors.remove(idx);
        tracing::debug!(window_id = %id, "unregistered window");
        if self.active_id.as_ref() == Some(id) {
            self.active_id = self
                .descriptors
                .iter()
                .rev()
                .find(|d| !d.is_minimized)
                .map(|d| d.id.clone());
        }
    }

    /// Bring a window to the front and make it active. Calling this on the
    /// active window still advances its z-index.
    ///
    /// Minimized windows are activated through [`Self::restore_window`].
    pub fn set_active_window(&mut self, id: &WindowId) {
        let Some(idx) = self.position(id) else {
            return;
        };
        if self.descriptors[idx].is_minimized {
            return;
        }
        let z_index = self.next_z();
        self.descriptors[idx].z_index = z_index;
        self.active_id = Some(id.clone());
        tracing::debug!(window_id = %id, z_index, "activated window");
    }

    pub fn minimize_window(&mut self, id: &WindowId) {
        let Some(idx) = self.position(id) else {
            return;
        };
        self.descriptors[idx].is_minimized = true;
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        tracing::debug!(window_id = %id, "minimized window");
    }

    pub fn restore_window(&mut self, id: &WindowId) {
        let Some(idx) = self.position(id) else {
            return;
        };
        self.descriptors[idx].is_minimized = false;
        self.set_active_window(id);
    }

    pub fn update_window_title(&mut self, id: &WindowId, title: impl Into<String>) {
        if let Some(idx) = self.position(id) {
            self.descriptors[idx].title = title.into();
        }
    }

    /// Descriptors ordered back-to-front (ascending z-index), each flagged
    /// with whether it is the active window.
    pub fn windows(&self) -> Vec<WindowEntry> {
        let mut entries: Vec<WindowEntry> = self
            .descriptors
            .iter()
            .map(|d| self.project(d))
            .collect();
        entries.sort_by_key(|entry| entry.z_index);
        entries
    }

    pub fn entry(&self, id: &WindowId) -> Option<WindowEntry> {
        self.position(id).map(|idx| self.project(&self.descriptors[idx]))
    }

    pub fn active_id(&self) -> Option<&WindowId> {
        self.active_id.as_ref()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn project(&self, d: &WindowDescriptor) -> WindowEntry {
        WindowEntry {
            id: d.id.clone(),
            title: d.title.clone(),
            slug: d.slug.clone(),
            is_minimized: d.is_minimized,
            z_index: d.z_index,
            is_active: self.active_id.as_ref() == Some(&d.id),
        }
    }
}

/// Shared handle injected into surfaces, the taskbar and the dispatcher.
///
/// Each call borrows the registry for the duration of one operation only, so
/// handles can be freely cloned across the single UI thread.
#[derive(Debug, Clone, Default)]
pub struct RegistryHandle {
    inner: Rc<RefCell<WindowRegistry>>,
}

impl RegistryHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_window(&self, id: &WindowId, title: impl Into<String>, slug: Option<&str>) {
        self.inner.borrow_mut().register_window(id, title, slug);
    }

    pub fn unregister_window(&self, id: &WindowId) {
        self.inner.borrow_mut().unregister_window(id);
    }

    pub fn set_active_window(&self, id: &WindowId) {
        self.inner.borrow_mut().set_active_window(id);
    }

    pub fn minimize_window(&self, id: &WindowId) {
        self.inner.borrow_mut().minimize_window(id);
    }

    pub fn restore_window(&self, id: &WindowId) {
        self.inner.borrow_mut().restore_window(id);
    }

    pub fn update_window_title(&self, id: &WindowId, title: impl Into<String>) {
        self.inner.borrow_mut().update_window_title(id, title);
    }

    pub fn windows(&self) -> Vec<WindowEntry> {
        self.inner.borrow().windows()
    }

    pub fn entry(&self, id: &WindowId) -> Option<WindowEntry> {
        self.inner.borrow().entry(id)
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.inner.borrow().active_id().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[WindowEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn abc() -> WindowRegistry {
        let mut reg = WindowRegistry::new();
        for id in ["A", "B", "C"] {
            reg.register_window(&id.into(), id, None);
        }
        reg
    }

    #[test]
    fn register_appends_with_increasing_z() {
        let reg = abc();
        let windows = reg.windows();
        assert_eq!(ids(&windows), vec!["A", "B", "C"]);
        assert!(windows.windows(2).all(|w| w[0].z_index < w[1].z_index));
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
        assert_eq!(windows.iter().filter(|e| e.is_active).count(), 1);
    }

    #[test]
    fn re_register_updates_in_place() {
        let mut reg = abc();
        let before = reg.entry(&"A".into()).unwrap().z_index;
        reg.register_window(&"A".into(), "Renamed", Some("a-slug"));
        let entry = reg.entry(&"A".into()).unwrap();
        assert_eq!(entry.z_index, before);
        assert_eq!(entry.title, "Renamed");
        assert_eq!(entry.slug.as_deref(), Some("a-slug"));
        assert_eq!(reg.len(), 3);
        assert_eq!(ids(&reg.windows()), vec!["A", "B", "C"]);
    }

    #[test]
    fn re_register_keeps_focus_where_it_was() {
        let mut reg = abc();
        reg.register_window(&"A".into(), "A", None);
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
        let windows = reg.windows();
        assert!(windows.last().unwrap().is_active);
    }

    #[test]
    fn re_register_minimized_stays_minimized_and_inactive() {
        let mut reg = WindowRegistry::new();
        reg.register_window(&"A".into(), "A", None);
        reg.minimize_window(&"A".into());
        reg.register_window(&"A".into(), "A", None);
        let entry = reg.entry(&"A".into()).unwrap();
        assert!(entry.is_minimized);
        assert!(!entry.is_active);
        assert!(reg.active_id().is_none());
    }

    #[test]
    fn set_active_moves_to_front() {
        let mut reg = abc();
        reg.set_active_window(&"A".into());
        let windows = reg.windows();
        assert_eq!(ids(&windows), vec!["B", "C", "A"]);
        assert!(windows.last().unwrap().is_active);
    }

    #[test]
    fn set_active_on_active_still_advances() {
        let mut reg = abc();
        let before = reg.entry(&"C".into()).unwrap().z_index;
        reg.set_active_window(&"C".into());
        let after = reg.entry(&"C".into()).unwrap().z_index;
        assert!(after > before);
    }

    #[test]
    fn minimize_inactive_keeps_active() {
        let mut reg = abc();
        reg.minimize_window(&"B".into());
        assert!(reg.entry(&"B".into()).unwrap().is_minimized);
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
    }

    #[test]
    fn minimize_active_clears_focus() {
        let mut reg = abc();
        reg.minimize_window(&"C".into());
        assert!(reg.active_id().is_none());
        assert!(reg.windows().iter().all(|e| !e.is_active));
    }

    #[test]
    fn restore_unminimizes_and_fronts() {
        let mut reg = abc();
        reg.minimize_window(&"A".into());
        reg.restore_window(&"A".into());
        let entry = reg.entry(&"A".into()).unwrap();
        assert!(!entry.is_minimized);
        assert!(entry.is_active);
        assert_eq!(ids(&reg.windows()), vec!["B", "C", "A"]);
    }

    #[test]
    fn unregister_active_falls_back_to_last_visible() {
        let mut reg = abc();
        reg.set_active_window(&"A".into());
        reg.unregister_window(&"A".into());
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unregister_skips_minimized_fallbacks() {
        let mut reg = abc();
        reg.minimize_window(&"B".into());
        reg.set_active_window(&"A".into());
        reg.minimize_window(&"C".into());
        reg.unregister_window(&"A".into());
        assert!(reg.active_id().is_none());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut reg = abc();
        let before = reg.windows();
        reg.unregister_window(&"nope".into());
        reg.set_active_window(&"nope".into());
        reg.minimize_window(&"nope".into());
        reg.restore_window(&"nope".into());
        reg.update_window_title(&"nope".into(), "x");
        assert_eq!(reg.windows(), before);
    }

    #[test]
    fn set_active_ignores_minimized_window() {
        let mut reg = abc();
        reg.minimize_window(&"A".into());
        reg.set_active_window(&"A".into());
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
    }

    #[test]
    fn update_title_does_not_touch_order() {
        let mut reg = abc();
        reg.update_window_title(&"A".into(), "Alpha");
        assert_eq!(reg.entry(&"A".into()).unwrap().title, "Alpha");
        assert_eq!(ids(&reg.windows()), vec!["A", "B", "C"]);
        assert_eq!(reg.active_id().map(WindowId::as_str), Some("C"));
    }

    #[test]
    fn handle_shares_state_between_clones() {
        let a = RegistryHandle::new();
        let b = a.clone();
        a.register_window(&"w".into(), "W", None);
        assert_eq!(b.len(), 1);
        assert_eq!(b.active_id(), Some(WindowId::new("w")));
    }
}
