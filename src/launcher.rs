//! Start-button menu: a small tree of groups and launchable window kinds.
//!
//! Choosing a leaf never opens anything directly; it sends a
//! [`crate::dispatch::LaunchRequest`] and closes the menu.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use crate::dispatch::{LaunchSender, WindowKind};
use crate::theme;
use crate::ui::{UiFrame, rect_contains, truncate_to_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Group {
        label: String,
        children: Vec<MenuNode>,
    },
    Item {
        label: String,
        icon: String,
        kind: WindowKind,
    },
}

impl MenuNode {
    pub fn group(label: impl Into<String>, children: Vec<MenuNode>) -> Self {
        MenuNode::Group {
            label: label.into(),
            children,
        }
    }

    pub fn item(kind: WindowKind) -> Self {
        MenuNode::Item {
            label: kind.title().to_string(),
            icon: kind.icon().to_string(),
            kind,
        }
    }

    fn label(&self) -> &str {
        match self {
            MenuNode::Group { label, .. } | MenuNode::Item { label, .. } => label,
        }
    }

    fn children(&self) -> Option<&[MenuNode]> {
        match self {
            MenuNode::Group { children, .. } => Some(children),
            MenuNode::Item { .. } => None,
        }
    }

    fn line(&self, selected: bool) -> String {
        let marker = if selected { ">" } else { " " };
        match self {
            MenuNode::Group { label, .. } => format!("{marker}   {label} ▸"),
            MenuNode::Item { label, icon, .. } => format!("{marker} {icon} {label}"),
        }
    }
}

pub fn default_menu() -> Vec<MenuNode> {
    vec![
        MenuNode::group(
            "Applications",
            vec![
                MenuNode::item(WindowKind::Readme),
                MenuNode::item(WindowKind::Stats),
            ],
        ),
        MenuNode::group(
            "System",
            vec![
                MenuNode::item(WindowKind::Settings),
                MenuNode::item(WindowKind::DebugLog),
            ],
        ),
        MenuNode::item(WindowKind::About),
    ]
}

#[derive(Debug, Clone, Copy)]
struct MenuHit {
    level: usize,
    index: usize,
    rect: Rect,
}

#[derive(Debug)]
pub struct Launcher {
    root: Vec<MenuNode>,
    sender: LaunchSender,
    open: bool,
    /// Selected index per open level; `path.len()` levels are shown.
    path: Vec<usize>,
    level_bounds: Vec<Rect>,
    hits: Vec<MenuHit>,
}

impl Launcher {
    pub fn new(root: Vec<MenuNode>, sender: LaunchSender) -> Self {
        Self {
            root,
            sender,
            open: false,
            path: Vec::new(),
            level_bounds: Vec::new(),
            hits: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if self.root.is_empty() {
            return;
        }
        self.open = true;
        self.path = vec![0];
    }

    pub fn close(&mut self) {
        self.open = false;
        self.path.clear();
        self.level_bounds.clear();
        self.hits.clear();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Nodes shown at `level` given the current selection path.
    fn level_nodes(&self, level: usize) -> Option<&[MenuNode]> {
        let mut nodes: &[MenuNode] = &self.root;
        for depth in 0..level {
            let idx = *self.path.get(depth)?;
            nodes = nodes.get(idx)?.children()?;
        }
        Some(nodes)
    }

    fn selected_node(&self) -> Option<&MenuNode> {
        let level = self.path.len().checked_sub(1)?;
        let nodes = self.level_nodes(level)?;
        nodes.get(*self.path.last()?)
    }

    /// Selected labels from the root down, for status display and tests.
    pub fn selection_labels(&self) -> Vec<String> {
        (0..self.path.len())
            .filter_map(|level| {
                let nodes = self.level_nodes(level)?;
                nodes.get(self.path[level]).map(|n| n.label().to_string())
            })
            .collect()
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(level) = self.path.len().checked_sub(1) else {
            return;
        };
        let Some(len) = self.level_nodes(level).map(<[MenuNode]>::len) else {
            return;
        };
        if len == 0 {
            return;
        }
        let current = self.path[level] as isize;
        self.path[level] = (current + delta).rem_euclid(len as isize) as usize;
    }

    /// Enter a group or launch an item.
    fn activate_selected(&mut self) {
        let Some(node) = self.selected_node() else {
            return;
        };
        match node {
            MenuNode::Group { children, .. } => {
                if !children.is_empty() {
                    self.path.push(0);
                }
            }
            MenuNode::Item { kind, .. } => {
                let kind = *kind;
                tracing::debug!(?kind, "launcher item chosen");
                self.sender.launch(kind);
                self.close();
            }
        }
    }

    fn select(&mut self, level: usize, index: usize) {
        self.path.truncate(level + 1);
        if let Some(slot) = self.path.get_mut(level) {
            *slot = index;
        }
    }

    /// Keyboard and mouse routing while open. Returns whether the event was
    /// consumed; a closed launcher consumes nothing.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if !self.open {
            return false;
        }
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match key.code {
                    KeyCode::Esc => self.close(),
                    KeyCode::Up => self.move_selection(-1),
                    KeyCode::Down => self.move_selection(1),
                    KeyCode::Left => {
                        if self.path.len() > 1 {
                            self.path.pop();
                        }
                    }
                    KeyCode::Right => {
                        if matches!(self.selected_node(), Some(MenuNode::Group { .. })) {
                            self.activate_selected();
                        }
                    }
                    KeyCode::Enter => self.activate_selected(),
                    _ => {}
                }
                true
            }
            Event::Mouse(mouse) => {
                let hit = self
                    .hits
                    .iter()
                    .find(|hit| rect_contains(hit.rect, mouse.column, mouse.row))
                    .copied();
                match (mouse.kind, hit) {
                    (MouseEventKind::Down(MouseButton::Left), Some(hit)) => {
                        self.select(hit.level, hit.index);
                        self.activate_selected();
                        true
                    }
                    (MouseEventKind::Moved, Some(hit)) => {
                        let already = self.path.get(hit.level) == Some(&hit.index);
                        if !already {
                            self.select(hit.level, hit.index);
                        }
                        true
                    }
                    (MouseEventKind::Down(_), None) => {
                        if self.contains_point(mouse.column, mouse.row) {
                            return true;
                        }
                        // click-away closes but still reaches whatever is below
                        self.close();
                        false
                    }
                    _ => self.contains_point(mouse.column, mouse.row),
                }
            }
            _ => false,
        }
    }

    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        self.level_bounds
            .iter()
            .any(|rect| rect_contains(*rect, column, row))
    }

    /// Draw every open level. Level 0 grows upwards from `anchor` (the start
    /// button); each submenu opens to the right of its parent's selected row.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, anchor: Rect, bounds: Rect) {
        self.level_bounds.clear();
        self.hits.clear();
        if !self.open || bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let menu_style = theme::menu_style();
        let selected_style = theme::menu_selected_style();
        let bottom = bounds.y.saturating_add(bounds.height);
        let right = bounds.x.saturating_add(bounds.width);
        let mut parent_row: Option<u16> = None;
        let mut next_x = anchor.x.max(bounds.x);
        for level in 0..self.path.len() {
            let Some(nodes) = self.level_nodes(level) else {
                break;
            };
            let lines: Vec<String> = nodes
                .iter()
                .enumerate()
                .map(|(idx, node)| node.line(self.path[level] == idx))
                .collect();
            let label_width = lines
                .iter()
                .map(|line| line.chars().count() as u16)
                .max()
                .unwrap_or(1);
            let width = label_width.saturating_add(3).min(bounds.width);
            let height = (lines.len() as u16).saturating_add(2).min(bounds.height);
            let x = next_x.min(right.saturating_sub(width)).max(bounds.x);
            let y = match parent_row {
                None => bottom.saturating_sub(height),
                Some(row) => row
                    .saturating_sub(1)
                    .min(bottom.saturating_sub(height))
                    .max(bounds.y),
            };
            let rect = Rect {
                x,
                y,
                width,
                height,
            };
            frame.fill(rect, menu_style);
            let selected = self.path[level];
            for (idx, line) in lines.iter().enumerate() {
                let row = y.saturating_add(idx as u16 + 1);
                if row >= y.saturating_add(height).saturating_sub(1) {
                    break;
                }
                let style = if idx == selected {
                    selected_style
                } else {
                    menu_style
                };
                let row_rect = Rect {
                    x,
                    y: row,
                    width,
                    height: 1,
                };
                if idx == selected {
                    frame.fill(row_rect, style);
                    parent_row = Some(row);
                }
                let text = truncate_to_width(line, width.saturating_sub(2) as usize);
                frame.set_string(rect, x.saturating_add(1), row, &text, style);
                self.hits.push(MenuHit {
                    level,
                    index: idx,
                    rect: row_rect,
                });
            }
            self.level_bounds.push(rect);
            next_x = x.saturating_add(width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{LaunchRequest, launch_channel};
    use crate::ui::row_text;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn keyboard_navigates_into_group_and_launches() {
        let (tx, rx) = launch_channel();
        let mut launcher = Launcher::new(default_menu(), tx);
        launcher.open();
        assert_eq!(launcher.selection_labels(), vec!["Applications"]);
        launcher.handle_event(&key(KeyCode::Right));
        launcher.handle_event(&key(KeyCode::Down));
        assert_eq!(
            launcher.selection_labels(),
            vec!["Applications", "Window Stats"]
        );
        launcher.handle_event(&key(KeyCode::Left));
        assert_eq!(launcher.selection_labels(), vec!["Applications"]);
        launcher.handle_event(&key(KeyCode::Enter));
        launcher.handle_event(&key(KeyCode::Enter));
        assert!(!launcher.is_open());
        assert_eq!(
            rx.try_recv().ok(),
            Some(LaunchRequest {
                kind: WindowKind::Readme
            })
        );
    }

    #[test]
    fn selection_wraps_and_escape_closes() {
        let (tx, rx) = launch_channel();
        let mut launcher = Launcher::new(default_menu(), tx);
        launcher.open();
        launcher.handle_event(&key(KeyCode::Up));
        assert_eq!(launcher.selection_labels(), vec!["About"]);
        launcher.handle_event(&key(KeyCode::Esc));
        assert!(!launcher.is_open());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_launcher_ignores_events() {
        let (tx, _rx) = launch_channel();
        let mut launcher = Launcher::new(default_menu(), tx);
        assert!(!launcher.handle_event(&key(KeyCode::Enter)));
    }

    #[test]
    fn render_grows_upward_from_anchor_and_mouse_launches() {
        let (tx, rx) = launch_channel();
        let mut launcher = Launcher::new(default_menu(), tx);
        launcher.open();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let anchor = Rect::new(0, 19, 3, 1);
        let desk = Rect::new(0, 0, 60, 19);
        {
            let mut ui = UiFrame::from_parts(area, &mut buf);
            launcher.render(&mut ui, anchor, desk);
        }
        // three items plus padding rows, sitting on the taskbar
        let level0 = launcher.level_bounds[0];
        assert_eq!(level0.y + level0.height, 19);
        assert!(row_text(&buf, level0.y + 1).contains("> "));
        assert!(row_text(&buf, level0.y + 3).contains("About"));

        // open the System group with the mouse, then render its submenu
        assert!(launcher.handle_event(&click(2, level0.y + 2)));
        assert_eq!(launcher.selection_labels(), vec!["System", "Settings"]);
        {
            let mut ui = UiFrame::from_parts(area, &mut buf);
            launcher.render(&mut ui, anchor, desk);
        }
        let level1 = launcher.level_bounds[1];
        assert_eq!(level1.x, level0.x + level0.width);
        // Debug Log is the second row of the submenu
        assert!(launcher.handle_event(&click(level1.x + 2, level1.y + 2)));
        assert_eq!(
            rx.try_recv().ok().map(|r| r.kind),
            Some(WindowKind::DebugLog)
        );
        assert!(!launcher.is_open());
    }

    #[test]
    fn click_away_closes_without_consuming() {
        let (tx, _rx) = launch_channel();
        let mut launcher = Launcher::new(default_menu(), tx);
        launcher.open();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        launcher.render(&mut ui, Rect::new(0, 19, 3, 1), Rect::new(0, 0, 60, 19));
        assert!(!launcher.handle_event(&click(50, 2)));
        assert!(!launcher.is_open());
    }
}
