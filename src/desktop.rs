//! The terminal desktop: mounted windows, the taskbar and the launcher, and
//! the routing of crossterm input between them.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::constants::{DOUBLE_CLICK_WINDOW, Metrics};
use crate::content::{ContentContext, WindowContent, content_for};
use crate::debug_log::DebugLogHandle;
use crate::decorator::{DefaultDecorator, HeaderAction, WindowChrome, WindowDecorator, WindowHit};
use crate::dispatch::{Dispatcher, LaunchSender, WindowHost, WindowKind, launch_channel};
use crate::geometry::{Bounds, Point, Viewport};
use crate::launcher::{Launcher, default_menu};
use crate::registry::{RegistryHandle, WindowEntry, WindowId};
use crate::surface::{SurfaceContext, SurfaceProps, WindowSurface};
use crate::taskbar::{self, Taskbar, TaskbarHit};
use crate::theme;
use crate::ui::UiFrame;

/// A mounted surface plus the payload drawn inside it.
pub struct DesktopWindow {
    kind: WindowKind,
    surface: WindowSurface,
    content: Box<dyn WindowContent>,
}

impl DesktopWindow {
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn surface(&self) -> &WindowSurface {
        &self.surface
    }

    /// Rows the payload asks for at the window's current width.
    fn content_height(&self, registry: &RegistryHandle) -> i32 {
        let inner_width = (self.surface.geometry().size.width - 2).clamp(1, u16::MAX as i32);
        let ctx = ContentContext::new(registry.clone(), false);
        let rows = self.content.natural_height(inner_width as u16, &ctx);
        i32::try_from(rows).unwrap_or(i32::MAX)
    }

    fn bounds(&self, registry: &RegistryHandle) -> Option<Bounds> {
        self.surface.bounds(self.content_height(registry))
    }
}

/// Everything the dispatcher mounts into.
pub struct WindowStack {
    ctx: SurfaceContext,
    windows: Vec<DesktopWindow>,
    viewport: Viewport,
    closed: Rc<RefCell<Vec<WindowId>>>,
    debug_log: Option<DebugLogHandle>,
}

impl WindowStack {
    fn new(ctx: SurfaceContext, viewport: Viewport, debug_log: Option<DebugLogHandle>) -> Self {
        Self {
            ctx,
            windows: Vec::new(),
            viewport,
            closed: Rc::new(RefCell::new(Vec::new())),
            debug_log,
        }
    }

    fn index_of(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.surface.id() == id)
    }

    fn get_mut(&mut self, id: &WindowId) -> Option<&mut DesktopWindow> {
        self.windows.iter_mut().find(|w| w.surface.id() == id)
    }

    /// Topmost visible window under `point`, front-most first.
    fn topmost_at(&self, point: Point) -> Option<(WindowId, Bounds)> {
        let registry = &self.ctx.registry;
        registry
            .windows()
            .iter()
            .rev()
            .filter(|entry| !entry.is_minimized)
            .find_map(|entry| {
                let window = self.windows.iter().find(|w| w.surface.id() == &entry.id)?;
                let bounds = window.bounds(registry)?;
                bounds.contains(point).then(|| (entry.id.clone(), bounds))
            })
    }

    /// Drop every surface whose close callback fired since the last call.
    fn drain_closed(&mut self) -> usize {
        let closed: Vec<WindowId> = self.closed.borrow_mut().drain(..).collect();
        let mut removed = 0;
        for id in closed {
            if let Some(idx) = self.index_of(&id) {
                // dropping the surface unregisters it
                self.windows.remove(idx);
                removed += 1;
            }
        }
        removed
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        for window in &mut self.windows {
            window.surface.handle_viewport_resize(viewport);
        }
    }
}

impl WindowHost for WindowStack {
    fn open_window_count(&self) -> usize {
        self.windows.len()
    }

    fn metrics(&self) -> Metrics {
        self.ctx.metrics
    }

    fn mount_window(&mut self, kind: WindowKind, props: SurfaceProps) {
        let queue = Rc::clone(&self.closed);
        let props = props.on_close(move |id| queue.borrow_mut().push(id.clone()));
        let content = content_for(kind, &self.ctx.metrics, self.debug_log.clone());
        let surface = WindowSurface::mount(props, self.ctx.clone(), self.viewport);
        self.windows.push(DesktopWindow {
            kind,
            surface,
            content,
        });
    }
}

pub struct Desktop {
    stack: WindowStack,
    dispatcher: Dispatcher,
    launch_tx: LaunchSender,
    launcher: Launcher,
    taskbar: Taskbar,
    decorator: Box<dyn WindowDecorator>,
    area: Rect,
    last_header_click: Option<(WindowId, Instant)>,
    quit: bool,
}

impl Desktop {
    /// A desktop filling `area` (the whole terminal, taskbar included).
    pub fn new(metrics: Metrics, area: Rect, debug_log: Option<DebugLogHandle>) -> Self {
        let (launch_tx, launch_rx) = launch_channel();
        let ctx = SurfaceContext::new(metrics);
        let mut desktop = Self {
            stack: WindowStack::new(ctx, Viewport::from(area), debug_log),
            dispatcher: Dispatcher::new(launch_rx),
            launcher: Launcher::new(default_menu(), launch_tx.clone()),
            launch_tx,
            taskbar: Taskbar::new(),
            decorator: Box::new(DefaultDecorator),
            area,
            last_header_click: None,
            quit: false,
        };
        desktop.split_area(area);
        desktop
    }

    /// Desktop region above the taskbar and the taskbar strip.
    fn split_area(&mut self, area: Rect) -> (Rect, Rect) {
        let rows = u16::try_from(self.metrics().taskbar_height.max(0)).unwrap_or(u16::MAX);
        self.taskbar.split_area(area, rows)
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.stack.ctx.registry
    }

    pub fn metrics(&self) -> Metrics {
        self.stack.ctx.metrics
    }

    pub fn windows(&self) -> impl Iterator<Item = &DesktopWindow> {
        self.stack.windows.iter()
    }

    pub fn window(&self, id: &WindowId) -> Option<&DesktopWindow> {
        self.stack.windows.iter().find(|w| w.surface.id() == id)
    }

    pub fn window_count(&self) -> usize {
        self.stack.windows.len()
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Queue a launch request, as the launcher would.
    pub fn launch(&self, kind: WindowKind) {
        self.launch_tx.launch(kind);
    }

    /// Mount pending launches and drop closed windows.
    pub fn pump(&mut self) {
        self.stack.drain_closed();
        let mounted = self.dispatcher.pump(&mut self.stack);
        if mounted > 0 {
            tracing::debug!(mounted, open = self.stack.windows.len(), "mounted launched windows");
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.split_area(area);
        self.stack.set_viewport(Viewport::from(area));
    }

    /// Outer rect of a visible window, resolving fit heights.
    pub fn window_bounds(&self, id: &WindowId) -> Option<Bounds> {
        self.window(id)?.bounds(self.registry())
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    /// Route one input event. `now` drives double-click detection.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        let handled = match event {
            Event::Resize(width, height) => {
                self.set_area(Rect::new(0, 0, *width, *height));
                true
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(event),
            Event::Mouse(_) => self.handle_mouse(event, now),
            _ => false,
        };
        self.pump();
        handled
    }

    fn handle_key(&mut self, event: &Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('q') {
            self.quit = true;
            return true;
        }
        if key.code == KeyCode::F(2) {
            self.launcher.toggle();
            return true;
        }
        if self.launcher.is_open() {
            return self.launcher.handle_event(event);
        }
        let active = self.registry().active_id();
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                true
            }
            KeyCode::BackTab => {
                self.focus_previous();
                true
            }
            KeyCode::F(11) => self.with_active(active, |w| w.surface.toggle_maximize()),
            KeyCode::Char('n') if ctrl => self.with_active(active, |w| w.surface.minimize()),
            KeyCode::Char('w') if ctrl => self.with_active(active, |w| w.surface.close()),
            _ => {
                let registry = self.registry().clone();
                let Some(id) = active else {
                    return false;
                };
                let Some(window) = self.stack.get_mut(&id) else {
                    return false;
                };
                let ctx = ContentContext::new(registry, true);
                window.content.handle_event(event, &ctx)
            }
        }
    }

    fn with_active(
        &mut self,
        active: Option<WindowId>,
        f: impl FnOnce(&mut DesktopWindow),
    ) -> bool {
        let Some(window) = active.and_then(|id| self.stack.get_mut(&id)) else {
            return false;
        };
        f(window);
        true
    }

    /// Bring the back-most visible window to the front, cycling through all
    /// of them on repeated presses.
    fn focus_next(&mut self) {
        let visible: Vec<WindowEntry> = self
            .registry()
            .windows()
            .into_iter()
            .filter(|entry| !entry.is_minimized)
            .collect();
        let Some(first) = visible.first() else {
            return;
        };
        if visible.len() > 1 || !first.is_active {
            self.registry().set_active_window(&first.id);
        }
    }

    /// Undo one `focus_next`: the front window drops to the back and the one
    /// below it becomes active.
    fn focus_previous(&mut self) {
        let visible: Vec<WindowId> = self
            .registry()
            .windows()
            .into_iter()
            .filter(|entry| !entry.is_minimized)
            .map(|entry| entry.id)
            .collect();
        if visible.len() < 2 {
            return;
        }
        for id in &visible[..visible.len() - 1] {
            self.registry().set_active_window(id);
        }
    }

    fn handle_mouse(&mut self, event: &Event, now: Instant) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        let point = Point::new(mouse.column as i32, mouse.row as i32);

        // In-flight drags and resizes get every move and the release,
        // wherever the pointer is.
        let listening = self.stack.ctx.listeners.owners();
        if !listening.is_empty() {
            match mouse.kind {
                MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                    for (id, _) in &listening {
                        if let Some(window) = self.stack.get_mut(id) {
                            window.surface.pointer_move(point);
                        }
                    }
                    return true;
                }
                MouseEventKind::Up(_) => {
                    for (id, _) in &listening {
                        if let Some(window) = self.stack.get_mut(id) {
                            window.surface.pointer_up();
                        }
                    }
                    return true;
                }
                _ => {}
            }
        }

        if self.launcher.is_open() && self.launcher.handle_event(event) {
            return true;
        }

        if self.taskbar.contains_point(mouse.column, mouse.row) {
            match self.taskbar.hit_test_event(event) {
                Some(TaskbarHit::StartButton) => self.launcher.toggle(),
                Some(TaskbarHit::Window(id)) => taskbar::activate(self.registry(), &id),
                None => {}
            }
            return true;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.pointer_down(point, now),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let Some((id, _)) = self.stack.topmost_at(point) else {
                    return false;
                };
                let ctx = ContentContext::new(self.registry().clone(), true);
                self.stack
                    .get_mut(&id)
                    .is_some_and(|w| w.content.handle_event(event, &ctx))
            }
            _ => false,
        }
    }

    fn pointer_down(&mut self, point: Point, now: Instant) -> bool {
        let Some((id, bounds)) = self.stack.topmost_at(point) else {
            self.last_header_click = None;
            return false;
        };
        let registry = self.registry().clone();
        let Some(window) = self.stack.get_mut(&id) else {
            return false;
        };
        let hit = self
            .decorator
            .hit_test(bounds, point, window.surface.is_resizable());
        match hit {
            WindowHit::Header(HeaderAction::Close) => window.surface.close(),
            WindowHit::Header(HeaderAction::Minimize) => window.surface.minimize(),
            WindowHit::Header(HeaderAction::Maximize) => window.surface.toggle_maximize(),
            WindowHit::Header(HeaderAction::Drag) => {
                let double = self.last_header_click.as_ref().is_some_and(|(prev, at)| {
                    prev == &id && now.saturating_duration_since(*at) <= DOUBLE_CLICK_WINDOW
                });
                if double {
                    self.last_header_click = None;
                    window.surface.focus();
                    let content_height = window.content_height(&registry);
                    window.surface.fit_to_content(content_height);
                    tracing::debug!(window_id = %id, content_height, "fit window to content");
                    return true;
                }
                self.last_header_click = Some((id, now));
                if !window.surface.begin_drag(point) {
                    window.surface.focus();
                }
                return true;
            }
            WindowHit::ResizeHandle => {
                if !window.surface.begin_resize(point, bounds.height) {
                    window.surface.focus();
                }
            }
            WindowHit::Body => window.surface.focus(),
            WindowHit::Outside => return false,
        }
        self.last_header_click = None;
        true
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        if area != self.area {
            self.set_area(area);
        }
        let (desk, _bar) = self.split_area(area);
        frame.fill(desk, Style::default().bg(theme::desktop_bg()));

        let registry = self.registry().clone();
        for entry in registry.windows() {
            if entry.is_minimized {
                continue;
            }
            let Some(window) = self.stack.get_mut(&entry.id) else {
                continue;
            };
            let Some(bounds) = window.bounds(&registry) else {
                continue;
            };
            if bounds.visible_in(desk).width == 0 {
                continue;
            }
            let inner = self.decorator.content_area(bounds);
            render_content(frame, window, inner, &registry, entry.is_active);
            self.decorator.render_window(
                frame,
                desk,
                WindowChrome {
                    bounds,
                    title: window.surface.title(),
                    icon: window.surface.icon(),
                    focused: entry.is_active,
                    maximized: window.surface.geometry().is_maximized,
                    resizable: window.surface.is_resizable(),
                },
            );
        }

        self.taskbar
            .render(frame, &registry, self.launcher.is_open());
        if let Some(anchor) = self.taskbar.start_rect() {
            self.launcher.render(frame, anchor, desk);
        }
    }
}

/// Draw a payload offscreen at its full logical size, then copy whatever is
/// on screen. Windows may hang off the left or top edge.
fn render_content(
    frame: &mut UiFrame<'_>,
    window: &mut DesktopWindow,
    inner: Bounds,
    registry: &RegistryHandle,
    focused: bool,
) {
    let width = inner.width.clamp(0, u16::MAX as i32) as u16;
    let height = inner.height.clamp(0, u16::MAX as i32) as u16;
    if width == 0 || height == 0 {
        return;
    }
    let local = Rect::new(0, 0, width, height);
    let mut offscreen = Buffer::empty(local);
    {
        let mut off = UiFrame::from_parts(local, &mut offscreen);
        off.fill(local, theme::window_style());
        let ctx = ContentContext::new(registry.clone(), focused);
        window.content.render(&mut off, local, &ctx);
    }
    frame.blit_from_signed(&offscreen, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Height;
    use crate::surface::SurfaceState;
    use crossterm::event::{KeyEvent, MouseEvent};
    use std::time::Duration;

    fn desktop() -> Desktop {
        Desktop::new(Metrics::cells(), Rect::new(0, 0, 100, 30), None)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn down(column: u16, row: u16) -> Event {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn render(desk: &mut Desktop) -> Buffer {
        let area = desk.area;
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        desk.render(&mut ui);
        buf
    }

    fn only_id(desk: &Desktop) -> WindowId {
        desk.windows().next().unwrap().surface().id().clone()
    }

    #[test]
    fn launch_mounts_with_cascade() {
        let mut desk = desktop();
        desk.launch(WindowKind::Readme);
        desk.launch(WindowKind::Readme);
        desk.pump();
        assert_eq!(desk.window_count(), 2);
        let positions: Vec<Point> = desk
            .windows()
            .map(|w| w.surface().geometry().position)
            .collect();
        let step = Metrics::cells().cascade_step;
        assert_eq!(positions[1].x - positions[0].x, step);
        assert_eq!(positions[1].y - positions[0].y, step);
        assert_eq!(desk.registry().len(), 2);
    }

    #[test]
    fn header_drag_moves_window_and_releases_listener() {
        let mut desk = desktop();
        desk.launch(WindowKind::Readme);
        desk.pump();
        let id = only_id(&desk);
        let start = desk.window_bounds(&id).unwrap();
        let (gx, gy) = (start.x as u16 + 2, start.y as u16);
        assert!(desk.handle_event(&down(gx, gy)));
        assert_eq!(
            desk.window(&id).unwrap().surface().state(),
            SurfaceState::Dragging
        );
        desk.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), gx + 5, gy + 3));
        desk.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), gx + 5, gy + 3));
        let moved = desk.window_bounds(&id).unwrap();
        assert_eq!((moved.x, moved.y), (start.x + 5, start.y + 3));
        assert!(desk.stack.ctx.listeners.is_empty());
    }

    #[test]
    fn close_button_drops_and_unregisters() {
        let mut desk = desktop();
        desk.launch(WindowKind::Stats);
        desk.pump();
        let id = only_id(&desk);
        let b = desk.window_bounds(&id).unwrap();
        let close_x = (b.x + b.width - 2) as u16;
        desk.handle_event(&down(close_x, b.y as u16));
        assert_eq!(desk.window_count(), 0);
        assert!(desk.registry().is_empty());
    }

    #[test]
    fn minimize_then_taskbar_restores() {
        let mut desk = desktop();
        desk.launch(WindowKind::Readme);
        desk.launch(WindowKind::Stats);
        desk.pump();
        let front = desk.registry().active_id().unwrap();
        desk.handle_event(&key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert!(desk.registry().entry(&front).unwrap().is_minimized);
        assert!(desk.registry().active_id().is_none());
        let buf = render(&mut desk);
        assert!(crate::ui::row_text(&buf, 29).contains("[Window Stats]"));
        let entry_x = (0..100)
            .find(|x| desk.taskbar.hit_test(*x, 29) == Some(TaskbarHit::Window(front.clone())))
            .expect("minimized window missing from taskbar");
        desk.handle_event(&down(entry_x, 29));
        let entry = desk.registry().entry(&front).unwrap();
        assert!(!entry.is_minimized);
        assert!(entry.is_active);
    }

    #[test]
    fn crowded_taskbar_still_restores_last_minimized() {
        let mut desk = Desktop::new(Metrics::cells(), Rect::new(0, 0, 80, 24), None);
        for _ in 0..6 {
            desk.launch(WindowKind::Stats);
        }
        desk.pump();
        let last = desk.registry().active_id().unwrap();
        desk.handle_event(&key(KeyCode::Char('n'), KeyModifiers::CONTROL));
        render(&mut desk);
        let mut seen: Vec<WindowId> = (0..80)
            .filter_map(|x| match desk.taskbar.hit_test(x, 23) {
                Some(TaskbarHit::Window(id)) => Some(id),
                _ => None,
            })
            .collect();
        seen.dedup();
        assert_eq!(seen.len(), 6);
        let entry_x = (0..80)
            .find(|x| desk.taskbar.hit_test(*x, 23) == Some(TaskbarHit::Window(last.clone())))
            .expect("minimized window missing from taskbar");
        desk.handle_event(&down(entry_x, 23));
        let entry = desk.registry().entry(&last).unwrap();
        assert!(!entry.is_minimized);
        assert!(entry.is_active);
    }

    #[test]
    fn double_click_on_header_fits_content() {
        let mut desk = desktop();
        desk.launch(WindowKind::Stats);
        desk.pump();
        let id = only_id(&desk);
        let b = desk.window_bounds(&id).unwrap();
        let t0 = Instant::now();
        let (x, y) = (b.x as u16 + 1, b.y as u16);
        desk.handle_event_at(&down(x, y), t0);
        desk.handle_event_at(&mouse(MouseEventKind::Up(MouseButton::Left), x, y), t0);
        desk.handle_event_at(&down(x, y), t0 + Duration::from_millis(100));
        // one window: two table header rows plus one entry, plus chrome
        let geometry = desk.window(&id).unwrap().surface().geometry();
        assert_eq!(geometry.size.height, Height::Fixed(3 + 2));
        assert!(desk.stack.ctx.listeners.is_empty());
    }

    #[test]
    fn slow_second_click_starts_a_new_drag() {
        let mut desk = desktop();
        desk.launch(WindowKind::Stats);
        desk.pump();
        let id = only_id(&desk);
        let b = desk.window_bounds(&id).unwrap();
        let t0 = Instant::now();
        let (x, y) = (b.x as u16 + 1, b.y as u16);
        desk.handle_event_at(&down(x, y), t0);
        desk.handle_event_at(&mouse(MouseEventKind::Up(MouseButton::Left), x, y), t0);
        desk.handle_event_at(&down(x, y), t0 + Duration::from_secs(2));
        assert_eq!(
            desk.window(&id).unwrap().surface().state(),
            SurfaceState::Dragging
        );
    }

    #[test]
    fn clicking_back_window_brings_it_front() {
        let mut desk = desktop();
        desk.launch(WindowKind::Readme);
        desk.launch(WindowKind::Stats);
        desk.pump();
        let ids: Vec<WindowId> = desk.windows().map(|w| w.surface().id().clone()).collect();
        let back = desk.window_bounds(&ids[0]).unwrap();
        // top-left body cell of the back window is not covered by the cascade
        desk.handle_event(&down(back.x as u16 + 1, back.y as u16 + 1));
        assert_eq!(desk.registry().active_id(), Some(ids[0].clone()));
    }

    #[test]
    fn keyboard_launcher_opens_window() {
        let mut desk = desktop();
        desk.handle_event(&key(KeyCode::F(2), KeyModifiers::NONE));
        assert!(desk.launcher().is_open());
        desk.handle_event(&key(KeyCode::Up, KeyModifiers::NONE));
        desk.handle_event(&key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(!desk.launcher().is_open());
        assert_eq!(desk.window_count(), 1);
        assert_eq!(
            desk.windows().next().map(DesktopWindow::kind),
            Some(WindowKind::About)
        );
    }

    #[test]
    fn terminal_resize_refits_maximized_window() {
        let mut desk = desktop();
        desk.launch(WindowKind::Readme);
        desk.pump();
        let id = only_id(&desk);
        desk.handle_event(&key(KeyCode::F(11), KeyModifiers::NONE));
        desk.handle_event(&Event::Resize(60, 20));
        let b = desk.window_bounds(&id).unwrap();
        assert_eq!(b, Bounds::new(0, 0, 60, 19));
    }

    #[test]
    fn tab_cycles_focus_through_visible_windows() {
        let mut desk = desktop();
        for _ in 0..3 {
            desk.launch(WindowKind::About);
        }
        desk.pump();
        let ids: Vec<WindowId> = desk.windows().map(|w| w.surface().id().clone()).collect();
        desk.handle_event(&key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(desk.registry().active_id(), Some(ids[0].clone()));
        desk.handle_event(&key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(desk.registry().active_id(), Some(ids[1].clone()));
    }

    #[test]
    fn backtab_reverses_tab() {
        let mut desk = desktop();
        for _ in 0..3 {
            desk.launch(WindowKind::About);
        }
        desk.pump();
        let ids: Vec<WindowId> = desk.windows().map(|w| w.surface().id().clone()).collect();
        desk.handle_event(&key(KeyCode::Tab, KeyModifiers::NONE));
        desk.handle_event(&key(KeyCode::BackTab, KeyModifiers::NONE));
        assert_eq!(desk.registry().active_id(), Some(ids[2].clone()));
        let order: Vec<WindowId> = desk.registry().windows().into_iter().map(|e| e.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn ctrl_q_requests_quit() {
        let mut desk = desktop();
        assert!(!desk.should_quit());
        desk.handle_event(&key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(desk.should_quit());
    }

    #[test]
    fn render_draws_windows_and_taskbar() {
        let mut desk = desktop();
        desk.launch(WindowKind::About);
        desk.pump();
        let id = only_id(&desk);
        let b = desk.window_bounds(&id).unwrap();
        let buf = render(&mut desk);
        assert!(crate::ui::row_text(&buf, b.y as u16).contains("About"));
        assert!(crate::ui::row_text(&buf, b.y as u16 + 1).contains("A desktop in your terminal"));
        assert!(crate::ui::row_text(&buf, 29).starts_with(" ≡ "));
    }
}
