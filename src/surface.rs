//! Per-window surface: geometry plus the drag/resize/maximize state machine.
//!
//! A surface registers itself with the registry when mounted and unregisters
//! when dropped, so closing a window is just the owner dropping it. Geometry
//! lives here and nowhere else; the registry is only consulted for focus,
//! stacking and the minimized flag.

use crate::constants::Metrics;
use crate::geometry::{
    Bounds, Height, Point, RestoreSnapshot, Size, Viewport, WindowGeometry, clamp_drag_position,
    fit_to_content, initial_geometry, maximized_bounds, resize_with_floors,
};
use crate::listeners::{ListenerGuard, ListenerKind, PointerListeners};
use crate::registry::{RegistryHandle, WindowId};

pub type WindowCallback = Box<dyn FnMut(&WindowId)>;

/// What the host hands a surface when mounting it.
pub struct SurfaceProps {
    pub id: WindowId,
    pub title: String,
    /// Decorative glyph shown next to the title.
    pub icon: Option<String>,
    /// Opaque correlation key for deep links.
    pub slug: Option<String>,
    pub on_close: Option<WindowCallback>,
    pub on_minimize: Option<WindowCallback>,
    pub on_maximize: Option<WindowCallback>,
    pub default_width: i32,
    pub default_height: Height,
    pub default_x: i32,
    pub default_y: i32,
    pub resizable: bool,
    pub draggable: bool,
}

impl SurfaceProps {
    pub fn new(id: impl Into<WindowId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            slug: None,
            on_close: None,
            on_minimize: None,
            on_maximize: None,
            default_width: 600,
            default_height: Height::Fixed(400),
            default_x: 100,
            default_y: 50,
            resizable: true,
            draggable: true,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_size(mut self, width: i32, height: Height) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.default_x = x;
        self.default_y = y;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn on_close(mut self, callback: impl FnMut(&WindowId) + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn on_minimize(mut self, callback: impl FnMut(&WindowId) + 'static) -> Self {
        self.on_minimize = Some(Box::new(callback));
        self
    }

    pub fn on_maximize(mut self, callback: impl FnMut(&WindowId) + 'static) -> Self {
        self.on_maximize = Some(Box::new(callback));
        self
    }
}

/// Shared services every surface is mounted with.
#[derive(Debug, Clone)]
pub struct SurfaceContext {
    pub registry: RegistryHandle,
    pub listeners: PointerListeners,
    pub metrics: Metrics,
}

impl SurfaceContext {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            registry: RegistryHandle::new(),
            listeners: PointerListeners::new(),
            metrics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Normal,
    Dragging,
    Resizing,
    Maximized,
    Minimized,
}

#[derive(Debug)]
enum Interaction {
    Idle,
    Dragging {
        offset: Point,
        _listener: ListenerGuard,
    },
    Resizing {
        start_size: (i32, i32),
        start_pointer: Point,
        _listener: ListenerGuard,
    },
}

pub struct WindowSurface {
    props: SurfaceProps,
    ctx: SurfaceContext,
    viewport: Viewport,
    geometry: WindowGeometry,
    interaction: Interaction,
}

impl WindowSurface {
    pub fn mount(props: SurfaceProps, ctx: SurfaceContext, viewport: Viewport) -> Self {
        let geometry = initial_geometry(
            Point::new(props.default_x, props.default_y),
            Size {
                width: props.default_width,
                height: props.default_height,
            },
            viewport,
            &ctx.metrics,
        );
        ctx.registry
            .register_window(&props.id, props.title.clone(), props.slug.as_deref());
        tracing::debug!(window_id = %props.id, ?geometry, "mounted window surface");
        Self {
            props,
            ctx,
            viewport,
            geometry,
            interaction: Interaction::Idle,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.props.id
    }

    pub fn title(&self) -> &str {
        &self.props.title
    }

    pub fn icon(&self) -> Option<&str> {
        self.props.icon.as_deref()
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.ctx.metrics
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_resizable(&self) -> bool {
        self.props.resizable
    }

    pub fn is_draggable(&self) -> bool {
        self.props.draggable
    }

    pub fn is_minimized(&self) -> bool {
        self.ctx
            .registry
            .entry(&self.props.id)
            .is_some_and(|entry| entry.is_minimized)
    }

    pub fn is_active(&self) -> bool {
        self.ctx.registry.active_id().as_ref() == Some(&self.props.id)
    }

    pub fn z_index(&self) -> Option<u64> {
        self.ctx
            .registry
            .entry(&self.props.id)
            .map(|entry| entry.z_index)
    }

    pub fn state(&self) -> SurfaceState {
        if self.is_minimized() {
            return SurfaceState::Minimized;
        }
        match self.interaction {
            Interaction::Dragging { .. } => SurfaceState::Dragging,
            Interaction::Resizing { .. } => SurfaceState::Resizing,
            Interaction::Idle if self.geometry.is_maximized => SurfaceState::Maximized,
            Interaction::Idle => SurfaceState::Normal,
        }
    }

    /// Outer rectangle to draw, or `None` while minimized. A fit height
    /// follows `content_height`, bounded by the space above the taskbar.
    pub fn bounds(&self, content_height: i32) -> Option<Bounds> {
        if self.is_minimized() {
            return None;
        }
        let fit = fit_to_content(content_height, self.viewport, &self.ctx.metrics);
        Some(self.geometry.bounds(fit.height))
    }

    pub fn focus(&self) {
        self.ctx.registry.set_active_window(&self.props.id);
    }

    /// Header pointer-down. Returns whether a drag started.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if !self.props.draggable || self.geometry.is_maximized || self.is_minimized() {
            return false;
        }
        self.focus();
        let listener = self
            .ctx
            .listeners
            .attach(&self.props.id, ListenerKind::Drag);
        self.interaction = Interaction::Dragging {
            offset: pointer.offset_from(self.geometry.position),
            _listener: listener,
        };
        true
    }

    /// Resize-handle pointer-down. `rendered_height` is the height currently
    /// on screen, used to pin down a fit height before applying deltas.
    pub fn begin_resize(&mut self, pointer: Point, rendered_height: i32) -> bool {
        if !self.props.resizable || self.geometry.is_maximized || self.is_minimized() {
            return false;
        }
        let height = match self.geometry.size.height {
            Height::Fixed(h) => h,
            Height::Fit => {
                self.geometry.size.height = Height::Fixed(rendered_height);
                rendered_height
            }
        };
        self.focus();
        let listener = self
            .ctx
            .listeners
            .attach(&self.props.id, ListenerKind::Resize);
        self.interaction = Interaction::Resizing {
            start_size: (self.geometry.size.width, height),
            start_pointer: pointer,
            _listener: listener,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        match &self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging { offset, .. } => {
                let wanted = pointer.offset_from(*offset);
                self.geometry.position = clamp_drag_position(
                    wanted,
                    self.geometry.size.width,
                    self.viewport,
                    &self.ctx.metrics,
                );
            }
            Interaction::Resizing {
                start_size,
                start_pointer,
                ..
            } => {
                let delta = pointer.offset_from(*start_pointer);
                let (width, height) = resize_with_floors(*start_size, delta, &self.ctx.metrics);
                self.geometry.size = Size::new(width, height);
            }
        }
    }

    /// Ends whatever interaction is running; detaches its listener.
    pub fn pointer_up(&mut self) {
        if !matches!(self.interaction, Interaction::Idle) {
            tracing::trace!(window_id = %self.props.id, geometry = ?self.geometry, "interaction ended");
        }
        self.interaction = Interaction::Idle;
    }

    pub fn toggle_maximize(&mut self) {
        self.interaction = Interaction::Idle;
        if self.geometry.is_maximized {
            if let Some(snapshot) = self.geometry.restore_snapshot.take() {
                self.geometry.size = snapshot.size;
                // the viewport may have shrunk while maximized
                self.geometry.position = clamp_drag_position(
                    snapshot.position,
                    snapshot.size.width,
                    self.viewport,
                    &self.ctx.metrics,
                );
            }
            self.geometry.is_maximized = false;
            tracing::debug!(window_id = %self.props.id, "restored window size");
            return;
        }
        self.geometry.restore_snapshot = Some(RestoreSnapshot {
            position: self.geometry.position,
            size: self.geometry.size,
        });
        self.apply_maximized_bounds();
        self.geometry.is_maximized = true;
        tracing::debug!(window_id = %self.props.id, "maximized window");
        let id = self.props.id.clone();
        if let Some(callback) = self.props.on_maximize.as_mut() {
            callback(&id);
        }
    }

    fn apply_maximized_bounds(&mut self) {
        let full = maximized_bounds(self.viewport, &self.ctx.metrics);
        self.geometry.position = Point::new(full.x, full.y);
        self.geometry.size = Size::new(full.width, full.height);
    }

    pub fn minimize(&mut self) {
        self.interaction = Interaction::Idle;
        self.ctx.registry.minimize_window(&self.props.id);
        let id = self.props.id.clone();
        if let Some(callback) = self.props.on_minimize.as_mut() {
            callback(&id);
        }
    }

    /// Header double-click: size the window to its content. Ignored while
    /// maximized.
    pub fn fit_to_content(&mut self, content_height: i32) {
        if self.geometry.is_maximized {
            return;
        }
        let fit = fit_to_content(content_height, self.viewport, &self.ctx.metrics);
        self.geometry.size.height = Height::Fixed(fit.height);
        if let Some(y) = fit.y {
            self.geometry.position.y = y;
        }
    }

    /// Ask the owner to close this window. The owner drops the surface, which
    /// unregisters it.
    pub fn close(&mut self) {
        let id = self.props.id.clone();
        match self.props.on_close.as_mut() {
            Some(callback) => callback(&id),
            None => tracing::debug!(window_id = %id, "close requested without a handler"),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.props.title = title.into();
        self.ctx
            .registry
            .update_window_title(&self.props.id, self.props.title.clone());
    }

    /// Keep the window reachable after the viewport changed size. Maximized
    /// windows follow the new viewport; sizes of normal windows are kept.
    pub fn handle_viewport_resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if self.geometry.is_maximized {
            self.apply_maximized_bounds();
        } else {
            self.geometry.position = clamp_drag_position(
                self.geometry.position,
                self.geometry.size.width,
                viewport,
                &self.ctx.metrics,
            );
        }
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        // an interaction still in flight ends as if the pointer was released
        self.interaction = Interaction::Idle;
        self.ctx.registry.unregister_window(&self.props.id);
        tracing::debug!(window_id = %self.props.id, "unmounted window surface");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx() -> SurfaceContext {
        SurfaceContext::new(Metrics::pixels())
    }

    fn viewport() -> Viewport {
        Viewport::new(1280, 800)
    }

    fn mount(ctx: &SurfaceContext, id: &str) -> WindowSurface {
        let props = SurfaceProps::new(id, id.to_uppercase())
            .with_position(100, 50)
            .with_size(600, Height::Fixed(400));
        WindowSurface::mount(props, ctx.clone(), viewport())
    }

    #[test]
    fn mount_registers_and_drop_unregisters() {
        let ctx = ctx();
        let surface = mount(&ctx, "a");
        assert!(ctx.registry.entry(surface.id()).is_some());
        assert!(surface.is_active());
        drop(surface);
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        assert!(s.begin_drag(Point::new(150, 60)));
        assert_eq!(s.state(), SurfaceState::Dragging);
        s.pointer_move(Point::new(180, 100));
        assert_eq!(s.geometry().position, Point::new(130, 90));
        s.pointer_up();
        assert_eq!(s.state(), SurfaceState::Normal);
        assert!(ctx.listeners.is_empty());
    }

    #[test]
    fn drag_saturates_at_viewport_clamp() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        s.begin_drag(Point::new(150, 60));
        s.pointer_move(Point::new(-4000, -4000));
        assert_eq!(s.geometry().position, Point::new(100 - 600, 0));
        s.pointer_up();
    }

    #[test]
    fn drag_refused_when_not_draggable() {
        let ctx = ctx();
        let props = SurfaceProps::new("a", "A").draggable(false);
        let mut s = WindowSurface::mount(props, ctx.clone(), viewport());
        assert!(!s.begin_drag(Point::new(120, 60)));
        assert!(ctx.listeners.is_empty());
    }

    #[test]
    fn drag_brings_window_to_front() {
        let ctx = ctx();
        let mut a = mount(&ctx, "a");
        let b = mount(&ctx, "b");
        assert!(b.is_active());
        a.begin_drag(Point::new(150, 60));
        assert!(a.is_active());
        assert!(a.z_index() > b.z_index());
        a.pointer_up();
    }

    #[test]
    fn maximize_then_restore_is_exact() {
        let ctx = SurfaceContext::new(Metrics {
            taskbar_height: 56,
            ..Metrics::pixels()
        });
        let mut s = mount(&ctx, "a");
        s.toggle_maximize();
        assert_eq!(s.state(), SurfaceState::Maximized);
        assert_eq!(s.geometry().position, Point::new(0, 0));
        assert_eq!(s.geometry().size, Size::new(1280, 744));
        assert!(!s.begin_drag(Point::new(10, 10)));
        assert!(!s.begin_resize(Point::new(10, 10), 744));
        s.toggle_maximize();
        assert_eq!(s.geometry().position, Point::new(100, 50));
        assert_eq!(s.geometry().size, Size::new(600, 400));
        assert!(s.geometry().restore_snapshot.is_none());
    }

    #[test]
    fn resize_clamps_to_floors() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        assert!(s.begin_resize(Point::new(700, 450), 400));
        assert_eq!(s.state(), SurfaceState::Resizing);
        s.pointer_move(Point::new(300, 200));
        assert_eq!(s.geometry().size, Size::new(300, 200));
        s.pointer_up();
        assert!(ctx.listeners.is_empty());
    }

    #[test]
    fn resize_snaps_fit_height_first() {
        let ctx = ctx();
        let props = SurfaceProps::new("a", "A").with_size(600, Height::Fit);
        let mut s = WindowSurface::mount(props, ctx.clone(), viewport());
        s.begin_resize(Point::new(700, 400), 320);
        assert_eq!(s.geometry().size.height, Height::Fixed(320));
        s.pointer_move(Point::new(710, 430));
        assert_eq!(s.geometry().size, Size::new(610, 350));
        s.pointer_up();
    }

    #[test]
    fn minimize_hides_but_keeps_registration() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        s.minimize();
        assert_eq!(s.state(), SurfaceState::Minimized);
        assert!(s.bounds(100).is_none());
        assert_eq!(ctx.registry.len(), 1);
        assert!(ctx.registry.active_id().is_none());
    }

    #[test]
    fn fit_to_content_keeps_position_when_it_fits() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        s.fit_to_content(100);
        assert_eq!(s.geometry().size.height, Height::Fixed(140));
        assert_eq!(s.geometry().position, Point::new(100, 50));
    }

    #[test]
    fn fit_to_content_moves_to_top_when_clamped() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        s.fit_to_content(5000);
        assert_eq!(s.geometry().size.height, Height::Fixed(800 - 56 - 16));
        assert_eq!(s.geometry().position, Point::new(100, 16));
    }

    #[test]
    fn close_invokes_owner_callback_only() {
        let ctx = ctx();
        let closed = Rc::new(RefCell::new(Vec::new()));
        let sink = closed.clone();
        let props = SurfaceProps::new("a", "A").on_close(move |id| sink.borrow_mut().push(id.clone()));
        let mut s = WindowSurface::mount(props, ctx.clone(), viewport());
        s.close();
        assert_eq!(closed.borrow().as_slice(), &[WindowId::new("a")]);
        // still registered until the owner drops it
        assert_eq!(ctx.registry.len(), 1);
        drop(s);
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn drop_mid_drag_releases_listener() {
        let ctx = ctx();
        let mut s = mount(&ctx, "a");
        s.begin_drag(Point::new(150, 60));
        assert_eq!(ctx.listeners.len(), 1);
        drop(s);
        assert!(ctx.listeners.is_empty());
        assert!(ctx.registry.is_empty());
    }

    #[test]
    fn set_title_updates_registry_without_refocus() {
        let ctx = ctx();
        let mut a = mount(&ctx, "a");
        let _b = mount(&ctx, "b");
        a.set_title("Renamed");
        assert_eq!(ctx.registry.entry(a.id()).unwrap().title, "Renamed");
        assert!(!a.is_active());
    }

    #[test]
    fn viewport_resize_refits_maximized_and_reclamps_normal() {
        let ctx = ctx();
        let mut max = mount(&ctx, "max");
        max.toggle_maximize();
        let mut normal = mount(&ctx, "normal");
        normal.begin_drag(Point::new(150, 60));
        normal.pointer_move(Point::new(1200, 700));
        normal.pointer_up();
        let small = Viewport::new(640, 480);
        max.handle_viewport_resize(small);
        normal.handle_viewport_resize(small);
        assert_eq!(max.geometry().size, Size::new(640, 480 - 56));
        let pos = normal.geometry().position;
        assert!(pos.x <= 640 - 100);
        assert!(pos.y <= 480 - 56 - 40);
        assert_eq!(normal.geometry().size, Size::new(600, 400));
    }

    #[test]
    fn restore_after_shrink_keeps_header_reachable() {
        let ctx = ctx();
        let props = SurfaceProps::new("a", "A")
            .with_position(600, 300)
            .with_size(600, Height::Fixed(400));
        let mut s = WindowSurface::mount(props, ctx, viewport());
        s.toggle_maximize();
        s.handle_viewport_resize(Viewport::new(640, 480));
        s.toggle_maximize();
        assert_eq!(s.geometry().position, Point::new(540, 300));
        assert_eq!(s.geometry().size, Size::new(600, 400));
    }

    #[test]
    fn notification_hooks_fire() {
        let ctx = ctx();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let (min_hits, max_hits) = (hits.clone(), hits.clone());
        let props = SurfaceProps::new("a", "A")
            .on_minimize(move |_| min_hits.borrow_mut().push("min"))
            .on_maximize(move |_| max_hits.borrow_mut().push("max"));
        let mut s = WindowSurface::mount(props, ctx, viewport());
        s.toggle_maximize();
        s.minimize();
        assert_eq!(hits.borrow().as_slice(), &["max", "min"]);
    }
}
