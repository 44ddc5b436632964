//! Window geometry and the pure clamp rules applied to it.
//!
//! Coordinates are signed so a window can hang partially off the left or top
//! edge of the viewport while being dragged. Every function here is free of
//! side effects; [`crate::surface::WindowSurface`] owns the mutable state and
//! calls into these helpers.

use ratatui::layout::Rect;

use crate::constants::Metrics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset_from(self, origin: Point) -> Point {
        Point {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

/// Height of a window: either a fixed extent or tracking the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
    Fit,
    Fixed(i32),
}

impl Height {
    pub const fn fixed(self) -> Option<i32> {
        match self {
            Height::Fit => None,
            Height::Fixed(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: Height,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height: Height::Fixed(height),
        }
    }

    pub const fn fit(width: i32) -> Self {
        Self {
            width,
            height: Height::Fit,
        }
    }
}

/// Visible area the windows live in, including the taskbar strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Height left for windows once the taskbar strip is reserved.
    pub fn work_height(&self, metrics: &Metrics) -> i32 {
        (self.height - metrics.taskbar_height).max(0)
    }
}

impl From<Rect> for Viewport {
    fn from(rect: Rect) -> Self {
        Self {
            width: rect.width as i32,
            height: rect.height as i32,
        }
    }
}

/// Resolved rectangle with a signed origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.width <= 0 || self.height <= 0 {
            return false;
        }
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Portion of `self` that falls inside `area`, or an empty rect.
    pub fn visible_in(&self, area: Rect) -> Rect {
        let area_x0 = area.x as i32;
        let area_y0 = area.y as i32;
        let area_x1 = area_x0 + area.width as i32;
        let area_y1 = area_y0 + area.height as i32;
        let x0 = self.x.max(area_x0);
        let y0 = self.y.max(area_y0);
        let x1 = (self.x + self.width).min(area_x1);
        let y1 = (self.y + self.height).min(area_y1);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        }
    }
}

/// Position and size captured when a window is maximized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSnapshot {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
    pub is_maximized: bool,
    /// Only meaningful while `is_maximized` is set.
    pub restore_snapshot: Option<RestoreSnapshot>,
}

impl WindowGeometry {
    pub const fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            is_maximized: false,
            restore_snapshot: None,
        }
    }

    /// Outer rectangle of the window, resolving a fit height against the
    /// height its content currently asks for.
    pub fn bounds(&self, fit_height: i32) -> Bounds {
        let height = self.size.height.fixed().unwrap_or(fit_height);
        Bounds::new(self.position.x, self.position.y, self.size.width, height)
    }
}

/// Clamp the hinted geometry of a new window into the viewport, keeping the
/// taskbar strip free and `padding` on every side.
pub fn initial_geometry(
    position: Point,
    size: Size,
    viewport: Viewport,
    metrics: &Metrics,
) -> WindowGeometry {
    let pad = metrics.padding;
    let max_width = (viewport.width - 2 * pad).max(1);
    let max_height = (viewport.work_height(metrics) - 2 * pad).max(1);
    let width = size.width.clamp(1, max_width);
    let height = match size.height {
        Height::Fit => Height::Fit,
        Height::Fixed(h) => Height::Fixed(h.clamp(1, max_height)),
    };
    // A fit window has no height yet; its header is what must fit.
    let placed_height = height.fixed().unwrap_or(metrics.header_height);
    let max_x = (viewport.width - width - pad).max(pad);
    let max_y = (viewport.work_height(metrics) - placed_height - pad).max(pad);
    WindowGeometry::new(
        Point::new(position.x.clamp(pad, max_x), position.y.clamp(pad, max_y)),
        Size { width, height },
    )
}

/// Clamp a dragged window position so its header stays reachable: a sliver of
/// `min_header_visible` horizontally, and between the top edge and the
/// taskbar vertically.
pub fn clamp_drag_position(
    position: Point,
    width: i32,
    viewport: Viewport,
    metrics: &Metrics,
) -> Point {
    let sliver = metrics.min_header_visible.min(width).max(0);
    let min_x = sliver - width;
    let max_x = (viewport.width - sliver).max(min_x);
    let max_y = (viewport.work_height(metrics) - metrics.header_height).max(0);
    Point::new(position.x.clamp(min_x, max_x), position.y.clamp(0, max_y))
}

/// Apply a pointer delta to a starting size, never going below the floors.
pub fn resize_with_floors(start: (i32, i32), delta: Point, metrics: &Metrics) -> (i32, i32) {
    let width = (start.0 + delta.x).max(metrics.min_width);
    let height = (start.1 + delta.y).max(metrics.min_height);
    (width, height)
}

/// Full work area: the viewport origin, the full width, and the height above
/// the taskbar.
pub fn maximized_bounds(viewport: Viewport, metrics: &Metrics) -> Bounds {
    Bounds::new(0, 0, viewport.width, viewport.work_height(metrics))
}

/// Outcome of fitting a window's height to its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitOutcome {
    pub height: i32,
    /// Set when the height hit the viewport limit and the window must move to
    /// the top padding.
    pub y: Option<i32>,
}

pub fn fit_to_content(content_height: i32, viewport: Viewport, metrics: &Metrics) -> FitOutcome {
    let wanted = content_height.max(0) + metrics.header_height;
    let limit = (viewport.work_height(metrics) - metrics.padding).max(1);
    if wanted >= limit {
        FitOutcome {
            height: limit,
            y: Some(metrics.padding),
        }
    } else {
        FitOutcome {
            height: wanted,
            y: None,
        }
    }
}
