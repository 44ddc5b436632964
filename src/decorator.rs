//! Window chrome for the terminal host: a title row with the icon, the title
//! and the minimize / maximize / close buttons, side borders, and a bottom
//! border whose right corner doubles as the resize handle.

use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::geometry::{Bounds, Point};
use crate::theme;
use crate::ui::UiFrame;

/// What a pointer-down on the title row means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Minimize,
    Maximize,
    Close,
    Drag,
}

/// Where a point falls on a decorated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHit {
    Header(HeaderAction),
    ResizeHandle,
    Body,
    Outside,
}

#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub bounds: Bounds,
    pub title: &'a str,
    pub icon: Option<&'a str>,
    pub focused: bool,
    pub maximized: bool,
    pub resizable: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Area left for the payload once the chrome is drawn.
    fn content_area(&self, bounds: Bounds) -> Bounds;

    fn hit_test(&self, bounds: Bounds, point: Point, resizable: bool) -> WindowHit;

    fn render_window(&self, frame: &mut UiFrame<'_>, clip: Rect, chrome: WindowChrome<'_>);
}

const BUTTON_WIDTH: i32 = 3;

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    /// Header buttons with their column offset from the window's left edge,
    /// right to left. Narrow windows drop buttons from the left first.
    fn buttons(width: i32) -> Vec<(HeaderAction, i32)> {
        let order = [
            HeaderAction::Close,
            HeaderAction::Maximize,
            HeaderAction::Minimize,
        ];
        let mut out = Vec::new();
        for (idx, action) in order.into_iter().enumerate() {
            let offset = width - BUTTON_WIDTH * (idx as i32 + 1);
            // keep at least one column for the title
            if offset < 1 {
                break;
            }
            out.push((action, offset));
        }
        out
    }

    fn button_label(action: HeaderAction, maximized: bool) -> &'static str {
        match action {
            HeaderAction::Minimize => " _ ",
            HeaderAction::Maximize if maximized => " ❐ ",
            HeaderAction::Maximize => " □ ",
            HeaderAction::Close => " x ",
            HeaderAction::Drag => "   ",
        }
    }
}

impl WindowDecorator for DefaultDecorator {
    fn content_area(&self, bounds: Bounds) -> Bounds {
        Bounds::new(
            bounds.x + 1,
            bounds.y + 1,
            (bounds.width - 2).max(0),
            (bounds.height - 2).max(0),
        )
    }

    fn hit_test(&self, bounds: Bounds, point: Point, resizable: bool) -> WindowHit {
        if !bounds.contains(point) {
            return WindowHit::Outside;
        }
        let local = point.offset_from(Point::new(bounds.x, bounds.y));
        if local.y == 0 {
            let action = Self::buttons(bounds.width)
                .into_iter()
                .find(|(_, offset)| local.x >= *offset && local.x < offset + BUTTON_WIDTH)
                .map(|(action, _)| action)
                .unwrap_or(HeaderAction::Drag);
            return WindowHit::Header(action);
        }
        if resizable && local.y == bounds.height - 1 && local.x == bounds.width - 1 {
            return WindowHit::ResizeHandle;
        }
        WindowHit::Body
    }

    fn render_window(&self, frame: &mut UiFrame<'_>, clip: Rect, chrome: WindowChrome<'_>) {
        let b = chrome.bounds;
        if b.width <= 0 || b.height <= 0 {
            return;
        }
        let header_style = theme::header_style(chrome.focused);
        let border_style = Style::default()
            .fg(theme::decorator_border())
            .bg(theme::window_bg());

        // Title row
        frame.put_signed(clip, b.x, b.y, &" ".repeat(b.width as usize), header_style);
        let label = match chrome.icon {
            Some(icon) => format!(" {icon} {}", chrome.title),
            None => format!(" {}", chrome.title),
        };
        let buttons = Self::buttons(b.width);
        let title_room = buttons
            .last()
            .map(|(_, offset)| *offset)
            .unwrap_or(b.width)
            .max(0) as usize;
        let label: String = label.chars().take(title_room).collect();
        frame.put_signed(clip, b.x, b.y, &label, header_style);
        for (action, offset) in buttons {
            frame.put_signed(
                clip,
                b.x + offset,
                b.y,
                Self::button_label(action, chrome.maximized),
                header_style,
            );
        }

        if b.height < 2 {
            return;
        }
        // Side borders
        for row in 1..b.height - 1 {
            frame.put_signed(clip, b.x, b.y + row, "│", border_style);
            if b.width > 1 {
                frame.put_signed(clip, b.x + b.width - 1, b.y + row, "│", border_style);
            }
        }
        // Bottom border with the resize grip
        let bottom = b.y + b.height - 1;
        let mut line = String::with_capacity(b.width as usize * 3);
        for col in 0..b.width {
            let glyph = if col == b.width - 1 {
                if chrome.resizable && !chrome.maximized {
                    '◢'
                } else {
                    '┘'
                }
            } else if col == 0 {
                '└'
            } else {
                '─'
            };
            line.push(glyph);
        }
        frame.put_signed(clip, b.x, bottom, &line, border_style);
    }
}
