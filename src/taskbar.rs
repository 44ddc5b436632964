//! Bottom strip: start button, one entry per registered window, and the
//! package/host label on the right.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::registry::{RegistryHandle, WindowId};
use crate::theme;
use crate::ui::{UiFrame, rect_contains, truncate_to_width};

const START_LABEL: &str = " ≡ ";
const MIN_ENTRY_WIDTH: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskbarHit {
    StartButton,
    Window(WindowId),
}

#[derive(Debug, Clone)]
struct EntryHit {
    id: WindowId,
    rect: Rect,
}

#[derive(Debug, Default)]
pub struct Taskbar {
    area: Rect,
    start_rect: Option<Rect>,
    entries: Vec<EntryHit>,
    hostname: Option<String>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Screen rect of the start button from the last render.
    pub fn start_rect(&self) -> Option<Rect> {
        self.start_rect
    }

    /// Split `area` into the desktop above and the taskbar strip of
    /// `height` rows at the bottom.
    pub fn split_area(&mut self, area: Rect, height: u16) -> (Rect, Rect) {
        let bar_h = height.min(area.height);
        let desk = Rect {
            height: area.height.saturating_sub(bar_h),
            ..area
        };
        let bar = Rect {
            x: area.x,
            y: area.y.saturating_add(desk.height),
            width: area.width,
            height: bar_h,
        };
        self.area = bar;
        (desk, bar)
    }

    fn info_label(&mut self) -> String {
        const PKG_NAME: &str = env!("CARGO_PKG_NAME");
        const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
        // cached to avoid a system call every frame
        let host = self
            .hostname
            .get_or_insert_with(|| {
                hostname::get()
                    .ok()
                    .and_then(|s| s.into_string().ok())
                    .unwrap_or_else(|| "unknown-host".to_string())
            })
            .clone();
        format!("{PKG_NAME} {PKG_VERSION} · {host}")
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, registry: &RegistryHandle, menu_open: bool) {
        self.start_rect = None;
        self.entries.clear();
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bar_style = theme::taskbar_style();
        frame.fill(area, bar_style);
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);
        let mut x = area.x;

        let start_width = START_LABEL.chars().count() as u16;
        let start_style = if menu_open {
            theme::menu_selected_style()
        } else {
            bar_style.add_modifier(Modifier::BOLD)
        };
        frame.set_string(area, x, y, START_LABEL, start_style);
        self.start_rect = Some(Rect {
            x,
            y,
            width: start_width.min(area.width),
            height: 1,
        });
        x = x.saturating_add(start_width).saturating_add(1);

        let windows = registry.windows();
        let count = windows.len() as u16;

        // Right-aligned info label, kept only while every entry still gets
        // at least a stub next to it.
        let info = self.info_label();
        let info_width = info.chars().count() as u16;
        let info_x = max_x.saturating_sub(info_width);
        let entries_end = if info_width.saturating_add(1) < max_x.saturating_sub(x)
            && min_strip_width(count) <= info_x.saturating_sub(1).saturating_sub(x)
        {
            frame.set_string(area, info_x, y, &info, bar_style);
            info_x.saturating_sub(1)
        } else {
            max_x
        };

        let labels: Vec<String> = windows
            .iter()
            .map(|entry| {
                if entry.is_minimized {
                    format!("[{}]", entry.title)
                } else {
                    entry.title.clone()
                }
            })
            .collect();
        let natural: Vec<u16> = labels
            .iter()
            .map(|label| (label.chars().count() as u16).saturating_add(2))
            .collect();
        let avail = entries_end.saturating_sub(x);
        let gap = if min_strip_width(count) <= avail { 1 } else { 0 };
        let widths = fit_widths(&natural, avail.saturating_sub(count.saturating_sub(1).saturating_mul(gap)));

        for ((entry, label), width) in windows.iter().zip(&labels).zip(widths) {
            if width == 0 || x >= entries_end {
                tracing::debug!(window_id = %entry.id, "taskbar has no room for entry");
                continue;
            }
            let chunk = entry_chunk(label, &entry.title, width);
            let style = if entry.is_active {
                Style::default()
                    .bg(theme::taskbar_active_bg())
                    .fg(theme::taskbar_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else if entry.is_minimized {
                bar_style
                    .fg(theme::taskbar_minimized_fg())
                    .add_modifier(Modifier::DIM)
            } else {
                bar_style
            };
            frame.set_string(area, x, y, &chunk, style);
            self.entries.push(EntryHit {
                id: entry.id.clone(),
                rect: Rect {
                    x,
                    y,
                    width,
                    height: 1,
                },
            });
            x = x.saturating_add(width).saturating_add(gap);
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<TaskbarHit> {
        if self
            .start_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(TaskbarHit::StartButton);
        }
        self.entries
            .iter()
            .find(|hit| rect_contains(hit.rect, column, row))
            .map(|hit| TaskbarHit::Window(hit.id.clone()))
    }

    /// Left-button press on the strip, if any.
    pub fn hit_test_event(&self, event: &Event) -> Option<TaskbarHit> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return None;
        }
        self.hit_test(mouse.column, mouse.row)
    }

    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}

/// Narrowest strip that still gives `count` entries a padded stub each.
fn min_strip_width(count: u16) -> u16 {
    count
        .saturating_mul(MIN_ENTRY_WIDTH)
        .saturating_add(count.saturating_sub(1))
}

/// Shrink entry widths so they sum to at most `avail`. Short entries keep
/// their natural width; the widest ones share what is left evenly. Every
/// entry gets at least one cell while `avail` allows.
fn fit_widths(natural: &[u16], avail: u16) -> Vec<u16> {
    let total: u32 = natural.iter().map(|&w| u32::from(w)).sum();
    if total <= u32::from(avail) {
        return natural.to_vec();
    }
    let mut sorted = natural.to_vec();
    sorted.sort_unstable();
    let mut remaining = avail;
    let mut cap = 0;
    for (k, &width) in sorted.iter().enumerate() {
        let share = remaining / (sorted.len() - k) as u16;
        if width > share {
            cap = share;
            break;
        }
        remaining -= width;
    }
    let mut widths: Vec<u16> = natural.iter().map(|&w| w.min(cap)).collect();
    if cap == 0 {
        // fewer cells than entries: one cell each, front to back
        let mut left = avail;
        for width in &mut widths {
            *width = u16::from(left > 0);
            left = left.saturating_sub(1);
        }
    }
    widths
}

/// Exactly `width` cells: the padded label when it fits, otherwise the
/// leading characters of the title.
fn entry_chunk(label: &str, title: &str, width: u16) -> String {
    let width = usize::from(width);
    let chunk = if width >= usize::from(MIN_ENTRY_WIDTH) {
        format!(" {} ", truncate_to_width(label, width - 2))
    } else {
        truncate_to_width(title, width)
    };
    format!("{chunk:<width$}")
}

/// Taskbar click on a window entry: a minimized window is restored, any other
/// is brought to the front.
pub fn activate(registry: &RegistryHandle, id: &WindowId) {
    match registry.entry(id) {
        Some(entry) if entry.is_minimized => registry.restore_window(id),
        Some(_) => registry.set_active_window(id),
        None => {}
    }
}
