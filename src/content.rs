//! Payloads rendered inside windows.
//!
//! The window manager never looks inside a window; a payload only has to draw
//! itself into the area it is given, report how tall it would like to be for
//! fit-to-content, and optionally react to input while its window is focused.

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use indoc::{formatdoc, indoc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::constants::Metrics;
use crate::debug_log::DebugLogHandle;
use crate::dispatch::WindowKind;
use crate::registry::RegistryHandle;
use crate::theme;
use crate::ui::UiFrame;

/// What a payload may look at while rendering or handling input.
#[derive(Debug, Clone)]
pub struct ContentContext {
    pub focused: bool,
    pub registry: RegistryHandle,
}

impl ContentContext {
    pub fn new(registry: RegistryHandle, focused: bool) -> Self {
        Self { focused, registry }
    }
}

pub trait WindowContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ContentContext);

    /// Rows the payload needs at `width` columns to show everything.
    fn natural_height(&self, width: u16, ctx: &ContentContext) -> usize;

    fn handle_event(&mut self, _event: &Event, _ctx: &ContentContext) -> bool {
        false
    }
}

/// Vertical scroll position clamped against the last rendered extent.
#[derive(Debug, Clone, Copy, Default)]
struct Scroll {
    offset: usize,
    total: usize,
    view: usize,
}

impl Scroll {
    fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.view)
    }

    fn update(&mut self, total: usize, view: usize) {
        self.total = total;
        self.view = view;
        self.offset = self.offset.min(self.max_offset());
    }

    fn scroll_by(&mut self, delta: isize) {
        let next = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.offset = next.min(self.max_offset());
    }

    /// Shared key and wheel bindings. Returns whether the event was used.
    fn handle_event(&mut self, event: &Event) -> bool {
        let page = self.view.max(1) as isize;
        let before = self.offset;
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-page),
                KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
                KeyCode::Home => self.offset = 0,
                KeyCode::End => self.offset = self.max_offset(),
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-3),
                MouseEventKind::ScrollDown => self.scroll_by(3),
                _ => return false,
            },
            _ => return false,
        }
        before != self.offset || matches!(event, Event::Key(_))
    }
}

fn compute_display_lines(text: &Text<'_>, width: u16) -> usize {
    let usable = width.max(1) as usize;
    text.lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 { 1 } else { w.div_ceil(usable) }
        })
        .sum::<usize>()
        .max(1)
}

/// Static, wrapped, scrollable text.
#[derive(Debug)]
pub struct TextContent {
    text: Text<'static>,
    scroll: Scroll,
}

impl TextContent {
    pub fn new(text: Text<'static>) -> Self {
        Self {
            text,
            scroll: Scroll::default(),
        }
    }

    pub fn plain(text: &str) -> Self {
        let lines: Vec<Line<'static>> = text.lines().map(|l| Line::from(l.to_string())).collect();
        Self::new(Text::from(lines))
    }

    pub fn offset(&self) -> usize {
        self.scroll.offset
    }
}

impl WindowContent for TextContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ContentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let total = compute_display_lines(&self.text, area.width);
        self.scroll.update(total, area.height as usize);
        let paragraph = Paragraph::new(self.text.clone())
            .style(theme::window_style())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll.offset as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn natural_height(&self, width: u16, _ctx: &ContentContext) -> usize {
        compute_display_lines(&self.text, width)
    }

    fn handle_event(&mut self, event: &Event, ctx: &ContentContext) -> bool {
        ctx.focused && self.scroll.handle_event(event)
    }
}

/// Live table of the registry's derived view.
#[derive(Debug, Default)]
pub struct StatsContent {
    scroll: Scroll,
}

impl StatsContent {
    fn lines(ctx: &ContentContext) -> Vec<Line<'static>> {
        let windows = ctx.registry.windows();
        let header = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} open, front-most last", windows.len()),
                header,
            )),
            Line::from(Span::styled(
                format!("{:>4}  {:<3}  {}", "z", "", "title"),
                header,
            )),
        ];
        for entry in windows {
            let flag = if entry.is_active {
                "*"
            } else if entry.is_minimized {
                "_"
            } else {
                ""
            };
            lines.push(Line::from(format!(
                "{:>4}  {:<3}  {}",
                entry.z_index, flag, entry.title
            )));
        }
        lines
    }
}

impl WindowContent for StatsContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ContentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines = Self::lines(ctx);
        self.scroll.update(lines.len(), area.height as usize);
        let paragraph = Paragraph::new(Text::from(lines))
            .style(theme::window_style())
            .scroll((self.scroll.offset as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn natural_height(&self, _width: u16, ctx: &ContentContext) -> usize {
        ctx.registry.len() + 2
    }

    fn handle_event(&mut self, event: &Event, ctx: &ContentContext) -> bool {
        ctx.focused && self.scroll.handle_event(event)
    }
}

/// Tail of the in-memory log. Sticks to the newest line until scrolled up.
#[derive(Debug)]
pub struct DebugLogContent {
    handle: DebugLogHandle,
    scroll: Scroll,
    follow: bool,
}

impl DebugLogContent {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            scroll: Scroll::default(),
            follow: true,
        }
    }
}

impl WindowContent for DebugLogContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ContentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let rows = area.height as usize;
        self.scroll.update(self.handle.len(), rows);
        let lines = if self.follow {
            self.scroll.offset = self.scroll.max_offset();
            self.handle.tail(rows)
        } else {
            self.handle
                .lines()
                .into_iter()
                .skip(self.scroll.offset)
                .take(rows)
                .collect()
        };
        let warn = Style::default().fg(theme::debug_highlight());
        let text: Vec<Line<'static>> = lines
            .into_iter()
            .map(|line| {
                if line.contains("WARN") || line.contains("ERROR") || line.contains("PANIC") {
                    Line::from(Span::styled(line, warn))
                } else {
                    Line::from(line)
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Text::from(text)).style(theme::window_style()),
            area,
        );
    }

    fn natural_height(&self, _width: u16, _ctx: &ContentContext) -> usize {
        self.handle.len().max(1)
    }

    fn handle_event(&mut self, event: &Event, ctx: &ContentContext) -> bool {
        if !ctx.focused || !self.scroll.handle_event(event) {
            return false;
        }
        self.follow = self.scroll.offset >= self.scroll.max_offset();
        true
    }
}

const ABOUT_TEXT: &str = indoc! {"
    A desktop in your terminal.

    Open windows from the ≡ start button on the taskbar, drag them by the
    title row, resize them from the ◢ corner, double-click a title to fit
    the window to its content.
"};

const README_TEXT: &str = indoc! {"
    Windows
      Drag the title row to move a window. At least a sliver of the title
      always stays on screen so a window can be dragged back.
      Drag the ◢ corner to resize; windows never shrink below a minimum.
      _ minimizes to the taskbar, □ maximizes over the whole desktop and
      restores to the previous place, x closes.
      Double-click a title row to fit the window height to its content.

    Taskbar
      Every open window has an entry, front-most window highlighted.
      Minimized windows are shown in brackets; click to restore them.
      Click a visible entry to bring the window to the front.

    Keyboard
      F2           open the launcher
      Tab          focus the next window
      F11          maximize or restore the focused window
      Ctrl+N       minimize the focused window
      Ctrl+W       close the focused window
      Ctrl+Q       quit
      Arrows, PageUp/PageDown, Home/End scroll the focused window.
"};

fn settings_text(metrics: &Metrics) -> String {
    formatdoc! {"
        Geometry metrics (terminal cells)

          taskbar height      {taskbar}
          padding             {padding}
          minimum size        {min_w} x {min_h}
          header height       {header}
          header sliver       {sliver}
          cascade step        {cascade}

        Build
          {name} {version}
        ",
        taskbar = metrics.taskbar_height,
        padding = metrics.padding,
        min_w = metrics.min_width,
        min_h = metrics.min_height,
        header = metrics.header_height,
        sliver = metrics.min_header_visible,
        cascade = metrics.cascade_step,
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    }
}

/// Build the payload of a window kind.
pub fn content_for(
    kind: WindowKind,
    metrics: &Metrics,
    log: Option<DebugLogHandle>,
) -> Box<dyn WindowContent> {
    match kind {
        WindowKind::About => Box::new(TextContent::plain(ABOUT_TEXT)),
        WindowKind::Readme => Box::new(TextContent::plain(README_TEXT)),
        WindowKind::Stats => Box::new(StatsContent::default()),
        WindowKind::Settings => Box::new(TextContent::plain(&settings_text(metrics))),
        WindowKind::DebugLog => match log {
            Some(handle) => Box::new(DebugLogContent::new(handle)),
            None => Box::new(TextContent::plain(
                "Logging goes to the file given with --log-file.",
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WindowId;
    use crate::ui::row_text;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn render(content: &mut dyn WindowContent, ctx: &ContentContext, w: u16, h: u16) -> Buffer {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        content.render(&mut ui, area, ctx);
        buf
    }

    #[test]
    fn natural_height_counts_wrapped_lines() {
        let ctx = ContentContext::new(RegistryHandle::new(), true);
        let content = TextContent::plain("0123456789\n\nabc");
        assert_eq!(content.natural_height(20, &ctx), 3);
        assert_eq!(content.natural_height(5, &ctx), 4);
    }

    #[test]
    fn text_scrolls_only_when_focused() {
        let text: String = (0..20).map(|i| format!("line {i}\n")).collect();
        let mut content = TextContent::plain(&text);
        let focused = ContentContext::new(RegistryHandle::new(), true);
        let unfocused = ContentContext::new(RegistryHandle::new(), false);
        render(&mut content, &focused, 20, 5);
        assert!(!content.handle_event(&key(KeyCode::Down), &unfocused));
        assert!(content.handle_event(&key(KeyCode::Down), &focused));
        assert_eq!(content.offset(), 1);
        assert!(content.handle_event(&key(KeyCode::End), &focused));
        assert_eq!(content.offset(), 15);
        let buf = render(&mut content, &focused, 20, 5);
        assert!(row_text(&buf, 0).starts_with("line 15"));
    }

    #[test]
    fn stats_lists_windows_front_most_last() {
        let registry = RegistryHandle::new();
        registry.register_window(&WindowId::new("a"), "Alpha", None);
        registry.register_window(&WindowId::new("b"), "Beta", None);
        registry.minimize_window(&WindowId::new("a"));
        let ctx = ContentContext::new(registry, false);
        let mut stats = StatsContent::default();
        assert_eq!(stats.natural_height(40, &ctx), 4);
        let buf = render(&mut stats, &ctx, 40, 4);
        assert!(row_text(&buf, 0).starts_with("2 open"));
        assert!(row_text(&buf, 2).contains("_    Alpha"));
        assert!(row_text(&buf, 3).contains("*    Beta"));
    }

    #[test]
    fn debug_log_follows_tail() {
        let handle = DebugLogHandle::new(50);
        for i in 0..10 {
            handle.push(format!("event {i}"));
        }
        let ctx = ContentContext::new(RegistryHandle::new(), true);
        let mut content = DebugLogContent::new(handle.clone());
        let buf = render(&mut content, &ctx, 20, 3);
        assert!(row_text(&buf, 2).starts_with("event 9"));
        content.handle_event(&key(KeyCode::Up), &ctx);
        handle.push("event 10");
        let buf = render(&mut content, &ctx, 20, 3);
        // scrolled up, so the new line does not pull the view
        assert!(row_text(&buf, 2).starts_with("event 8"));
    }

    #[test]
    fn settings_lists_metrics() {
        let text = settings_text(&Metrics::cells());
        assert!(text.contains("minimum size        20 x 5"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }
}
