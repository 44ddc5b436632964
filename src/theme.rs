use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors. Everything paints through these helpers so a
// palette change touches one file.

pub fn desktop_bg() -> Color {
    Color::Rgb(0, 96, 96)
}

// Taskbar
pub fn taskbar_bg() -> Color {
    Color::DarkGray
}
pub fn taskbar_fg() -> Color {
    Color::White
}
pub fn taskbar_active_bg() -> Color {
    Color::Gray
}
pub fn taskbar_active_fg() -> Color {
    Color::Black
}
pub fn taskbar_minimized_fg() -> Color {
    Color::Gray
}

// Launcher menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_inactive_header_bg() -> Color {
    Color::DarkGray
}
pub fn decorator_border() -> Color {
    Color::Gray
}
pub fn window_bg() -> Color {
    Color::Black
}
pub fn window_fg() -> Color {
    Color::White
}

pub fn debug_highlight() -> Color {
    Color::Rgb(255, 165, 0)
}

pub fn taskbar_style() -> Style {
    Style::default().bg(taskbar_bg()).fg(taskbar_fg())
}

pub fn menu_style() -> Style {
    Style::default().bg(menu_bg()).fg(menu_fg())
}

pub fn menu_selected_style() -> Style {
    Style::default()
        .bg(menu_selected_bg())
        .fg(menu_selected_fg())
        .add_modifier(Modifier::BOLD)
}

pub fn header_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(decorator_header_bg())
            .fg(decorator_header_fg())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(decorator_inactive_header_bg())
            .fg(decorator_header_fg())
    }
}

pub fn window_style() -> Style {
    Style::default().bg(window_bg()).fg(window_fg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_header_differs_from_unfocused() {
        assert_ne!(header_style(true), header_style(false));
        assert!(header_style(true).add_modifier.contains(Modifier::BOLD));
    }
}
