//! Shared crate-wide constants.

use std::time::Duration;

/// Unit-agnostic sizing rules a host applies to every window surface.
///
/// The core never assumes a unit: a browser-like host measures in pixels, the
/// terminal host measures in cells. Both feed the same clamp functions in
/// [`crate::geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Height of the taskbar strip reserved at the bottom of the viewport.
    pub taskbar_height: i32,
    /// Minimum distance kept between a freshly mounted window and the
    /// viewport edges.
    pub padding: i32,
    /// Floor applied to widths produced by resize drags.
    pub min_width: i32,
    /// Floor applied to heights produced by resize drags.
    pub min_height: i32,
    /// Vertical space taken by window chrome around the content.
    pub header_height: i32,
    /// Horizontal sliver of the header that must stay inside the viewport
    /// so the window can always be grabbed again.
    pub min_header_visible: i32,
    /// Offset applied per already-open window when a new one is launched.
    pub cascade_step: i32,
}

impl Metrics {
    /// Sizing rules for hosts measuring in pixels.
    pub const fn pixels() -> Self {
        Self {
            taskbar_height: 56,
            padding: 16,
            min_width: 300,
            min_height: 200,
            header_height: 40,
            min_header_visible: 100,
            cascade_step: 32,
        }
    }

    /// Sizing rules for the terminal host, measured in cells.
    pub const fn cells() -> Self {
        Self {
            taskbar_height: 1,
            padding: 1,
            min_width: 20,
            min_height: 5,
            // title row plus bottom border
            header_height: 2,
            min_header_visible: 8,
            cascade_step: 2,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::pixels()
    }
}

/// Two header clicks on the same window within this window count as a
/// double-click (fit-to-content).
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Default event poll interval of the terminal host.
pub const DEFAULT_POLL_MS: u64 = 16;

/// Number of lines retained by the in-memory debug log.
pub const DEBUG_LOG_MAX_LINES: usize = 2000;
