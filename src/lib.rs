//! A desktop in the terminal: floating windows that can be dragged, resized,
//! minimized and maximized, a taskbar listing them, and a start-menu launcher.
//!
//! The window bookkeeping ([`registry`]), the per-window state machine
//! ([`surface`]) and the geometry rules ([`geometry`]) know nothing about the
//! terminal. [`desktop`] wires them to crossterm input and ratatui output.

pub mod config;
pub mod constants;
pub mod content;
pub mod debug_log;
pub mod decorator;
pub mod desktop;
pub mod dispatch;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod launcher;
pub mod listeners;
pub mod registry;
pub mod surface;
pub mod taskbar;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
