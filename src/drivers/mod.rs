//! Terminal IO seams. The event loop reads through [`InputDriver`] and the
//! frame is drawn through [`OutputDriver`], so the desktop can be driven by a
//! scripted queue in tests and in the bench.

pub mod console;
pub mod keyboard;

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::ui::UiFrame;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}

/// Replays a fixed list of events, then reports an idle queue forever.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<Event>,
    mouse_capture: bool,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mouse_capture: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }
}

impl InputDriver for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "scripted input exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_drains_in_order() {
        let mut input = ScriptedInput::new([Event::Resize(10, 5), Event::FocusGained]);
        assert!(input.poll(Duration::ZERO).unwrap());
        assert_eq!(input.read().unwrap(), Event::Resize(10, 5));
        assert_eq!(input.read().unwrap(), Event::FocusGained);
        assert!(!input.poll(Duration::ZERO).unwrap());
        assert!(input.read().is_err());
    }

    #[test]
    fn mouse_capture_passes_through_mut_ref() {
        fn enable<D: InputDriver>(mut driver: D) -> io::Result<()> {
            driver.set_mouse_capture(true)
        }
        let mut input = ScriptedInput::default();
        enable(&mut input).unwrap();
        assert!(input.mouse_capture());
    }
}
