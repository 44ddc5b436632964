use clap::Parser;
use ratatui::layout::Rect;

use term_desktop::config::{Cli, DesktopConfig};
use term_desktop::debug_log::{DebugLogHandle, install_panic_hook, set_global_debug_log};
use term_desktop::desktop::Desktop;
use term_desktop::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_desktop::drivers::{InputDriver, OutputDriver};
use term_desktop::error::Result;
use term_desktop::event_loop::{ControlFlow, EventLoop};
use term_desktop::tracing_sub::{self, SubscriberMakeWriter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DesktopConfig::try_from(&cli)?;

    let debug_log = match &config.log_file {
        Some(path) => {
            tracing_sub::init_with_writer(SubscriberMakeWriter::to_file(path)?);
            None
        }
        None => {
            let handle = DebugLogHandle::default();
            set_global_debug_log(handle.clone());
            install_panic_hook();
            tracing_sub::init_default();
            Some(handle)
        }
    };
    tracing::info!(startup = ?config.startup_windows, "starting desktop");

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run(&config, &mut output, debug_log);
    output.exit()?;
    result
}

fn run(
    config: &DesktopConfig,
    output: &mut ConsoleOutputDriver,
    debug_log: Option<DebugLogHandle>,
) -> Result<()> {
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(config.mouse_capture)?;

    let (width, height) = crossterm::terminal::size()?;
    let mut desktop = Desktop::new(config.metrics, Rect::new(0, 0, width, height), debug_log);
    for kind in &config.startup_windows {
        desktop.launch(*kind);
    }
    desktop.pump();

    let mut event_loop = EventLoop::new(input, config.poll_interval);
    event_loop.run(|_, event| {
        match event {
            Some(event) => {
                desktop.handle_event(&event);
            }
            None => {
                desktop.pump();
                output.draw(|mut frame| desktop.render(&mut frame))?;
            }
        }
        Ok(if desktop.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    })?;
    tracing::info!("desktop closed");
    Ok(())
}
