//! Typed "open a window" requests and the dispatcher that mounts them.
//!
//! Launch surfaces (the launcher menu, startup flags) only know a
//! [`WindowKind`]; they send a [`LaunchRequest`] and forget about it. The
//! single [`Dispatcher`] drains the channel on the UI thread and asks a
//! [`WindowHost`] to mount a surface with the kind's geometry hints, shifted
//! by a cascade offset so new windows do not land exactly on older ones.

use std::sync::mpsc::{self, Receiver, Sender};

use clap::ValueEnum;

use crate::constants::Metrics;
use crate::geometry::Height;
use crate::registry::WindowId;
use crate::surface::SurfaceProps;

/// Every kind of window the desktop knows how to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum WindowKind {
    About,
    Readme,
    Stats,
    Settings,
    DebugLog,
}

/// Initial placement hints of a kind, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryHint {
    pub width: i32,
    pub height: Height,
    pub x: i32,
    pub y: i32,
}

impl WindowKind {
    pub const ALL: [WindowKind; 5] = [
        WindowKind::About,
        WindowKind::Readme,
        WindowKind::Stats,
        WindowKind::Settings,
        WindowKind::DebugLog,
    ];

    pub fn title(self) -> &'static str {
        match self {
            WindowKind::About => "About",
            WindowKind::Readme => "Readme",
            WindowKind::Stats => "Window Stats",
            WindowKind::Settings => "Settings",
            WindowKind::DebugLog => "Debug Log",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WindowKind::About => "i",
            WindowKind::Readme => "¶",
            WindowKind::Stats => "#",
            WindowKind::Settings => "*",
            WindowKind::DebugLog => "!",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            WindowKind::About => "about",
            WindowKind::Readme => "readme",
            WindowKind::Stats => "stats",
            WindowKind::Settings => "settings",
            WindowKind::DebugLog => "debug-log",
        }
    }

    pub fn hint(self) -> GeometryHint {
        let (width, height, x, y) = match self {
            WindowKind::About => (44, Height::Fit, 4, 2),
            WindowKind::Readme => (60, Height::Fixed(18), 8, 3),
            WindowKind::Stats => (52, Height::Fixed(12), 12, 4),
            WindowKind::Settings => (46, Height::Fit, 16, 5),
            WindowKind::DebugLog => (72, Height::Fixed(14), 6, 6),
        };
        GeometryHint {
            width,
            height,
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchRequest {
    pub kind: WindowKind,
}

#[derive(Debug, Clone)]
pub struct LaunchSender {
    tx: Sender<LaunchRequest>,
}

impl LaunchSender {
    pub fn launch(&self, kind: WindowKind) {
        // the dispatcher lives as long as the desktop; a closed channel
        // only happens during teardown
        if self.tx.send(LaunchRequest { kind }).is_err() {
            tracing::warn!(?kind, "launch request dropped, dispatcher is gone");
        }
    }
}

pub fn launch_channel() -> (LaunchSender, Receiver<LaunchRequest>) {
    let (tx, rx) = mpsc::channel();
    (LaunchSender { tx }, rx)
}

/// Whatever owns the mounted surfaces.
pub trait WindowHost {
    /// Number of windows currently mounted, minimized ones included.
    fn open_window_count(&self) -> usize;
    fn metrics(&self) -> Metrics;
    fn mount_window(&mut self, kind: WindowKind, props: SurfaceProps);
}

#[derive(Debug)]
pub struct Dispatcher {
    rx: Receiver<LaunchRequest>,
    next_seq: u64,
}

impl Dispatcher {
    pub fn new(rx: Receiver<LaunchRequest>) -> Self {
        Self { rx, next_seq: 1 }
    }

    /// Mount a window for every pending request. Returns how many were
    /// mounted.
    pub fn pump<H: WindowHost>(&mut self, host: &mut H) -> usize {
        let mut mounted = 0;
        while let Ok(request) = self.rx.try_recv() {
            let props = self.props_for(request.kind, host.open_window_count(), &host.metrics());
            tracing::debug!(kind = ?request.kind, window_id = %props.id, "dispatching launch request");
            host.mount_window(request.kind, props);
            mounted += 1;
        }
        mounted
    }

    fn props_for(&mut self, kind: WindowKind, open_count: usize, metrics: &Metrics) -> SurfaceProps {
        let seq = self.next_seq;
        self.next_seq = seq.wrapping_add(1);
        let hint = kind.hint();
        let cascade = cascade_offset(open_count, metrics);
        SurfaceProps::new(WindowId::new(format!("{}-{seq}", kind.slug())), kind.title())
            .with_icon(kind.icon())
            .with_slug(kind.slug())
            .with_size(hint.width, hint.height)
            .with_position(hint.x + cascade, hint.y + cascade)
    }
}

pub fn cascade_offset(open_count: usize, metrics: &Metrics) -> i32 {
    let count = i32::try_from(open_count).unwrap_or(i32::MAX);
    count.saturating_mul(metrics.cascade_step)
}
